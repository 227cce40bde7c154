use welfare_notifier::application::{self, ApplicationEnv};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    #[cfg(debug_assertions)]
    {
        // Ignore error because .env file is not required
        // as long as env variables are set
        let _ = dotenvy::dotenv();
    }

    let env = ApplicationEnv::parse()?;

    application::setup_tracing(&env)?;

    let (state, state_to_close) = application::create_state(&env).await?;

    state.scheduler.start().await?;
    tracing::info!("welfare notifier started");

    application::shutdown_signal().await;

    application::close(state, state_to_close).await;

    Ok(())
}

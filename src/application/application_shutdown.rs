use super::{ApplicationState, ApplicationStateToClose};

pub async fn close(state: ApplicationState, state_to_close: ApplicationStateToClose) {
    tracing::info!("stopping scheduler");
    if let Err(err) = state.scheduler.stop().await {
        tracing::error!(%err, "failed to stop scheduler");
    }

    tracing::info!("closing connection with database");
    state_to_close.db_client.shutdown().await;
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("starting shutdown");
}

use super::ApplicationEnv;
use crate::{
    repository::{
        ApplicationsRepositoryImpl, GrievancesRepositoryImpl, NotificationsRepositoryImpl,
        SchemesRepositoryImpl, UsersRepositoryImpl,
    },
    scheduler::{Scheduler, SchedulerJobs},
    service::{NotificationsService, NotificationsServiceImpl},
};
use mongodb::{options::ClientOptions, Client};
use std::sync::Arc;

#[derive(Clone)]
pub struct ApplicationState {
    pub notifications_service: Arc<dyn NotificationsService>,
    pub scheduler: Arc<Scheduler>,
}

pub struct ApplicationStateToClose {
    pub db_client: Client,
}

pub async fn create_state(
    env: &ApplicationEnv,
) -> anyhow::Result<(ApplicationState, ApplicationStateToClose)> {
    tracing::info!("connecting to database");
    let db_client_options = ClientOptions::parse(&env.db_connection_string).await?;
    let db_client = Client::with_options(db_client_options)?;
    let db = db_client.database(&env.db_name);

    tracing::info!("creating repositories");
    let notifications_repository = Arc::new(NotificationsRepositoryImpl::new(db.clone()).await?);
    let users_repository = Arc::new(UsersRepositoryImpl::new(db.clone()).await?);
    let schemes_repository = Arc::new(SchemesRepositoryImpl::new(db.clone()));
    let applications_repository = Arc::new(ApplicationsRepositoryImpl::new(db.clone()));
    let grievances_repository = Arc::new(GrievancesRepositoryImpl::new(db));

    tracing::info!("creating services");
    let notifications_service = Arc::new(NotificationsServiceImpl::new(
        env.notifications_service_config(),
        notifications_repository,
        users_repository.clone(),
    ));

    tracing::info!("creating scheduler");
    let scheduler_jobs = Arc::new(SchedulerJobs::new(
        env.scheduler_jobs_config(),
        notifications_service.clone(),
        users_repository,
        schemes_repository,
        applications_repository,
        grievances_repository,
    ));
    let scheduler = Arc::new(Scheduler::new(env.scheduler_config(), scheduler_jobs).await?);

    let state = ApplicationState {
        notifications_service,
        scheduler,
    };
    let state_to_close = ApplicationStateToClose { db_client };

    Ok((state, state_to_close))
}

use crate::{error, repository};

///
/// Failure of a single job run. Never propagated past the job boundary
/// when the job is fired by the scheduler.
///
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("previous run of the job is still in progress")]
    AlreadyRunning,

    #[error("database error: {0}")]
    Database(#[from] repository::Error),

    #[error("notification error: {0}")]
    Notification(#[from] error::Error),
}

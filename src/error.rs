use crate::repository;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("notification not exist")]
    NotificationNotExist,

    #[error("recipient not exist")]
    RecipientNotExist,

    #[error("validation error: {0}")]
    Validation(&'static str),

    #[error("notification modified concurrently")]
    ConcurrentModification,

    #[error("database error: {0}")]
    Database(#[from] repository::Error),
}

impl Error {
    ///
    /// True for errors caused by a missing record or a record
    /// that does not belong to the caller
    ///
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotificationNotExist | Error::RecipientNotExist)
    }
}

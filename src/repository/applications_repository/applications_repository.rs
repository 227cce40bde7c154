use super::Application;
use crate::repository::Error;
use async_trait::async_trait;
use time::OffsetDateTime;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationsRepository: Send + Sync {
    ///
    /// Finds pending applications created before the timestamp,
    /// oldest first
    ///
    async fn find_pending_created_before(
        &self,
        created_before: OffsetDateTime,
    ) -> Result<Vec<Application>, Error>;
}

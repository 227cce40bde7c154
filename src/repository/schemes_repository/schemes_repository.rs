use super::Scheme;
use crate::repository::Error;
use async_trait::async_trait;
use bson::oid::ObjectId;
use time::OffsetDateTime;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchemesRepository: Send + Sync {
    ///
    /// Finds active schemes with application deadline within [from, to]
    ///
    async fn find_active_with_deadline_between(
        &self,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<Scheme>, Error>;

    ///
    /// Finds active schemes still accepting applications,
    /// nearest deadline first
    ///
    async fn find_active_open(
        &self,
        now: OffsetDateTime,
        limit: i64,
    ) -> Result<Vec<Scheme>, Error>;

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Scheme>, Error>;
}

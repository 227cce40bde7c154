use super::{Grievance, GrievanceStatus};
use crate::repository::Error;
use async_trait::async_trait;
use bson::oid::ObjectId;
use time::OffsetDateTime;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GrievancesRepository: Send + Sync {
    ///
    /// Finds grievances in any of the statuses created before the timestamp,
    /// oldest first
    ///
    async fn find_by_status_created_before(
        &self,
        statuses: &[GrievanceStatus],
        created_before: OffsetDateTime,
    ) -> Result<Vec<Grievance>, Error>;

    ///
    /// Moves grievance to escalated status
    ///
    /// ### Errors
    /// - [Error::NoDocumentUpdated] when
    ///     - grievance does not exist
    ///     - grievance is already escalated
    ///
    async fn escalate(&self, id: ObjectId, escalated_at: OffsetDateTime) -> Result<(), Error>;
}

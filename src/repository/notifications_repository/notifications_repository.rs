use super::{CleanupCandidate, Notification, NotificationCounts};
use crate::{dto::input, repository::Error};
use async_trait::async_trait;
use bson::oid::ObjectId;
use time::OffsetDateTime;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsRepository: Send + Sync {
    ///
    /// Inserts new notification
    ///
    /// ### Errors
    /// - [Error::InsertUniqueViolation] when notification id is already taken
    ///
    async fn insert(&self, notification: &Notification) -> Result<(), Error>;

    async fn find(&self, id: ObjectId) -> Result<Option<Notification>, Error>;

    ///
    /// Finds notification only if it belongs to the recipient
    ///
    async fn find_for_recipient(
        &self,
        id: ObjectId,
        recipient_id: ObjectId,
    ) -> Result<Option<Notification>, Error>;

    ///
    /// Replaces stored notification with the new state.
    ///
    /// ### Errors
    /// - [Error::NoDocumentUpdated] when
    ///     - notification does not exist
    ///     - stored version differs from expected_version
    ///
    async fn replace(&self, notification: &Notification, expected_version: i64)
        -> Result<(), Error>;

    ///
    /// ### Errors
    /// - [Error::NoDocumentUpdated] when
    ///     - notification does not exist
    ///     - notification does not belong to the recipient
    ///
    async fn delete(&self, id: ObjectId, recipient_id: ObjectId) -> Result<(), Error>;

    ///
    /// ### Returns
    /// number of deleted notifications
    ///
    async fn delete_many(&self, ids: &[ObjectId]) -> Result<u64, Error>;

    ///
    /// Finds recipient's notifications sorted descending by creation date
    ///
    async fn find_many(
        &self,
        recipient_id: ObjectId,
        pagination: input::Pagination,
        filters: input::NotificationFilters,
    ) -> Result<Vec<Notification>, Error>;

    async fn count(
        &self,
        recipient_id: ObjectId,
        filters: input::NotificationFilters,
    ) -> Result<u64, Error>;

    ///
    /// Marks every unread notification of the recipient as read
    ///
    /// ### Returns
    /// number of modified notifications
    ///
    async fn mark_all_as_read(
        &self,
        recipient_id: ObjectId,
        read_at: OffsetDateTime,
    ) -> Result<u64, Error>;

    ///
    /// Flags notifications whose expires_at passed as expired.
    /// Status of not read notifications is forced to failed.
    /// When recipient_id is None all recipients are affected.
    ///
    /// ### Returns
    /// number of notifications that expired
    ///
    async fn expire_overdue(
        &self,
        recipient_id: Option<ObjectId>,
        now: OffsetDateTime,
    ) -> Result<u64, Error>;

    ///
    /// Finds pending notifications that are not expired and not scheduled
    /// for the future. Sorted ascending by creation date.
    ///
    async fn find_ready_for_delivery(
        &self,
        now: OffsetDateTime,
        limit: i64,
    ) -> Result<Vec<Notification>, Error>;

    ///
    /// Finds failed notifications with retries left and elapsed backoff.
    /// Sorted ascending by next_retry_at.
    ///
    async fn find_retry_eligible(
        &self,
        now: OffsetDateTime,
        limit: i64,
    ) -> Result<Vec<Notification>, Error>;

    ///
    /// Finds read notifications created before cutoff
    /// and notifications that expired before cutoff
    ///
    async fn find_cleanup_candidates(
        &self,
        cutoff: OffsetDateTime,
    ) -> Result<Vec<CleanupCandidate>, Error>;

    async fn count_grouped(&self, recipient_id: ObjectId) -> Result<NotificationCounts, Error>;
}

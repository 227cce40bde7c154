use crate::{
    dto::{input, output, UserRole},
    error::Error,
    repository::Notification,
};
use async_trait::async_trait;
use bson::oid::ObjectId;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsService: Send + Sync {
    ///
    /// Creates pending notification for the recipient and appends its id
    /// to the recipient's notification list.
    ///
    /// ### Errors
    /// - [Error::Validation] when
    ///     - title or message is empty or too long
    ///     - expires_at already passed
    /// - [Error::RecipientNotExist] when recipient does not exist,
    ///     the created notification is removed again
    ///
    async fn create(
        &self,
        recipient_id: ObjectId,
        notification: input::NotificationCreate,
    ) -> Result<Notification, Error>;

    ///
    /// Creates the same notification for every recipient independently.
    /// A failure for one recipient never aborts the others.
    ///
    async fn send_bulk(
        &self,
        recipient_ids: &[ObjectId],
        notification: input::NotificationCreate,
    ) -> output::BulkSendResult;

    ///
    /// Sends notification to every active user having any of the roles
    ///
    async fn send_to_roles(
        &self,
        roles: &[UserRole],
        notification: input::NotificationCreate,
    ) -> Result<output::BulkSendResult, Error>;

    ///
    /// ### Errors
    /// - [Error::NotificationNotExist] when
    ///     - notification does not exist
    ///     - notification does not belong to the recipient
    /// - [Error::ConcurrentModification] when notification kept changing
    ///     between read and write
    ///
    async fn mark_as_read(
        &self,
        id: ObjectId,
        recipient_id: ObjectId,
    ) -> Result<Notification, Error>;

    ///
    /// ### Returns
    /// number of notifications marked as read
    ///
    async fn mark_all_as_read(&self, recipient_id: ObjectId) -> Result<u64, Error>;

    ///
    /// Stamps clicked_at once, clicking also marks notification as read
    ///
    /// ### Errors
    /// - same as [NotificationsService::mark_as_read]
    ///
    async fn mark_as_clicked(
        &self,
        id: ObjectId,
        recipient_id: ObjectId,
    ) -> Result<Notification, Error>;

    ///
    /// Channel-level delivery receipt. Only a sent notification moves to delivered,
    /// for any other status the notification is returned unchanged.
    ///
    /// ### Errors
    /// - [Error::NotificationNotExist] when notification does not exist
    ///
    async fn mark_as_delivered(&self, id: ObjectId) -> Result<Notification, Error>;

    async fn get_unread_count(&self, recipient_id: ObjectId) -> Result<u64, Error>;

    ///
    /// Returns page of recipient's notifications, newest first.
    /// Page outside of range is empty, not an error.
    ///
    async fn list_for_recipient(
        &self,
        recipient_id: ObjectId,
        pagination: input::Pagination,
        filters: input::NotificationFilters,
    ) -> Result<output::NotificationsPage, Error>;

    async fn get_stats(&self, recipient_id: ObjectId) -> Result<output::NotificationStats, Error>;

    ///
    /// ### Errors
    /// - [Error::NotificationNotExist] when
    ///     - notification does not exist
    ///     - notification does not belong to the recipient
    ///
    async fn delete(&self, id: ObjectId, recipient_id: ObjectId) -> Result<(), Error>;

    ///
    /// Deletes notifications read before the retention window
    /// and notifications that expired before it
    ///
    /// ### Returns
    /// number of deleted notifications
    ///
    async fn cleanup_old(&self, retention_days: u32) -> Result<u64, Error>;

    ///
    /// Writes outcome of a delivery attempt back to the notification.
    /// Failed attempts drive retry bookkeeping and are never returned as errors.
    ///
    /// ### Errors
    /// - [Error::NotificationNotExist] when notification does not exist
    ///
    async fn record_delivery_attempt(
        &self,
        id: ObjectId,
        attempt: input::DeliveryAttempt,
    ) -> Result<Notification, Error>;

    ///
    /// Finds notifications ready for first delivery followed by
    /// failed notifications eligible for a retry
    ///
    async fn find_deliverable(&self, limit: i64) -> Result<Vec<Notification>, Error>;
}

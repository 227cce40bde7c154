use super::User;
use crate::{dto::UserRole, repository::Error};
use async_trait::async_trait;
use bson::oid::ObjectId;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersRepository: Send + Sync {
    ///
    /// Finds active users having any of the roles
    ///
    async fn find_by_roles(&self, roles: &[UserRole]) -> Result<Vec<User>, Error>;

    ///
    /// Finds active users born on the day of the month, regardless of the year
    ///
    async fn find_by_birthday(&self, month: u8, day: u8) -> Result<Vec<User>, Error>;

    ///
    /// Appends notification id to the user's notification list
    ///
    /// ### Errors
    /// - [Error::NoDocumentUpdated] when user does not exist
    ///
    async fn push_notification(
        &self,
        user_id: ObjectId,
        notification_id: ObjectId,
    ) -> Result<(), Error>;

    ///
    /// Removes notification ids from every user's notification list
    ///
    async fn pull_notifications(&self, notification_ids: &[ObjectId]) -> Result<u64, Error>;
}

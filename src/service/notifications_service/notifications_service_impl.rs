use super::{NotificationsService, NotificationsServiceConfig};
use crate::{
    dto::{input, output, UserRole},
    error::Error,
    repository::{self, Notification, NotificationsRepository, UsersRepository},
};
use async_trait::async_trait;
use bson::oid::ObjectId;
use futures_util::future::join_all;
use std::sync::Arc;
use time::{Duration, OffsetDateTime};

pub struct NotificationsServiceImpl {
    config: NotificationsServiceConfig,
    repository: Arc<dyn NotificationsRepository>,
    users_repository: Arc<dyn UsersRepository>,
}

impl NotificationsServiceImpl {
    pub fn new(
        config: NotificationsServiceConfig,
        repository: Arc<dyn NotificationsRepository>,
        users_repository: Arc<dyn UsersRepository>,
    ) -> Self {
        Self {
            config,
            repository,
            users_repository,
        }
    }

    fn validate_create(&self, notification: &input::NotificationCreate) -> Result<(), Error> {
        Self::validate_not_blank(&notification.title, "title is empty")?;
        Self::validate_not_blank(&notification.message, "message is empty")?;
        Self::validate_not_too_long(
            &notification.title,
            self.config.max_title_len,
            "title is too long",
        )?;
        Self::validate_not_too_long(
            &notification.message,
            self.config.max_message_len,
            "message is too long",
        )?;
        Self::validate_expires_at_not_passed(&notification.expires_at)?;
        if !notification.channels.any() {
            return Err(Error::Validation("no delivery channel enabled"));
        }

        Ok(())
    }

    fn validate_not_blank(text: &str, reason: &'static str) -> Result<(), Error> {
        if text.trim().is_empty() {
            return Err(Error::Validation(reason));
        }

        Ok(())
    }

    fn validate_not_too_long(text: &str, max_len: usize, reason: &'static str) -> Result<(), Error> {
        if text.chars().count() > max_len {
            return Err(Error::Validation(reason));
        }

        Ok(())
    }

    fn validate_expires_at_not_passed(expires_at: &Option<OffsetDateTime>) -> Result<(), Error> {
        if let Some(expires_at) = expires_at {
            if *expires_at <= OffsetDateTime::now_utc() {
                return Err(Error::Validation("expires_at already passed"));
            }
        }

        Ok(())
    }

    ///
    /// Read-modify-write of a single notification guarded by its version.
    /// Transition returns true when it changed the notification.
    /// Notification is written only when the transition or lazy expiry changed it.
    ///
    async fn modify<F>(
        &self,
        id: ObjectId,
        recipient_id: Option<ObjectId>,
        transition: F,
    ) -> Result<Notification, Error>
    where
        F: Fn(&mut Notification, OffsetDateTime) -> bool + Send + Sync,
    {
        for attempt in 1..=self.config.max_update_attempts.max(1) {
            let notification = match recipient_id {
                Some(recipient_id) => self.repository.find_for_recipient(id, recipient_id).await?,
                None => self.repository.find(id).await?,
            };
            let mut notification = notification.ok_or(Error::NotificationNotExist)?;

            let now = OffsetDateTime::now_utc();
            let expected_version = notification.version;

            let expired = notification.refresh_expiry(now);
            let changed = transition(&mut notification, now);
            if !expired && !changed {
                return Ok(notification);
            }
            notification.touch(now);

            match self.repository.replace(&notification, expected_version).await {
                Ok(()) => return Ok(notification),
                Err(repository::Error::NoDocumentUpdated) => {
                    tracing::debug!(attempt, "notification changed concurrently");
                }
                Err(err) => return Err(Error::Database(err)),
            }
        }

        tracing::warn!("giving up on notification update");

        Err(Error::ConcurrentModification)
    }
}

#[async_trait]
impl NotificationsService for NotificationsServiceImpl {
    async fn create(
        &self,
        recipient_id: ObjectId,
        notification: input::NotificationCreate,
    ) -> Result<Notification, Error> {
        tracing::info!(%recipient_id, "creating notification");
        tracing::trace!(?notification);

        self.validate_create(&notification)?;

        let notification = Notification::new(
            recipient_id,
            notification,
            self.config.default_max_retries,
            OffsetDateTime::now_utc(),
        );
        self.repository.insert(&notification).await?;

        let push_result = self
            .users_repository
            .push_notification(recipient_id, notification.id)
            .await;

        if let Err(err) = push_result {
            tracing::warn!(%err, "failed to link notification with recipient, removing it");
            if let Err(err) = self.repository.delete(notification.id, recipient_id).await {
                tracing::error!(%err, "failed to remove unlinked notification");
            }

            return Err(match err {
                repository::Error::NoDocumentUpdated => Error::RecipientNotExist,
                err => Error::Database(err),
            });
        }

        let id = notification.id.to_hex();
        tracing::info!(id, "created notification");

        Ok(notification)
    }

    async fn send_bulk(
        &self,
        recipient_ids: &[ObjectId],
        notification: input::NotificationCreate,
    ) -> output::BulkSendResult {
        tracing::info!(count = recipient_ids.len(), "sending bulk notification");

        let results = join_all(recipient_ids.iter().map(|&recipient_id| {
            let notification = notification.clone();
            async move { (recipient_id, self.create(recipient_id, notification).await) }
        }))
        .await;

        let mut bulk_result = output::BulkSendResult::default();
        for (recipient_id, result) in results {
            match result {
                Ok(notification) => bulk_result.successful.push(notification),
                Err(error) => bulk_result.failed.push(output::BulkSendFailure {
                    recipient_id,
                    error,
                }),
            }
        }

        tracing::info!(
            successful = bulk_result.successful.len(),
            failed = bulk_result.failed.len(),
            "sent bulk notification"
        );

        bulk_result
    }

    async fn send_to_roles(
        &self,
        roles: &[UserRole],
        notification: input::NotificationCreate,
    ) -> Result<output::BulkSendResult, Error> {
        tracing::info!(?roles, "sending notification to roles");

        let recipient_ids = self
            .users_repository
            .find_by_roles(roles)
            .await?
            .into_iter()
            .map(|user| user.id)
            .collect::<Vec<_>>();

        if recipient_ids.is_empty() {
            tracing::warn!(?roles, "no users with roles");
            return Ok(output::BulkSendResult::default());
        }

        Ok(self.send_bulk(&recipient_ids, notification).await)
    }

    async fn mark_as_read(
        &self,
        id: ObjectId,
        recipient_id: ObjectId,
    ) -> Result<Notification, Error> {
        tracing::info!(%id, "marking notification as read");

        let notification = self
            .modify(id, Some(recipient_id), |notification, now| {
                notification.mark_read(now)
            })
            .await?;

        tracing::info!(status = notification.status.as_ref(), "marked notification as read");

        Ok(notification)
    }

    async fn mark_all_as_read(&self, recipient_id: ObjectId) -> Result<u64, Error> {
        tracing::info!(%recipient_id, "marking all notifications as read");

        let now = OffsetDateTime::now_utc();
        let expired = self
            .repository
            .expire_overdue(Some(recipient_id), now)
            .await?;
        let modified = self.repository.mark_all_as_read(recipient_id, now).await?;

        tracing::info!(expired, modified, "marked all notifications as read");

        Ok(modified)
    }

    async fn mark_as_clicked(
        &self,
        id: ObjectId,
        recipient_id: ObjectId,
    ) -> Result<Notification, Error> {
        tracing::info!(%id, "marking notification as clicked");

        let notification = self
            .modify(id, Some(recipient_id), |notification, now| {
                notification.mark_clicked(now)
            })
            .await?;

        tracing::info!("marked notification as clicked");

        Ok(notification)
    }

    async fn mark_as_delivered(&self, id: ObjectId) -> Result<Notification, Error> {
        tracing::info!(%id, "marking notification as delivered");

        let notification = self
            .modify(id, None, |notification, _| notification.mark_delivered())
            .await?;

        tracing::info!(status = notification.status.as_ref(), "marked notification as delivered");

        Ok(notification)
    }

    async fn get_unread_count(&self, recipient_id: ObjectId) -> Result<u64, Error> {
        let filters = input::NotificationFilters {
            unread_only: true,
            ..Default::default()
        };

        let count = self.repository.count(recipient_id, filters).await?;
        tracing::debug!(count, "counted unread notifications");

        Ok(count)
    }

    async fn list_for_recipient(
        &self,
        recipient_id: ObjectId,
        pagination: input::Pagination,
        filters: input::NotificationFilters,
    ) -> Result<output::NotificationsPage, Error> {
        tracing::info!(%recipient_id, "finding notifications");
        tracing::trace!(?pagination, ?filters);

        let pagination = pagination.normalized();
        let notifications = self
            .repository
            .find_many(recipient_id, pagination, filters.clone())
            .await?;
        let total = self.repository.count(recipient_id, filters).await?;

        tracing::info!(count = notifications.len(), total, "found notifications");

        Ok(output::NotificationsPage::new(
            notifications,
            pagination,
            total,
        ))
    }

    async fn get_stats(&self, recipient_id: ObjectId) -> Result<output::NotificationStats, Error> {
        tracing::info!(%recipient_id, "computing notification stats");

        let counts = self.repository.count_grouped(recipient_id).await?;
        let unread = self.get_unread_count(recipient_id).await?;
        let total = counts.by_status.iter().map(|(_, count)| count).sum();

        Ok(output::NotificationStats {
            total,
            unread,
            by_status: counts.by_status,
            by_type: counts.by_type,
        })
    }

    async fn delete(&self, id: ObjectId, recipient_id: ObjectId) -> Result<(), Error> {
        tracing::info!(%id, "deleting notification");

        self.repository
            .delete(id, recipient_id)
            .await
            .map_err(|err| match err {
                repository::Error::NoDocumentUpdated => Error::NotificationNotExist,
                err => Error::Database(err),
            })?;

        self.users_repository.pull_notifications(&[id]).await?;

        tracing::info!("deleted notification");

        Ok(())
    }

    async fn cleanup_old(&self, retention_days: u32) -> Result<u64, Error> {
        let cutoff = OffsetDateTime::now_utc() - Duration::days(i64::from(retention_days));
        tracing::info!(%cutoff, "cleaning up old notifications");

        let candidates = self.repository.find_cleanup_candidates(cutoff).await?;
        if candidates.is_empty() {
            tracing::info!("nothing to clean up");
            return Ok(0);
        }

        let ids = candidates
            .iter()
            .map(|candidate| candidate.id)
            .collect::<Vec<_>>();

        let deleted = self.repository.delete_many(&ids).await?;
        let unlinked = self.users_repository.pull_notifications(&ids).await?;

        tracing::info!(deleted, unlinked, "cleaned up old notifications");

        Ok(deleted)
    }

    async fn record_delivery_attempt(
        &self,
        id: ObjectId,
        attempt: input::DeliveryAttempt,
    ) -> Result<Notification, Error> {
        tracing::info!(
            %id,
            channel = attempt.channel.as_ref(),
            success = attempt.success,
            "recording delivery attempt"
        );
        tracing::trace!(?attempt);

        let notification = self
            .modify(id, None, |notification, now| {
                notification.record_attempt(attempt.clone(), now);
                true
            })
            .await?;

        tracing::info!(
            status = notification.status.as_ref(),
            retry_count = notification.retry_count,
            "recorded delivery attempt"
        );

        Ok(notification)
    }

    async fn find_deliverable(&self, limit: i64) -> Result<Vec<Notification>, Error> {
        let now = OffsetDateTime::now_utc();

        let mut notifications = self.repository.find_ready_for_delivery(now, limit).await?;

        let remaining = limit - notifications.len() as i64;
        if remaining > 0 {
            let retries = self.repository.find_retry_eligible(now, remaining).await?;
            notifications.extend(retries);
        }

        tracing::debug!(count = notifications.len(), "found deliverable notifications");

        Ok(notifications)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        dto::{DeliveryChannel, NotificationStatus, NotificationType},
        repository::{
            CleanupCandidate, MockNotificationsRepository, MockUsersRepository,
            NotificationCounts, User,
        },
    };
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    fn config() -> NotificationsServiceConfig {
        NotificationsServiceConfig {
            max_title_len: 20,
            max_message_len: 100,
            default_max_retries: 3,
            max_update_attempts: 3,
        }
    }

    fn input() -> input::NotificationCreate {
        input::NotificationCreate::new(
            NotificationType::System,
            "Maintenance",
            "Portal is unavailable tonight",
        )
    }

    fn stored_notification(recipient_id: ObjectId) -> Notification {
        Notification::new(recipient_id, input(), 3, OffsetDateTime::now_utc())
    }

    fn service(
        repository: MockNotificationsRepository,
        users_repository: MockUsersRepository,
    ) -> NotificationsServiceImpl {
        NotificationsServiceImpl::new(config(), Arc::new(repository), Arc::new(users_repository))
    }

    #[tokio::test]
    async fn create_ok() {
        let recipient_id = ObjectId::new();

        let mut repository = MockNotificationsRepository::new();
        repository.expect_insert().times(1).returning(|_| Ok(()));
        let mut users_repository = MockUsersRepository::new();
        users_repository
            .expect_push_notification()
            .withf(move |user_id, _| *user_id == recipient_id)
            .times(1)
            .returning(|_, _| Ok(()));

        let service = service(repository, users_repository);
        let notification = service.create(recipient_id, input()).await.unwrap();

        assert_eq!(notification.recipient_id, recipient_id);
        assert_eq!(notification.status, NotificationStatus::Pending);
        assert_eq!(notification.max_retries, 3);
    }

    #[tokio::test]
    async fn create_validation_empty_title() {
        let repository = MockNotificationsRepository::new();
        let users_repository = MockUsersRepository::new();
        let service = service(repository, users_repository);

        let mut notification = input();
        notification.title = "   ".to_string();

        let create_result = service.create(ObjectId::new(), notification).await;

        assert!(matches!(create_result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn create_validation_message_too_long() {
        let repository = MockNotificationsRepository::new();
        let users_repository = MockUsersRepository::new();
        let service = service(repository, users_repository);

        let mut notification = input();
        notification.message = "a".repeat(101);

        let create_result = service.create(ObjectId::new(), notification).await;

        assert!(matches!(
            create_result,
            Err(Error::Validation("message is too long"))
        ));
    }

    #[tokio::test]
    async fn create_validation_expires_at_passed() {
        let repository = MockNotificationsRepository::new();
        let users_repository = MockUsersRepository::new();
        let service = service(repository, users_repository);

        let mut notification = input();
        notification.expires_at = Some(OffsetDateTime::now_utc() - Duration::minutes(10));

        let create_result = service.create(ObjectId::new(), notification).await;

        assert!(matches!(create_result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn create_validation_no_channel_enabled() {
        let repository = MockNotificationsRepository::new();
        let users_repository = MockUsersRepository::new();
        let service = service(repository, users_repository);

        let mut notification = input();
        notification.channels = input::ChannelsSelection {
            push: false,
            email: false,
            sms: false,
        };

        let create_result = service.create(ObjectId::new(), notification).await;

        assert!(matches!(
            create_result,
            Err(Error::Validation("no delivery channel enabled"))
        ));
    }

    #[tokio::test]
    async fn create_recipient_not_exist_removes_notification() {
        let recipient_id = ObjectId::new();

        let mut repository = MockNotificationsRepository::new();
        repository.expect_insert().times(1).returning(|_| Ok(()));
        repository
            .expect_delete()
            .withf(move |_, user_id| *user_id == recipient_id)
            .times(1)
            .returning(|_, _| Ok(()));
        let mut users_repository = MockUsersRepository::new();
        users_repository
            .expect_push_notification()
            .returning(|_, _| Err(repository::Error::NoDocumentUpdated));

        let service = service(repository, users_repository);
        let create_result = service.create(recipient_id, input()).await;

        assert!(matches!(create_result, Err(Error::RecipientNotExist)));
    }

    #[tokio::test]
    async fn send_bulk_partial_failure() {
        let recipient_ids = [ObjectId::new(), ObjectId::new(), ObjectId::new()];
        let missing_id = recipient_ids[1];

        let mut repository = MockNotificationsRepository::new();
        repository.expect_insert().times(3).returning(|_| Ok(()));
        repository
            .expect_delete()
            .withf(move |_, user_id| *user_id == missing_id)
            .times(1)
            .returning(|_, _| Ok(()));
        let mut users_repository = MockUsersRepository::new();
        users_repository
            .expect_push_notification()
            .times(3)
            .returning(move |user_id, _| match user_id == missing_id {
                true => Err(repository::Error::NoDocumentUpdated),
                false => Ok(()),
            });

        let service = service(repository, users_repository);
        let bulk_result = service.send_bulk(&recipient_ids, input()).await;

        assert_eq!(bulk_result.successful.len(), 2);
        assert_eq!(bulk_result.failed.len(), 1);
        assert_eq!(bulk_result.failed[0].recipient_id, missing_id);
        assert!(matches!(
            bulk_result.failed[0].error,
            Error::RecipientNotExist
        ));
        assert_eq!(bulk_result.successful[0].recipient_id, recipient_ids[0]);
        assert_eq!(bulk_result.successful[1].recipient_id, recipient_ids[2]);
    }

    #[tokio::test]
    async fn send_bulk_validation_fails_every_recipient() {
        let recipient_ids = [ObjectId::new(), ObjectId::new()];

        let repository = MockNotificationsRepository::new();
        let users_repository = MockUsersRepository::new();
        let service = service(repository, users_repository);

        let mut notification = input();
        notification.title = String::new();
        let bulk_result = service.send_bulk(&recipient_ids, notification).await;

        assert!(bulk_result.successful.is_empty());
        assert_eq!(bulk_result.failed.len(), 2);
    }

    #[tokio::test]
    async fn send_to_roles_without_users() {
        let repository = MockNotificationsRepository::new();
        let mut users_repository = MockUsersRepository::new();
        users_repository
            .expect_find_by_roles()
            .times(1)
            .returning(|_| Ok(vec![]));

        let service = service(repository, users_repository);
        let bulk_result = service
            .send_to_roles(&[UserRole::Admin], input())
            .await
            .unwrap();

        assert!(bulk_result.successful.is_empty());
        assert!(bulk_result.failed.is_empty());
    }

    #[tokio::test]
    async fn send_to_roles_creates_per_user() {
        let mut repository = MockNotificationsRepository::new();
        repository.expect_insert().times(2).returning(|_| Ok(()));
        let mut users_repository = MockUsersRepository::new();
        users_repository
            .expect_find_by_roles()
            .withf(|roles| roles.to_vec() == vec![UserRole::Admin])
            .returning(|_| {
                Ok((0..2)
                    .map(|i| User {
                        id: ObjectId::new(),
                        name: format!("admin {i}"),
                        role: UserRole::Admin,
                        is_active: true,
                        date_of_birth: None,
                    })
                    .collect())
            });
        users_repository
            .expect_push_notification()
            .times(2)
            .returning(|_, _| Ok(()));

        let service = service(repository, users_repository);
        let bulk_result = service
            .send_to_roles(&[UserRole::Admin], input())
            .await
            .unwrap();

        assert_eq!(bulk_result.successful.len(), 2);
    }

    #[tokio::test]
    async fn mark_as_read_other_recipient() {
        let mut repository = MockNotificationsRepository::new();
        repository
            .expect_find_for_recipient()
            .returning(|_, _| Ok(None));
        repository.expect_replace().never();

        let service = service(repository, MockUsersRepository::new());
        let read_result = service.mark_as_read(ObjectId::new(), ObjectId::new()).await;

        assert!(matches!(read_result, Err(Error::NotificationNotExist)));
    }

    #[tokio::test]
    async fn mark_as_read_ok() {
        let recipient_id = ObjectId::new();
        let notification = stored_notification(recipient_id);

        let mut repository = MockNotificationsRepository::new();
        repository
            .expect_find_for_recipient()
            .returning(move |_, _| Ok(Some(notification.clone())));
        repository
            .expect_replace()
            .withf(|notification, expected_version| {
                *expected_version == 0 && notification.version == 1
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let service = service(repository, MockUsersRepository::new());
        let notification = service
            .mark_as_read(ObjectId::new(), recipient_id)
            .await
            .unwrap();

        assert_eq!(notification.status, NotificationStatus::Read);
        assert!(notification.read_at.is_some());
    }

    #[tokio::test]
    async fn mark_as_read_already_read_not_written() {
        let recipient_id = ObjectId::new();
        let mut notification = stored_notification(recipient_id);
        notification.mark_read(OffsetDateTime::now_utc() - Duration::hours(1));

        let mut repository = MockNotificationsRepository::new();
        repository
            .expect_find_for_recipient()
            .returning(move |_, _| Ok(Some(notification.clone())));
        repository.expect_replace().never();

        let service = service(repository, MockUsersRepository::new());
        let read_result = service.mark_as_read(ObjectId::new(), recipient_id).await;

        assert!(read_result.is_ok());
    }

    #[tokio::test]
    async fn mark_as_read_expired_notification() {
        let recipient_id = ObjectId::new();
        let mut notification = stored_notification(recipient_id);
        notification.expires_at = Some(OffsetDateTime::now_utc() - Duration::minutes(1));

        let mut repository = MockNotificationsRepository::new();
        repository
            .expect_find_for_recipient()
            .returning(move |_, _| Ok(Some(notification.clone())));
        repository
            .expect_replace()
            .times(1)
            .returning(|_, _| Ok(()));

        let service = service(repository, MockUsersRepository::new());
        let notification = service
            .mark_as_read(ObjectId::new(), recipient_id)
            .await
            .unwrap();

        assert!(notification.is_expired);
        assert_eq!(notification.status, NotificationStatus::Failed);
        assert_eq!(notification.read_at, None);
    }

    #[tokio::test]
    async fn mark_as_read_retries_on_conflict() {
        let recipient_id = ObjectId::new();
        let notification = stored_notification(recipient_id);
        let replace_calls = Arc::new(AtomicUsize::new(0));
        let replace_calls_clone = replace_calls.clone();

        let mut repository = MockNotificationsRepository::new();
        repository
            .expect_find_for_recipient()
            .times(2)
            .returning(move |_, _| Ok(Some(notification.clone())));
        repository.expect_replace().returning(move |_, _| {
            match replace_calls_clone.fetch_add(1, Ordering::SeqCst) {
                0 => Err(repository::Error::NoDocumentUpdated),
                _ => Ok(()),
            }
        });

        let service = service(repository, MockUsersRepository::new());
        let read_result = service.mark_as_read(ObjectId::new(), recipient_id).await;

        assert!(read_result.is_ok());
        assert_eq!(replace_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn mark_as_read_gives_up_after_attempts() {
        let recipient_id = ObjectId::new();
        let notification = stored_notification(recipient_id);

        let mut repository = MockNotificationsRepository::new();
        repository
            .expect_find_for_recipient()
            .times(3)
            .returning(move |_, _| Ok(Some(notification.clone())));
        repository
            .expect_replace()
            .times(3)
            .returning(|_, _| Err(repository::Error::NoDocumentUpdated));

        let service = service(repository, MockUsersRepository::new());
        let read_result = service.mark_as_read(ObjectId::new(), recipient_id).await;

        assert!(matches!(read_result, Err(Error::ConcurrentModification)));
    }

    #[tokio::test]
    async fn mark_all_as_read_idempotent() {
        let unread = Arc::new(AtomicUsize::new(2));

        let mut repository = MockNotificationsRepository::new();
        repository
            .expect_expire_overdue()
            .times(2)
            .returning(|_, _| Ok(0));
        repository
            .expect_mark_all_as_read()
            .times(2)
            .returning(move |_, _| Ok(unread.swap(0, Ordering::SeqCst) as u64));

        let service = service(repository, MockUsersRepository::new());
        let recipient_id = ObjectId::new();

        assert_eq!(service.mark_all_as_read(recipient_id).await.unwrap(), 2);
        assert_eq!(service.mark_all_as_read(recipient_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn record_delivery_attempt_retry_cap() {
        let stored = Arc::new(Mutex::new(stored_notification(ObjectId::new())));
        let stored_find = stored.clone();
        let stored_replace = stored.clone();
        let id = stored.lock().unwrap().id;

        let mut repository = MockNotificationsRepository::new();
        repository
            .expect_find()
            .returning(move |_| Ok(Some(stored_find.lock().unwrap().clone())));
        repository
            .expect_replace()
            .returning(move |notification, expected_version| {
                let mut stored = stored_replace.lock().unwrap();
                assert_eq!(stored.version, expected_version);
                *stored = notification.clone();
                Ok(())
            });

        let service = service(repository, MockUsersRepository::new());

        for _ in 0..4 {
            service
                .record_delivery_attempt(
                    id,
                    input::DeliveryAttempt::failed(DeliveryChannel::Push, "timeout"),
                )
                .await
                .unwrap();
        }

        let stored = stored.lock().unwrap();
        assert_eq!(stored.status, NotificationStatus::Failed);
        assert_eq!(stored.retry_count, 3);
        assert_eq!(stored.next_retry_at, None);
        assert_eq!(stored.delivery_attempts.len(), 4);
        assert_eq!(stored.version, 4);
    }

    #[tokio::test]
    async fn record_delivery_attempt_missing_notification() {
        let mut repository = MockNotificationsRepository::new();
        repository.expect_find().returning(|_| Ok(None));

        let service = service(repository, MockUsersRepository::new());
        let record_result = service
            .record_delivery_attempt(
                ObjectId::new(),
                input::DeliveryAttempt::succeeded(DeliveryChannel::Push, None),
            )
            .await;

        assert!(matches!(record_result, Err(Error::NotificationNotExist)));
    }

    #[tokio::test]
    async fn mark_as_delivered_only_sent() {
        let mut notification = stored_notification(ObjectId::new());
        notification.status = NotificationStatus::Sent;

        let mut repository = MockNotificationsRepository::new();
        repository
            .expect_find()
            .returning(move |_| Ok(Some(notification.clone())));
        repository
            .expect_replace()
            .times(1)
            .returning(|_, _| Ok(()));

        let service = service(repository, MockUsersRepository::new());
        let notification = service.mark_as_delivered(ObjectId::new()).await.unwrap();

        assert_eq!(notification.status, NotificationStatus::Delivered);
    }

    #[tokio::test]
    async fn delete_unlinks_recipient() {
        let id = ObjectId::new();

        let mut repository = MockNotificationsRepository::new();
        repository.expect_delete().times(1).returning(|_, _| Ok(()));
        let mut users_repository = MockUsersRepository::new();
        users_repository
            .expect_pull_notifications()
            .withf(move |ids| ids.to_vec() == vec![id])
            .times(1)
            .returning(|_| Ok(1));

        let service = service(repository, users_repository);

        assert!(service.delete(id, ObjectId::new()).await.is_ok());
    }

    #[tokio::test]
    async fn delete_other_recipient() {
        let mut repository = MockNotificationsRepository::new();
        repository
            .expect_delete()
            .returning(|_, _| Err(repository::Error::NoDocumentUpdated));
        let mut users_repository = MockUsersRepository::new();
        users_repository.expect_pull_notifications().never();

        let service = service(repository, users_repository);
        let delete_result = service.delete(ObjectId::new(), ObjectId::new()).await;

        assert!(matches!(delete_result, Err(Error::NotificationNotExist)));
    }

    #[tokio::test]
    async fn cleanup_old_unlinks_deleted() {
        let candidates = vec![
            CleanupCandidate {
                id: ObjectId::new(),
                recipient_id: ObjectId::new(),
            },
            CleanupCandidate {
                id: ObjectId::new(),
                recipient_id: ObjectId::new(),
            },
        ];
        let ids = candidates.iter().map(|c| c.id).collect::<Vec<_>>();
        let ids_clone = ids.clone();

        let mut repository = MockNotificationsRepository::new();
        repository
            .expect_find_cleanup_candidates()
            .withf(|cutoff| *cutoff < OffsetDateTime::now_utc() - Duration::days(29))
            .returning(move |_| Ok(candidates.clone()));
        repository
            .expect_delete_many()
            .withf(move |deleted| deleted.to_vec() == ids)
            .times(1)
            .returning(|ids| Ok(ids.len() as u64));
        let mut users_repository = MockUsersRepository::new();
        users_repository
            .expect_pull_notifications()
            .withf(move |pulled| pulled.to_vec() == ids_clone)
            .times(1)
            .returning(|_| Ok(2));

        let service = service(repository, users_repository);

        assert_eq!(service.cleanup_old(30).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn cleanup_old_nothing_to_delete() {
        let mut repository = MockNotificationsRepository::new();
        repository
            .expect_find_cleanup_candidates()
            .returning(|_| Ok(vec![]));
        repository.expect_delete_many().never();

        let service = service(repository, MockUsersRepository::new());

        assert_eq!(service.cleanup_old(30).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn list_for_recipient_normalizes_pagination() {
        let mut repository = MockNotificationsRepository::new();
        repository
            .expect_find_many()
            .withf(|_, pagination, _| pagination.page == 1 && pagination.limit == 100)
            .returning(|_, _, _| Ok(vec![]));
        repository.expect_count().returning(|_, _| Ok(250));

        let service = service(repository, MockUsersRepository::new());
        let page = service
            .list_for_recipient(
                ObjectId::new(),
                input::Pagination { page: 0, limit: 500 },
                input::NotificationFilters::default(),
            )
            .await
            .unwrap();

        assert_eq!(page.total, 250);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next_page);
        assert!(!page.has_previous_page);
    }

    #[tokio::test]
    async fn get_stats_sums_statuses() {
        let mut repository = MockNotificationsRepository::new();
        repository.expect_count_grouped().returning(|_| {
            Ok(NotificationCounts {
                by_status: vec![(NotificationStatus::Read, 4), (NotificationStatus::Sent, 2)],
                by_type: vec![(NotificationType::System, 6)],
            })
        });
        repository
            .expect_count()
            .withf(|_, filters| filters.unread_only)
            .returning(|_, _| Ok(2));

        let service = service(repository, MockUsersRepository::new());
        let stats = service.get_stats(ObjectId::new()).await.unwrap();

        assert_eq!(stats.total, 6);
        assert_eq!(stats.unread, 2);
        assert_eq!(stats.by_type, vec![(NotificationType::System, 6)]);
    }

    #[tokio::test]
    async fn find_deliverable_fills_with_retries() {
        let mut repository = MockNotificationsRepository::new();
        repository
            .expect_find_ready_for_delivery()
            .withf(|_, limit| *limit == 10)
            .returning(|_, _| Ok(vec![stored_notification(ObjectId::new())]));
        repository
            .expect_find_retry_eligible()
            .withf(|_, limit| *limit == 9)
            .times(1)
            .returning(|_, _| Ok(vec![stored_notification(ObjectId::new())]));

        let service = service(repository, MockUsersRepository::new());

        assert_eq!(service.find_deliverable(10).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn find_deliverable_full_batch_skips_retries() {
        let mut repository = MockNotificationsRepository::new();
        repository
            .expect_find_ready_for_delivery()
            .returning(|_, _| Ok(vec![stored_notification(ObjectId::new())]));
        repository.expect_find_retry_eligible().never();

        let service = service(repository, MockUsersRepository::new());

        assert_eq!(service.find_deliverable(1).await.unwrap().len(), 1);
    }
}

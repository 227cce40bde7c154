use super::{
    entity::{CleanupCandidateFindEntity, NotificationEntity},
    CleanupCandidate, Notification, NotificationCounts, NotificationsRepository,
};
use crate::{
    dto::{input, NotificationStatus, NotificationType},
    repository::Error,
};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Bson, DateTime, Document};
use futures_util::TryStreamExt;
use mongodb::{
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use std::str::FromStr;
use time::OffsetDateTime;

const NOTIFICATIONS: &str = "notifications";
const INDEX_NAME_RECIPIENT_CREATED_AT: &str = "index_recipient_id_created_at";
const INDEX_NAME_STATUS_NEXT_RETRY_AT: &str = "index_status_next_retry_at";

pub struct NotificationsRepositoryImpl {
    database: Database,
}

impl NotificationsRepositoryImpl {
    pub async fn new(database: Database) -> Result<Self, mongodb::error::Error> {
        let collection_names = database.list_collection_names().await?;
        if !collection_names.iter().any(|name| name == NOTIFICATIONS) {
            tracing::debug!(collection = NOTIFICATIONS, "creating collection");
            database.create_collection(NOTIFICATIONS).await?;
        }

        let collection = database.collection::<Document>(NOTIFICATIONS);

        tracing::debug!("fetching index names");
        let index_names = collection.list_index_names().await?;

        if !index_names.contains(&INDEX_NAME_RECIPIENT_CREATED_AT.to_string()) {
            Self::create_index(
                &collection,
                INDEX_NAME_RECIPIENT_CREATED_AT,
                doc! { "recipient_id": 1, "created_at": -1 },
            )
            .await?;
        }
        if !index_names.contains(&INDEX_NAME_STATUS_NEXT_RETRY_AT.to_string()) {
            Self::create_index(
                &collection,
                INDEX_NAME_STATUS_NEXT_RETRY_AT,
                doc! { "status": 1, "next_retry_at": 1 },
            )
            .await?;
        }

        Ok(Self { database })
    }

    async fn create_index(
        collection: &Collection<Document>,
        name: &'static str,
        keys: Document,
    ) -> Result<(), mongodb::error::Error> {
        let index = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().name(name.to_string()).build())
            .build();

        collection.create_index(index).await?;
        tracing::debug!(collection = NOTIFICATIONS, index = name, "created index");

        Ok(())
    }

    fn collection(&self) -> Collection<NotificationEntity> {
        self.database.collection(NOTIFICATIONS)
    }

    ///
    /// Expired notifications are not unread even before they are flagged
    ///
    fn unread_filter(now: DateTime) -> Document {
        doc! {
            "read_at": None as Option<DateTime>,
            "status": { "$ne": NotificationStatus::Failed.as_ref() },
            "$and": [Self::not_expired_filter(now)],
        }
    }

    fn recipient_filter(
        recipient_id: ObjectId,
        filters: &input::NotificationFilters,
        now: DateTime,
    ) -> Document {
        let mut filter = doc! { "recipient_id": recipient_id };
        if let Some(notification_type) = filters.notification_type {
            filter.insert("notification_type", notification_type.as_ref());
        }
        if filters.unread_only {
            filter.extend(Self::unread_filter(now));
        }

        filter
    }

    fn not_expired_filter(now: DateTime) -> Document {
        doc! {
            "$or": [
                { "expires_at": None as Option<DateTime> },
                { "expires_at": { "$gt": now } },
            ]
        }
    }

    fn count_from(document: &Document) -> u64 {
        match document.get("count") {
            Some(Bson::Int32(count)) => u64::try_from(*count).unwrap_or_default(),
            Some(Bson::Int64(count)) => u64::try_from(*count).unwrap_or_default(),
            _ => 0,
        }
    }

    async fn group_by(
        &self,
        recipient_id: ObjectId,
        field: &'static str,
    ) -> Result<Vec<(String, u64)>, Error> {
        let groups = self
            .database
            .collection::<Document>(NOTIFICATIONS)
            .aggregate(vec![
                doc! { "$match": { "recipient_id": recipient_id } },
                doc! { "$group": { "_id": format!("${field}"), "count": { "$sum": 1 } } },
                doc! { "$sort": { "_id": 1 } },
            ])
            .await?
            .try_collect::<Vec<Document>>()
            .await?
            .into_iter()
            .filter_map(|document| {
                let key = document.get_str("_id").ok()?.to_string();
                Some((key, Self::count_from(&document)))
            })
            .collect();

        Ok(groups)
    }
}

#[async_trait]
impl NotificationsRepository for NotificationsRepositoryImpl {
    async fn insert(&self, notification: &Notification) -> Result<(), Error> {
        let insert_entity = NotificationEntity::from(notification);

        self.collection()
            .insert_one(&insert_entity)
            .await
            .map_err(|err| {
                let ErrorKind::Write(ref write_failure) = *err.kind else {
                    return Error::Mongo(err);
                };

                let WriteFailure::WriteError(write_error) = write_failure else {
                    return Error::Mongo(err);
                };

                const DUPLICATE_KEY_CODE: i32 = 11000;
                match write_error.code == DUPLICATE_KEY_CODE {
                    true => Error::InsertUniqueViolation,
                    false => Error::Mongo(err),
                }
            })?;

        Ok(())
    }

    async fn find(&self, id: ObjectId) -> Result<Option<Notification>, Error> {
        let notification = self
            .collection()
            .find_one(doc! { "_id": id })
            .await?
            .map(Notification::from);

        Ok(notification)
    }

    async fn find_for_recipient(
        &self,
        id: ObjectId,
        recipient_id: ObjectId,
    ) -> Result<Option<Notification>, Error> {
        let notification = self
            .collection()
            .find_one(doc! {
                "_id": id,
                "recipient_id": recipient_id,
            })
            .await?
            .map(Notification::from);

        Ok(notification)
    }

    async fn replace(
        &self,
        notification: &Notification,
        expected_version: i64,
    ) -> Result<(), Error> {
        let replacement = NotificationEntity::from(notification);

        let update_result = self
            .collection()
            .replace_one(
                doc! {
                    "_id": notification.id,
                    "version": expected_version,
                },
                &replacement,
            )
            .await?;

        match update_result.matched_count == 1 {
            true => Ok(()),
            false => Err(Error::NoDocumentUpdated),
        }
    }

    async fn delete(&self, id: ObjectId, recipient_id: ObjectId) -> Result<(), Error> {
        let delete_result = self
            .collection()
            .delete_one(doc! {
                "_id": id,
                "recipient_id": recipient_id,
            })
            .await?;

        match delete_result.deleted_count == 1 {
            true => Ok(()),
            false => Err(Error::NoDocumentUpdated),
        }
    }

    async fn delete_many(&self, ids: &[ObjectId]) -> Result<u64, Error> {
        if ids.is_empty() {
            return Ok(0);
        }

        let delete_result = self
            .collection()
            .delete_many(doc! { "_id": { "$in": ids } })
            .await?;

        Ok(delete_result.deleted_count)
    }

    async fn find_many(
        &self,
        recipient_id: ObjectId,
        pagination: input::Pagination,
        filters: input::NotificationFilters,
    ) -> Result<Vec<Notification>, Error> {
        let notifications = self
            .collection()
            .find(Self::recipient_filter(recipient_id, &filters, DateTime::now()))
            .sort(doc! { "created_at": -1 })
            .skip(pagination.skip())
            .limit(i64::from(pagination.limit))
            .await?
            .map_ok(Notification::from)
            .try_collect()
            .await?;

        Ok(notifications)
    }

    async fn count(
        &self,
        recipient_id: ObjectId,
        filters: input::NotificationFilters,
    ) -> Result<u64, Error> {
        let count = self
            .collection()
            .count_documents(Self::recipient_filter(
                recipient_id,
                &filters,
                DateTime::now(),
            ))
            .await?;

        Ok(count)
    }

    async fn mark_all_as_read(
        &self,
        recipient_id: ObjectId,
        read_at: OffsetDateTime,
    ) -> Result<u64, Error> {
        let read_at = DateTime::from(read_at);
        let mut filter = doc! { "recipient_id": recipient_id };
        filter.extend(Self::unread_filter(read_at));

        let update_result = self
            .collection()
            .update_many(
                filter,
                doc! {
                    "$set": {
                        "read_at": read_at,
                        "status": NotificationStatus::Read.as_ref(),
                        "updated_at": read_at,
                    },
                    "$inc": { "version": 1 },
                },
            )
            .await?;

        Ok(update_result.modified_count)
    }

    async fn expire_overdue(
        &self,
        recipient_id: Option<ObjectId>,
        now: OffsetDateTime,
    ) -> Result<u64, Error> {
        let now = DateTime::from(now);
        let mut filter = doc! {
            "is_expired": false,
            "expires_at": { "$ne": None as Option<DateTime>, "$lte": now },
        };
        if let Some(recipient_id) = recipient_id {
            filter.insert("recipient_id", recipient_id);
        }

        let read = NotificationStatus::Read.as_ref();
        let update_result = self
            .collection()
            .update_many(
                filter,
                vec![doc! {
                    "$set": {
                        "is_expired": true,
                        "status": {
                            "$cond": [{ "$eq": ["$status", read] }, read, NotificationStatus::Failed.as_ref()]
                        },
                        "next_retry_at": Bson::Null,
                        "updated_at": now,
                        "version": { "$add": ["$version", 1] },
                    }
                }],
            )
            .await?;

        Ok(update_result.modified_count)
    }

    async fn find_ready_for_delivery(
        &self,
        now: OffsetDateTime,
        limit: i64,
    ) -> Result<Vec<Notification>, Error> {
        let now = DateTime::from(now);

        let notifications = self
            .collection()
            .find(doc! {
                "status": NotificationStatus::Pending.as_ref(),
                "is_expired": false,
                "$and": [
                    {
                        "$or": [
                            { "scheduled_for": None as Option<DateTime> },
                            { "scheduled_for": { "$lte": now } },
                        ]
                    },
                    Self::not_expired_filter(now),
                ],
            })
            .sort(doc! { "created_at": 1 })
            .limit(limit)
            .await?
            .map_ok(Notification::from)
            .try_collect()
            .await?;

        Ok(notifications)
    }

    async fn find_retry_eligible(
        &self,
        now: OffsetDateTime,
        limit: i64,
    ) -> Result<Vec<Notification>, Error> {
        let now = DateTime::from(now);

        let notifications = self
            .collection()
            .find(doc! {
                "status": NotificationStatus::Failed.as_ref(),
                "is_expired": false,
                "next_retry_at": { "$lte": now },
                "$expr": { "$lt": ["$retry_count", "$max_retries"] },
                "$and": [Self::not_expired_filter(now)],
            })
            .sort(doc! { "next_retry_at": 1 })
            .limit(limit)
            .await?
            .map_ok(Notification::from)
            .try_collect()
            .await?;

        Ok(notifications)
    }

    async fn find_cleanup_candidates(
        &self,
        cutoff: OffsetDateTime,
    ) -> Result<Vec<CleanupCandidate>, Error> {
        let cutoff = DateTime::from(cutoff);

        let candidates = self
            .database
            .collection::<CleanupCandidateFindEntity>(NOTIFICATIONS)
            .find(doc! {
                "$or": [
                    {
                        "status": NotificationStatus::Read.as_ref(),
                        "created_at": { "$lt": cutoff },
                    },
                    {
                        "expires_at": { "$ne": None as Option<DateTime>, "$lt": cutoff },
                    },
                ]
            })
            .projection(doc! {
                "_id": 1,
                "recipient_id": 1,
            })
            .await?
            .map_ok(CleanupCandidate::from)
            .try_collect()
            .await?;

        Ok(candidates)
    }

    async fn count_grouped(&self, recipient_id: ObjectId) -> Result<NotificationCounts, Error> {
        let by_status = self
            .group_by(recipient_id, "status")
            .await?
            .into_iter()
            .filter_map(|(key, count)| Some((NotificationStatus::from_str(&key).ok()?, count)))
            .collect();

        let by_type = self
            .group_by(recipient_id, "notification_type")
            .await?
            .into_iter()
            .filter_map(|(key, count)| Some((NotificationType::from_str(&key).ok()?, count)))
            .collect();

        Ok(NotificationCounts { by_status, by_type })
    }
}

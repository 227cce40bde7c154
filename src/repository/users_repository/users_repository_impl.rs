use super::{entity::UserFindEntity, User, UsersRepository};
use crate::{dto::UserRole, repository::Error};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures_util::TryStreamExt;
use mongodb::{options::IndexOptions, Database, IndexModel};
use strum::IntoEnumIterator;

const USERS: &str = "users";
const INDEX_NAME_ROLE: &str = "index_role";

pub struct UsersRepositoryImpl {
    database: Database,
}

impl UsersRepositoryImpl {
    pub async fn new(database: Database) -> Result<Self, mongodb::error::Error> {
        let collection = database.collection::<Document>(USERS);

        tracing::debug!("fetching index names");
        let index_names = match collection.list_index_names().await {
            Ok(index_names) => index_names,
            // collection does not exist yet
            Err(_) => Vec::new(),
        };

        if !index_names.contains(&INDEX_NAME_ROLE.to_string()) {
            collection
                .create_index(
                    IndexModel::builder()
                        .keys(doc! { "role": 1 })
                        .options(
                            IndexOptions::builder()
                                .name(INDEX_NAME_ROLE.to_string())
                                .build(),
                        )
                        .build(),
                )
                .await?;
            tracing::debug!(collection = USERS, index = INDEX_NAME_ROLE, "created index");
        }

        Ok(Self { database })
    }

    ///
    /// Documents with roles unknown to this service are left out
    ///
    fn known_roles() -> Vec<&'static str> {
        UserRole::iter().map(<&'static str>::from).collect()
    }

    fn projection() -> Document {
        doc! {
            "_id": 1,
            "name": 1,
            "role": 1,
            "is_active": 1,
            "date_of_birth": 1,
        }
    }
}

#[async_trait]
impl UsersRepository for UsersRepositoryImpl {
    async fn find_by_roles(&self, roles: &[UserRole]) -> Result<Vec<User>, Error> {
        let roles = roles.iter().map(|role| role.as_ref()).collect::<Vec<_>>();

        let users = self
            .database
            .collection::<UserFindEntity>(USERS)
            .find(doc! {
                "role": { "$in": roles },
                "is_active": { "$ne": false },
            })
            .projection(Self::projection())
            .await?
            .map_ok(User::from)
            .try_collect()
            .await?;

        Ok(users)
    }

    async fn find_by_birthday(&self, month: u8, day: u8) -> Result<Vec<User>, Error> {
        let users = self
            .database
            .collection::<UserFindEntity>(USERS)
            .find(doc! {
                "role": { "$in": Self::known_roles() },
                "is_active": { "$ne": false },
                "date_of_birth": { "$type": "date" },
                "$expr": {
                    "$and": [
                        { "$eq": [{ "$month": "$date_of_birth" }, i32::from(month)] },
                        { "$eq": [{ "$dayOfMonth": "$date_of_birth" }, i32::from(day)] },
                    ]
                },
            })
            .projection(Self::projection())
            .await?
            .map_ok(User::from)
            .try_collect()
            .await?;

        Ok(users)
    }

    async fn push_notification(
        &self,
        user_id: ObjectId,
        notification_id: ObjectId,
    ) -> Result<(), Error> {
        let update_result = self
            .database
            .collection::<Document>(USERS)
            .update_one(
                doc! { "_id": user_id },
                doc! {
                    "$push": { "notifications": notification_id }
                },
            )
            .await?;

        match update_result.matched_count == 1 {
            true => Ok(()),
            false => Err(Error::NoDocumentUpdated),
        }
    }

    async fn pull_notifications(&self, notification_ids: &[ObjectId]) -> Result<u64, Error> {
        if notification_ids.is_empty() {
            return Ok(0);
        }

        let update_result = self
            .database
            .collection::<Document>(USERS)
            .update_many(
                doc! { "notifications": { "$in": notification_ids } },
                doc! {
                    "$pull": { "notifications": { "$in": notification_ids } }
                },
            )
            .await?;

        Ok(update_result.modified_count)
    }
}

///
/// Tests require env variables to be set and database to be running
///
#[cfg(test)]
mod test {
    use super::*;
    use crate::repository::test::{create_test_database, destroy_test_database};
    use bson::DateTime;
    use time::macros::datetime;

    #[tokio::test]
    #[ignore = "requires running MongoDB"]
    async fn push_notification_user_not_exist() -> anyhow::Result<()> {
        let database = create_test_database().await?;
        let repository = UsersRepositoryImpl::new(database.clone()).await?;

        let push_result = repository
            .push_notification(ObjectId::new(), ObjectId::new())
            .await;

        assert!(matches!(push_result, Err(Error::NoDocumentUpdated)));

        destroy_test_database(database).await;

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires running MongoDB"]
    async fn push_and_pull_notification() -> anyhow::Result<()> {
        let database = create_test_database().await?;
        let repository = UsersRepositoryImpl::new(database.clone()).await?;
        let collection = database.collection::<Document>(USERS);

        let user_id = ObjectId::new();
        collection
            .insert_one(doc! {
                "_id": user_id,
                "name": "Ravi",
                "role": "officer",
                "notifications": [],
            })
            .await?;

        let notification_id = ObjectId::new();
        repository.push_notification(user_id, notification_id).await?;

        let document = collection.find_one(doc! { "_id": user_id }).await?.unwrap();
        assert_eq!(document.get_array("notifications")?.len(), 1);

        let modified = repository.pull_notifications(&[notification_id]).await?;
        assert_eq!(modified, 1);

        let document = collection.find_one(doc! { "_id": user_id }).await?.unwrap();
        assert!(document.get_array("notifications")?.is_empty());

        destroy_test_database(database).await;

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires running MongoDB"]
    async fn find_by_birthday_ignores_year() -> anyhow::Result<()> {
        let database = create_test_database().await?;
        let repository = UsersRepositoryImpl::new(database.clone()).await?;
        let collection = database.collection::<Document>(USERS);

        let birthday_id = ObjectId::new();
        collection
            .insert_many(vec![
                doc! {
                    "_id": birthday_id,
                    "name": "Anita",
                    "role": "family_member",
                    "date_of_birth": DateTime::from(datetime!(1985-03-14 00:00 UTC)),
                },
                doc! {
                    "_id": ObjectId::new(),
                    "name": "Suresh",
                    "role": "officer",
                    "date_of_birth": DateTime::from(datetime!(1985-03-15 00:00 UTC)),
                },
                doc! {
                    "_id": ObjectId::new(),
                    "name": "Meena",
                    "role": "officer",
                    "is_active": false,
                    "date_of_birth": DateTime::from(datetime!(1990-03-14 00:00 UTC)),
                },
            ])
            .await?;

        let users = repository.find_by_birthday(3, 14).await?;

        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, birthday_id);

        destroy_test_database(database).await;

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires running MongoDB"]
    async fn find_by_birthday_skips_unknown_role_and_keeps_nameless() -> anyhow::Result<()> {
        let database = create_test_database().await?;
        let repository = UsersRepositoryImpl::new(database.clone()).await?;
        let collection = database.collection::<Document>(USERS);

        let nameless_id = ObjectId::new();
        collection
            .insert_many(vec![
                doc! {
                    "_id": ObjectId::new(),
                    "name": "Kiran",
                    "role": "veteran",
                    "date_of_birth": DateTime::from(datetime!(1970-07-01 00:00 UTC)),
                },
                doc! {
                    "_id": nameless_id,
                    "role": "family_member",
                    "date_of_birth": DateTime::from(datetime!(2001-07-01 00:00 UTC)),
                },
            ])
            .await?;

        let users = repository.find_by_birthday(7, 1).await?;

        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, nameless_id);
        assert!(users[0].name.is_empty());

        destroy_test_database(database).await;

        Ok(())
    }
}

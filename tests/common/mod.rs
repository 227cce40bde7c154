//!
//! Helpers shared by tests running against MongoDB.
//!
//! Every test works in its own throwaway database built from
//! WELFARE_NOTIFIER_DB_CONNECTION_STRING and WELFARE_NOTIFIER_DB_NAME.
//!
use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::{options::ClientOptions, Client, Database};
use std::sync::Arc;
use time::OffsetDateTime;
use uuid::Uuid;
use welfare_notifier::{
    application::ApplicationEnv,
    repository::{NotificationsRepositoryImpl, UsersRepositoryImpl},
    service::NotificationsServiceImpl,
};

pub async fn create_test_database() -> (ApplicationEnv, Database) {
    let _ = dotenvy::dotenv();
    let env = ApplicationEnv::parse().unwrap();
    let db_name = format!("test_{}_{}", env.db_name, Uuid::new_v4());

    let db_client_options = ClientOptions::parse(&env.db_connection_string)
        .await
        .unwrap();
    let db_client = Client::with_options(db_client_options).unwrap();
    let database = db_client.database(&db_name);

    (env, database)
}

pub async fn destroy_test_database(database: Database) {
    let _ = database.drop().await;
    database.client().clone().shutdown().await;
}

pub async fn insert_user(database: &Database, role: &str) -> ObjectId {
    let id = ObjectId::new();
    database
        .collection::<Document>("users")
        .insert_one(doc! {
            "_id": id,
            "name": format!("{role} {id}"),
            "role": role,
            "is_active": true,
            "notifications": [],
        })
        .await
        .unwrap();

    id
}

pub async fn user_notification_ids(database: &Database, user_id: ObjectId) -> Vec<ObjectId> {
    let user = database
        .collection::<Document>("users")
        .find_one(doc! { "_id": user_id })
        .await
        .unwrap()
        .unwrap();

    user.get_array("notifications")
        .unwrap()
        .iter()
        .filter_map(|id| id.as_object_id())
        .collect()
}

pub async fn count_notifications(database: &Database, filter: Document) -> u64 {
    database
        .collection::<Document>("notifications")
        .count_documents(filter)
        .await
        .unwrap()
}

pub fn days_from_now(days: i64) -> DateTime {
    DateTime::from(OffsetDateTime::now_utc() + time::Duration::days(days))
}

pub async fn create_notifications_service(
    env: &ApplicationEnv,
    database: &Database,
) -> Arc<NotificationsServiceImpl> {
    let notifications_repository = NotificationsRepositoryImpl::new(database.clone())
        .await
        .unwrap();
    let users_repository = UsersRepositoryImpl::new(database.clone()).await.unwrap();

    Arc::new(NotificationsServiceImpl::new(
        env.notifications_service_config(),
        Arc::new(notifications_repository),
        Arc::new(users_repository),
    ))
}

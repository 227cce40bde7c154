use super::{entity::ApplicationFindEntity, Application, ApplicationStatus, ApplicationsRepository};
use crate::repository::Error;
use async_trait::async_trait;
use bson::{doc, DateTime};
use futures_util::TryStreamExt;
use mongodb::Database;
use time::OffsetDateTime;

const APPLICATIONS: &str = "applications";

pub struct ApplicationsRepositoryImpl {
    database: Database,
}

impl ApplicationsRepositoryImpl {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl ApplicationsRepository for ApplicationsRepositoryImpl {
    async fn find_pending_created_before(
        &self,
        created_before: OffsetDateTime,
    ) -> Result<Vec<Application>, Error> {
        let applications = self
            .database
            .collection::<ApplicationFindEntity>(APPLICATIONS)
            .find(doc! {
                "status": ApplicationStatus::Pending.as_ref(),
                "created_at": { "$lt": DateTime::from(created_before) },
            })
            .sort(doc! { "created_at": 1 })
            .await?
            .map_ok(Application::from)
            .try_collect()
            .await?;

        Ok(applications)
    }
}

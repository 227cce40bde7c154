use super::{entity::SchemeFindEntity, Scheme, SchemeStatus, SchemesRepository};
use crate::repository::Error;
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, DateTime, Document};
use futures_util::TryStreamExt;
use mongodb::{Collection, Database};
use time::OffsetDateTime;

const WELFARE_SCHEMES: &str = "welfare_schemes";

pub struct SchemesRepositoryImpl {
    database: Database,
}

impl SchemesRepositoryImpl {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    fn collection(&self) -> Collection<SchemeFindEntity> {
        self.database.collection(WELFARE_SCHEMES)
    }

    async fn find_schemes(
        &self,
        filter: Document,
        limit: Option<i64>,
    ) -> Result<Vec<Scheme>, Error> {
        let schemes = self
            .collection()
            .find(filter)
            .sort(doc! { "application_deadline": 1 })
            .limit(limit.unwrap_or_default())
            .await?
            .map_ok(Scheme::from)
            .try_collect()
            .await?;

        Ok(schemes)
    }
}

#[async_trait]
impl SchemesRepository for SchemesRepositoryImpl {
    async fn find_active_with_deadline_between(
        &self,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<Scheme>, Error> {
        self.find_schemes(
            doc! {
                "status": SchemeStatus::Active.as_ref(),
                "application_deadline": {
                    "$gte": DateTime::from(from),
                    "$lte": DateTime::from(to),
                },
            },
            None,
        )
        .await
    }

    async fn find_active_open(
        &self,
        now: OffsetDateTime,
        limit: i64,
    ) -> Result<Vec<Scheme>, Error> {
        self.find_schemes(
            doc! {
                "status": SchemeStatus::Active.as_ref(),
                "application_deadline": { "$gt": DateTime::from(now) },
            },
            Some(limit),
        )
        .await
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Scheme>, Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        self.find_schemes(doc! { "_id": { "$in": ids } }, None).await
    }
}

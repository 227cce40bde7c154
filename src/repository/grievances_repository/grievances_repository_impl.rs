use super::{entity::GrievanceFindEntity, Grievance, GrievanceStatus, GrievancesRepository};
use crate::repository::Error;
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, DateTime, Document};
use futures_util::TryStreamExt;
use mongodb::Database;
use time::OffsetDateTime;

const GRIEVANCES: &str = "grievances";

pub struct GrievancesRepositoryImpl {
    database: Database,
}

impl GrievancesRepositoryImpl {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl GrievancesRepository for GrievancesRepositoryImpl {
    async fn find_by_status_created_before(
        &self,
        statuses: &[GrievanceStatus],
        created_before: OffsetDateTime,
    ) -> Result<Vec<Grievance>, Error> {
        let statuses = statuses
            .iter()
            .map(|status| status.as_ref())
            .collect::<Vec<_>>();

        let grievances = self
            .database
            .collection::<GrievanceFindEntity>(GRIEVANCES)
            .find(doc! {
                "status": { "$in": statuses },
                "created_at": { "$lt": DateTime::from(created_before) },
            })
            .sort(doc! { "created_at": 1 })
            .await?
            .map_ok(Grievance::from)
            .try_collect()
            .await?;

        Ok(grievances)
    }

    async fn escalate(&self, id: ObjectId, escalated_at: OffsetDateTime) -> Result<(), Error> {
        let escalated = GrievanceStatus::Escalated.as_ref();
        let escalated_at = DateTime::from(escalated_at);

        let update_result = self
            .database
            .collection::<Document>(GRIEVANCES)
            .update_one(
                doc! {
                    "_id": id,
                    "status": { "$ne": escalated },
                },
                doc! {
                    "$set": {
                        "status": escalated,
                        "escalated_at": escalated_at,
                        "updated_at": escalated_at,
                    }
                },
            )
            .await?;

        match update_result.modified_count == 1 {
            true => Ok(()),
            false => Err(Error::NoDocumentUpdated),
        }
    }
}

///
/// Tests require env variables to be set and database to be running
///
#[cfg(test)]
mod test {
    use super::*;
    use crate::repository::test::{create_test_database, destroy_test_database};
    use time::Duration;

    #[tokio::test]
    #[ignore = "requires running MongoDB"]
    async fn escalate_only_once() -> anyhow::Result<()> {
        let database = create_test_database().await?;
        let repository = GrievancesRepositoryImpl::new(database.clone());

        let id = ObjectId::new();
        let now = OffsetDateTime::now_utc();
        database
            .collection::<Document>(GRIEVANCES)
            .insert_one(doc! {
                "_id": id,
                "ticket_number": "GRV-0001",
                "title": "Pension not credited",
                "submitted_by": ObjectId::new(),
                "assigned_to": None as Option<ObjectId>,
                "status": "pending",
                "created_at": DateTime::from(now - Duration::days(11)),
            })
            .await?;

        repository.escalate(id, now).await?;
        let escalate_result = repository.escalate(id, now).await;
        assert!(matches!(escalate_result, Err(Error::NoDocumentUpdated)));

        let overdue = repository
            .find_by_status_created_before(&GrievanceStatus::UNRESOLVED, now)
            .await?;
        assert!(overdue.is_empty());

        destroy_test_database(database).await;

        Ok(())
    }
}

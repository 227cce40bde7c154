use crate::repository::ApplicationStatus;
use bson::{oid::ObjectId, DateTime};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct ApplicationFindEntity {
    pub _id: ObjectId,

    pub scheme_id: ObjectId,
    pub applicant_id: ObjectId,
    pub status: ApplicationStatus,

    pub created_at: DateTime,
}

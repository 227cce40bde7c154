use crate::repository::applications_repository::entity::ApplicationFindEntity;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use strum::AsRefStr;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    pub id: ObjectId,
    pub scheme_id: ObjectId,
    pub applicant_id: ObjectId,
    pub status: ApplicationStatus,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    UnderReview,
    Approved,
    Rejected,
}

impl From<ApplicationFindEntity> for Application {
    fn from(value: ApplicationFindEntity) -> Self {
        Self {
            id: value._id,
            scheme_id: value.scheme_id,
            applicant_id: value.applicant_id,
            status: value.status,
            created_at: value.created_at.into(),
        }
    }
}

use crate::repository::grievances_repository::entity::GrievanceFindEntity;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use strum::AsRefStr;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct Grievance {
    pub id: ObjectId,
    pub ticket_number: String,
    pub title: String,
    pub submitted_by: ObjectId,
    pub assigned_to: Option<ObjectId>,
    pub status: GrievanceStatus,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GrievanceStatus {
    Pending,
    Open,
    InProgress,
    Escalated,
    Resolved,
    Closed,
}

impl GrievanceStatus {
    ///
    /// Statuses in which a grievance still waits for a resolution
    ///
    pub const UNRESOLVED: [GrievanceStatus; 3] = [
        GrievanceStatus::Pending,
        GrievanceStatus::Open,
        GrievanceStatus::InProgress,
    ];
}

impl From<GrievanceFindEntity> for Grievance {
    fn from(value: GrievanceFindEntity) -> Self {
        Self {
            id: value._id,
            ticket_number: value.ticket_number,
            title: value.title,
            submitted_by: value.submitted_by,
            assigned_to: value.assigned_to,
            status: value.status,
            created_at: value.created_at.into(),
        }
    }
}

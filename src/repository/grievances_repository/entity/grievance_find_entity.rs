use crate::repository::GrievanceStatus;
use bson::{oid::ObjectId, DateTime};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct GrievanceFindEntity {
    pub _id: ObjectId,

    pub ticket_number: String,
    pub title: String,

    pub submitted_by: ObjectId,
    pub assigned_to: Option<ObjectId>,
    pub status: GrievanceStatus,

    pub created_at: DateTime,
}

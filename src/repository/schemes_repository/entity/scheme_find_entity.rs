use crate::{dto::UserRole, repository::SchemeStatus};
use bson::{oid::ObjectId, DateTime};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct SchemeFindEntity {
    pub _id: ObjectId,

    pub title: String,
    pub status: SchemeStatus,
    pub application_deadline: Option<DateTime>,

    #[serde(default)]
    pub target_roles: Vec<UserRole>,
}

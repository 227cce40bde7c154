use crate::{dto::UserRole, repository::schemes_repository::entity::SchemeFindEntity};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use strum::AsRefStr;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct Scheme {
    pub id: ObjectId,
    pub title: String,
    pub status: SchemeStatus,
    pub application_deadline: Option<OffsetDateTime>,
    ///
    /// Roles allowed to apply, empty means every officer and family member
    ///
    pub target_roles: Vec<UserRole>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SchemeStatus {
    Draft,
    Active,
    Inactive,
    Closed,
}

impl Scheme {
    pub fn eligible_roles(&self) -> Vec<UserRole> {
        match self.target_roles.is_empty() {
            true => vec![UserRole::Officer, UserRole::FamilyMember],
            false => self.target_roles.clone(),
        }
    }
}

impl From<SchemeFindEntity> for Scheme {
    fn from(value: SchemeFindEntity) -> Self {
        Self {
            id: value._id,
            title: value.title,
            status: value.status,
            application_deadline: value.application_deadline.map(OffsetDateTime::from),
            target_roles: value.target_roles,
        }
    }
}

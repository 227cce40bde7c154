use crate::{dto::UserRole, repository::users_repository::entity::UserFindEntity};
use bson::oid::ObjectId;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: ObjectId,
    pub name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub date_of_birth: Option<OffsetDateTime>,
}

impl From<UserFindEntity> for User {
    fn from(value: UserFindEntity) -> Self {
        Self {
            id: value._id,
            name: value.name,
            role: value.role,
            is_active: value.is_active,
            date_of_birth: value.date_of_birth.map(OffsetDateTime::from),
        }
    }
}

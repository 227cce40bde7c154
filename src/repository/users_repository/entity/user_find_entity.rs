use crate::dto::UserRole;
use bson::{oid::ObjectId, DateTime};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct UserFindEntity {
    pub _id: ObjectId,

    #[serde(default)]
    pub name: String,
    pub role: UserRole,

    #[serde(default = "default_is_active")]
    pub is_active: bool,
    pub date_of_birth: Option<DateTime>,
}

fn default_is_active() -> bool {
    true
}

#[cfg(test)]
mod test {
    use super::*;
    use bson::doc;

    #[test]
    fn missing_name() {
        let entity = bson::from_document::<UserFindEntity>(doc! {
            "_id": ObjectId::new(),
            "role": "officer",
        })
        .unwrap();

        assert!(entity.name.is_empty());
        assert!(entity.is_active);
    }
}

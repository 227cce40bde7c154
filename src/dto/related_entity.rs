use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use strum::AsRefStr;

///
/// Domain object that triggered a notification. Used for deep-linking only.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedEntity {
    pub entity_type: EntityType,
    pub entity_id: ObjectId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityType {
    Scheme,
    Application,
    Grievance,
    Alert,
    Listing,
}

impl RelatedEntity {
    pub fn scheme(entity_id: ObjectId) -> Self {
        Self {
            entity_type: EntityType::Scheme,
            entity_id,
        }
    }

    pub fn grievance(entity_id: ObjectId) -> Self {
        Self {
            entity_type: EntityType::Grievance,
            entity_id,
        }
    }
}

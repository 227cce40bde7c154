use bson::oid::ObjectId;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CleanupCandidateFindEntity {
    pub _id: ObjectId,
    pub recipient_id: ObjectId,
}

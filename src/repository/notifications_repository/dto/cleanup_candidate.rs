use crate::repository::notifications_repository::entity::CleanupCandidateFindEntity;
use bson::oid::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CleanupCandidate {
    pub id: ObjectId,
    pub recipient_id: ObjectId,
}

impl From<CleanupCandidateFindEntity> for CleanupCandidate {
    fn from(value: CleanupCandidateFindEntity) -> Self {
        Self {
            id: value._id,
            recipient_id: value.recipient_id,
        }
    }
}

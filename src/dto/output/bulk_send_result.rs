use crate::{error::Error, repository::Notification};
use bson::oid::ObjectId;

///
/// Result of fanning one notification out to many recipients.
/// Every recipient is processed independently.
///
#[derive(Debug, Default)]
pub struct BulkSendResult {
    pub successful: Vec<Notification>,
    pub failed: Vec<BulkSendFailure>,
}

#[derive(Debug)]
pub struct BulkSendFailure {
    pub recipient_id: ObjectId,
    pub error: Error,
}

impl BulkSendResult {
    pub fn merge(&mut self, other: BulkSendResult) {
        self.successful.extend(other.successful);
        self.failed.extend(other.failed);
    }
}

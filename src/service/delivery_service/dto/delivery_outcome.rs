use crate::dto::{input::DeliveryAttempt, DeliveryChannel};
use bson::Document;

///
/// What a transport reported for a single channel
///
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryOutcome {
    pub success: bool,
    pub error: Option<String>,
    pub response: Option<Document>,
}

impl DeliveryOutcome {
    pub fn into_attempt(self, channel: DeliveryChannel) -> DeliveryAttempt {
        DeliveryAttempt {
            channel,
            success: self.success,
            error: self.error,
            response: self.response,
        }
    }
}

use crate::dto::DeliveryChannel;
use bson::Document;

///
/// Outcome of a single delivery attempt reported by a delivery channel.
/// A failed attempt is data, it drives retry bookkeeping.
///
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryAttempt {
    pub channel: DeliveryChannel,
    pub success: bool,
    pub error: Option<String>,
    pub response: Option<Document>,
}

impl DeliveryAttempt {
    pub fn succeeded(channel: DeliveryChannel, response: Option<Document>) -> Self {
        Self {
            channel,
            success: true,
            error: None,
            response,
        }
    }

    pub fn failed(channel: DeliveryChannel, error: impl Into<String>) -> Self {
        Self {
            channel,
            success: false,
            error: Some(error.into()),
            response: None,
        }
    }
}

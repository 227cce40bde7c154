use super::DeliveryOutcome;
use crate::{dto::DeliveryChannel, repository::Notification};
use async_trait::async_trait;

///
/// Transport for push, email and sms delivery. Supplied by the embedding application.
///
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeliveryChannelSink: Send + Sync {
    ///
    /// Transport failures are reported through [DeliveryOutcome::success]
    /// and [DeliveryOutcome::error], never by panicking.
    ///
    async fn attempt_delivery(
        &self,
        channel: DeliveryChannel,
        notification: &Notification,
    ) -> DeliveryOutcome;
}

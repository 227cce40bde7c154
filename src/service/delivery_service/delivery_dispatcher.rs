use super::{DeliveryChannelSink, DeliveryDispatcherConfig};
use crate::{error::Error, service::NotificationsService};
use std::sync::Arc;
use tokio::{
    sync::Notify,
    time::{interval, Interval, MissedTickBehavior},
};

///
/// Periodically pushes deliverable notifications through the sink
/// and writes every outcome back for retry bookkeeping
///
pub struct DeliveryDispatcher {
    notifications_service: Arc<dyn NotificationsService>,
    sink: Arc<dyn DeliveryChannelSink>,

    interval: Interval,
    batch_size: i64,
}

impl DeliveryDispatcher {
    pub fn new(
        config: DeliveryDispatcherConfig,
        notifications_service: Arc<dyn NotificationsService>,
        sink: Arc<dyn DeliveryChannelSink>,
    ) -> Self {
        let mut interval = interval(config.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self {
            notifications_service,
            sink,
            interval,
            batch_size: config.batch_size,
        }
    }

    ///
    /// Runs a single delivery pass.
    ///
    /// ### Returns
    /// number of recorded delivery attempts
    ///
    pub async fn dispatch_once(&self) -> Result<usize, Error> {
        let notifications = self
            .notifications_service
            .find_deliverable(self.batch_size)
            .await?;

        let mut attempts = 0;
        for notification in notifications {
            let channels = notification.channels.unsent();
            if channels.is_empty() {
                tracing::debug!(id = %notification.id, "notification has no channel to deliver to");
                continue;
            }

            let mut notification = notification;
            for channel in channels {
                let outcome = self.sink.attempt_delivery(channel, &notification).await;
                if !outcome.success {
                    tracing::warn!(
                        id = %notification.id,
                        channel = channel.as_ref(),
                        error = outcome.error.as_deref().unwrap_or_default(),
                        "delivery attempt failed"
                    );
                }

                let recorded = self
                    .notifications_service
                    .record_delivery_attempt(notification.id, outcome.into_attempt(channel))
                    .await;

                match recorded {
                    Ok(updated) => {
                        attempts += 1;
                        notification = updated;
                    }
                    Err(err) => {
                        tracing::warn!(id = %notification.id, %err, "failed to record delivery attempt");
                        break;
                    }
                }
            }
        }

        Ok(attempts)
    }

    #[tracing::instrument(name = "Delivery Dispatcher", skip_all)]
    pub async fn run(mut self, close_notify: Arc<Notify>) {
        tokio::select! {
            biased;

            _ = close_notify.notified() => {},

            _ = async { loop {
                self.interval.tick().await;

                tracing::debug!("delivery pass started");
                match self.dispatch_once().await {
                    Ok(attempts) => tracing::debug!(attempts, "delivery pass finished"),
                    Err(err) => tracing::error!(%err, "delivery pass failed"),
                }
            }} => {}
        }
    }
}

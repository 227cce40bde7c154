use std::time::Duration;

pub struct DeliveryDispatcherConfig {
    pub interval: Duration,
    /// Max notifications handled in one pass
    pub batch_size: i64,
}

#[derive(Debug, Clone)]
pub struct NotificationsServiceConfig {
    pub max_title_len: usize,
    pub max_message_len: usize,
    pub default_max_retries: u32,
    ///
    /// How many times a single-record update is retried
    /// when another writer modified the record in the meantime
    ///
    pub max_update_attempts: u32,
}

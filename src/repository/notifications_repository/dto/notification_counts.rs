use crate::dto::{NotificationStatus, NotificationType};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct NotificationCounts {
    pub by_status: Vec<(NotificationStatus, u64)>,
    pub by_type: Vec<(NotificationType, u64)>,
}

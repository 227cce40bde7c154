use crate::dto::{NotificationStatus, NotificationType};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct NotificationStats {
    pub total: u64,
    pub unread: u64,
    pub by_status: Vec<(NotificationStatus, u64)>,
    pub by_type: Vec<(NotificationType, u64)>,
}

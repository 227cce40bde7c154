use crate::dto::NotificationType;
use serde::Deserialize;

#[derive(Debug, Default, Clone, Deserialize)]
pub struct NotificationFilters {
    pub notification_type: Option<NotificationType>,
    #[serde(default)]
    pub unread_only: bool,
}

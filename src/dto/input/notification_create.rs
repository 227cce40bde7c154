use crate::dto::{NotificationPriority, NotificationType, RelatedEntity};
use bson::Document;
use serde::Deserialize;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NotificationCreate {
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    #[serde(default)]
    pub priority: NotificationPriority,
    pub related_entity: Option<RelatedEntity>,
    #[serde(default)]
    pub channels: ChannelsSelection,
    pub metadata: Option<Document>,
    pub scheduled_for: Option<OffsetDateTime>,
    pub expires_at: Option<OffsetDateTime>,
    ///
    /// Falls back to the service default when not set
    ///
    pub max_retries: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ChannelsSelection {
    pub push: bool,
    pub email: bool,
    pub sms: bool,
}

impl Default for ChannelsSelection {
    fn default() -> Self {
        Self {
            push: true,
            email: false,
            sms: false,
        }
    }
}

impl ChannelsSelection {
    pub fn any(&self) -> bool {
        self.push || self.email || self.sms
    }
}

impl NotificationCreate {
    pub fn new(
        notification_type: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            notification_type,
            priority: NotificationPriority::default(),
            related_entity: None,
            channels: ChannelsSelection::default(),
            metadata: None,
            scheduled_for: None,
            expires_at: None,
            max_retries: None,
        }
    }

    pub fn with_priority(mut self, priority: NotificationPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_related_entity(mut self, related_entity: RelatedEntity) -> Self {
        self.related_entity = Some(related_entity);
        self
    }

    pub fn with_metadata(mut self, metadata: Document) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

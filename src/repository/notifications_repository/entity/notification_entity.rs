use crate::dto::{
    DeliveryChannel, NotificationPriority, NotificationStatus, NotificationType, RelatedEntity,
};
use bson::{oid::ObjectId, DateTime, Document};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct NotificationEntity {
    pub _id: ObjectId,
    pub recipient_id: ObjectId,

    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub priority: NotificationPriority,
    pub status: NotificationStatus,
    pub related_entity: Option<RelatedEntity>,
    pub channels: ChannelsEntity,
    #[serde(default)]
    pub metadata: Document,

    pub read_at: Option<DateTime>,
    pub clicked_at: Option<DateTime>,
    pub scheduled_for: Option<DateTime>,

    pub retry_count: u32,
    pub max_retries: u32,
    pub next_retry_at: Option<DateTime>,
    #[serde(default)]
    pub delivery_attempts: Vec<DeliveryAttemptEntity>,

    pub expires_at: Option<DateTime>,
    #[serde(default)]
    pub is_expired: bool,

    pub created_at: DateTime,
    pub updated_at: DateTime,
    #[serde(default)]
    pub version: i64,
}

#[derive(Serialize, Deserialize)]
pub struct ChannelsEntity {
    pub push: ChannelStateEntity,
    pub email: ChannelStateEntity,
    pub sms: ChannelStateEntity,
}

#[derive(Serialize, Deserialize)]
pub struct ChannelStateEntity {
    pub enabled: bool,
    pub sent: bool,
    pub sent_at: Option<DateTime>,
    pub response: Option<Document>,
}

#[derive(Serialize, Deserialize)]
pub struct DeliveryAttemptEntity {
    pub channel: DeliveryChannel,
    pub attempted_at: DateTime,
    pub success: bool,
    pub error: Option<String>,
}

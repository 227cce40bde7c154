use crate::{
    dto::{
        input::{ChannelsSelection, DeliveryAttempt, NotificationCreate},
        DeliveryChannel, NotificationPriority, NotificationStatus, NotificationType,
        RelatedEntity,
    },
    repository::notifications_repository::entity::{
        ChannelStateEntity, ChannelsEntity, DeliveryAttemptEntity, NotificationEntity,
    },
};
use bson::{oid::ObjectId, DateTime, Document};
use time::{Duration, OffsetDateTime};

///
/// Delay before the next automatic retry, indexed by the number of
/// failed attempts so far. Capped at the last value.
///
pub const RETRY_BACKOFF: [Duration; 3] = [
    Duration::minutes(5),
    Duration::minutes(15),
    Duration::minutes(60),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: ObjectId,
    pub recipient_id: ObjectId,

    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub priority: NotificationPriority,
    pub status: NotificationStatus,
    pub related_entity: Option<RelatedEntity>,
    pub channels: Channels,
    pub metadata: Document,

    pub read_at: Option<OffsetDateTime>,
    pub clicked_at: Option<OffsetDateTime>,
    pub scheduled_for: Option<OffsetDateTime>,

    pub retry_count: u32,
    pub max_retries: u32,
    pub next_retry_at: Option<OffsetDateTime>,
    pub delivery_attempts: Vec<DeliveryAttemptRecord>,

    pub expires_at: Option<OffsetDateTime>,
    pub is_expired: bool,

    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    ///
    /// Incremented on every write, used for optimistic updates
    ///
    pub version: i64,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Channels {
    pub push: ChannelState,
    pub email: ChannelState,
    pub sms: ChannelState,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ChannelState {
    pub enabled: bool,
    pub sent: bool,
    pub sent_at: Option<OffsetDateTime>,
    pub response: Option<Document>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryAttemptRecord {
    pub channel: DeliveryChannel,
    pub attempted_at: OffsetDateTime,
    pub success: bool,
    pub error: Option<String>,
}

impl Channels {
    pub fn get(&self, channel: DeliveryChannel) -> &ChannelState {
        match channel {
            DeliveryChannel::Push => &self.push,
            DeliveryChannel::Email => &self.email,
            DeliveryChannel::Sms => &self.sms,
        }
    }

    pub fn get_mut(&mut self, channel: DeliveryChannel) -> &mut ChannelState {
        match channel {
            DeliveryChannel::Push => &mut self.push,
            DeliveryChannel::Email => &mut self.email,
            DeliveryChannel::Sms => &mut self.sms,
        }
    }

    ///
    /// Enabled channels that have not been sent through yet
    ///
    pub fn unsent(&self) -> Vec<DeliveryChannel> {
        [
            DeliveryChannel::Push,
            DeliveryChannel::Email,
            DeliveryChannel::Sms,
        ]
        .into_iter()
        .filter(|channel| {
            let state = self.get(*channel);
            state.enabled && !state.sent
        })
        .collect()
    }
}

impl From<ChannelsSelection> for Channels {
    fn from(value: ChannelsSelection) -> Self {
        let state = |enabled| ChannelState {
            enabled,
            ..Default::default()
        };

        Self {
            push: state(value.push),
            email: state(value.email),
            sms: state(value.sms),
        }
    }
}

impl Notification {
    pub fn new(
        recipient_id: ObjectId,
        input: NotificationCreate,
        default_max_retries: u32,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            recipient_id,
            title: input.title,
            message: input.message,
            notification_type: input.notification_type,
            priority: input.priority,
            status: NotificationStatus::Pending,
            related_entity: input.related_entity,
            channels: input.channels.into(),
            metadata: input.metadata.unwrap_or_default(),
            read_at: None,
            clicked_at: None,
            scheduled_for: input.scheduled_for,
            retry_count: 0,
            max_retries: input.max_retries.unwrap_or(default_max_retries),
            next_retry_at: None,
            delivery_attempts: Vec::new(),
            expires_at: input.expires_at,
            is_expired: false,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    ///
    /// Unread means not read yet and still deliverable.
    /// `read_at` is the source of truth; failed notifications
    /// can never be read so they are not counted.
    ///
    pub fn is_unread(&self) -> bool {
        self.read_at.is_none() && self.status != NotificationStatus::Failed
    }

    fn expiry_passed(&self, now: OffsetDateTime) -> bool {
        self.is_expired || self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    ///
    /// Pending notification that is neither expired nor scheduled for the future
    ///
    pub fn is_ready_for_delivery(&self, now: OffsetDateTime) -> bool {
        self.status == NotificationStatus::Pending
            && !self.expiry_passed(now)
            && self
                .scheduled_for
                .map_or(true, |scheduled_for| scheduled_for <= now)
    }

    ///
    /// Failed notification with retries left whose backoff already elapsed.
    /// The notification stays `failed` until a retry succeeds.
    ///
    pub fn is_retry_eligible(&self, now: OffsetDateTime) -> bool {
        self.status == NotificationStatus::Failed
            && !self.expiry_passed(now)
            && self.retry_count < self.max_retries
            && self
                .next_retry_at
                .is_some_and(|next_retry_at| next_retry_at <= now)
    }

    ///
    /// Flips `is_expired` once `expires_at` passed and forces the status
    /// to failed, unless the notification was already read.
    /// Never reverts `is_expired`.
    ///
    /// ### Returns
    /// true when the notification expired during this call
    ///
    pub fn refresh_expiry(&mut self, now: OffsetDateTime) -> bool {
        if self.is_expired {
            return false;
        }

        match self.expires_at {
            Some(expires_at) if expires_at <= now => {
                self.is_expired = true;
                if self.status != NotificationStatus::Read {
                    self.status = NotificationStatus::Failed;
                }
                self.next_retry_at = None;
                true
            }
            _ => false,
        }
    }

    ///
    /// ### Returns
    /// true when the notification changed
    ///
    pub fn mark_read(&mut self, now: OffsetDateTime) -> bool {
        if self.read_at.is_some() || self.status == NotificationStatus::Failed {
            return false;
        }

        self.read_at = Some(now);
        self.status = NotificationStatus::Read;
        true
    }

    pub fn mark_clicked(&mut self, now: OffsetDateTime) -> bool {
        let clicked = match self.clicked_at {
            Some(_) => false,
            None => {
                self.clicked_at = Some(now);
                true
            }
        };

        self.mark_read(now) || clicked
    }

    ///
    /// Channel-level delivery receipt, only a sent notification can be delivered
    ///
    pub fn mark_delivered(&mut self) -> bool {
        if self.status != NotificationStatus::Sent {
            return false;
        }

        self.status = NotificationStatus::Delivered;
        true
    }

    ///
    /// Appends the attempt to the log and updates channel and retry bookkeeping.
    ///
    /// The first successful channel moves the notification to `sent`.
    /// A failed attempt moves a pending notification to `failed`, increments
    /// `retry_count` up to `max_retries` and schedules the next retry while
    /// retries are left. Once any channel succeeded, failures of the
    /// remaining channels are only logged and get no retry.
    ///
    pub fn record_attempt(&mut self, attempt: DeliveryAttempt, now: OffsetDateTime) {
        self.delivery_attempts.push(DeliveryAttemptRecord {
            channel: attempt.channel,
            attempted_at: now,
            success: attempt.success,
            error: attempt.error,
        });

        let sendable = matches!(
            self.status,
            NotificationStatus::Pending | NotificationStatus::Failed
        );

        if attempt.success {
            let state = self.channels.get_mut(attempt.channel);
            state.sent = true;
            state.sent_at = Some(now);
            state.response = attempt.response;

            if sendable && !self.is_expired {
                self.status = NotificationStatus::Sent;
            }
            self.next_retry_at = None;
            return;
        }

        if !sendable || self.retry_count >= self.max_retries {
            return;
        }

        self.retry_count += 1;
        if self.status == NotificationStatus::Pending {
            self.status = NotificationStatus::Failed;
        }

        self.next_retry_at = match self.retry_count < self.max_retries && !self.is_expired {
            true => Some(now + Self::retry_delay(self.retry_count)),
            false => None,
        };
    }

    pub fn retry_delay(retry_count: u32) -> Duration {
        let idx = (retry_count.max(1) as usize - 1).min(RETRY_BACKOFF.len() - 1);
        RETRY_BACKOFF[idx]
    }

    ///
    /// Must be called before every write of a modified notification
    ///
    pub fn touch(&mut self, now: OffsetDateTime) {
        self.refresh_expiry(now);
        self.updated_at = now;
        self.version += 1;
    }
}

impl From<NotificationEntity> for Notification {
    fn from(value: NotificationEntity) -> Self {
        Self {
            id: value._id,
            recipient_id: value.recipient_id,
            title: value.title,
            message: value.message,
            notification_type: value.notification_type,
            priority: value.priority,
            status: value.status,
            related_entity: value.related_entity,
            channels: Channels {
                push: value.channels.push.into(),
                email: value.channels.email.into(),
                sms: value.channels.sms.into(),
            },
            metadata: value.metadata,
            read_at: value.read_at.map(OffsetDateTime::from),
            clicked_at: value.clicked_at.map(OffsetDateTime::from),
            scheduled_for: value.scheduled_for.map(OffsetDateTime::from),
            retry_count: value.retry_count,
            max_retries: value.max_retries,
            next_retry_at: value.next_retry_at.map(OffsetDateTime::from),
            delivery_attempts: value
                .delivery_attempts
                .into_iter()
                .map(|attempt| DeliveryAttemptRecord {
                    channel: attempt.channel,
                    attempted_at: attempt.attempted_at.into(),
                    success: attempt.success,
                    error: attempt.error,
                })
                .collect(),
            expires_at: value.expires_at.map(OffsetDateTime::from),
            is_expired: value.is_expired,
            created_at: value.created_at.into(),
            updated_at: value.updated_at.into(),
            version: value.version,
        }
    }
}

impl From<ChannelStateEntity> for ChannelState {
    fn from(value: ChannelStateEntity) -> Self {
        Self {
            enabled: value.enabled,
            sent: value.sent,
            sent_at: value.sent_at.map(OffsetDateTime::from),
            response: value.response,
        }
    }
}

impl From<&ChannelState> for ChannelStateEntity {
    fn from(value: &ChannelState) -> Self {
        Self {
            enabled: value.enabled,
            sent: value.sent,
            sent_at: value.sent_at.map(DateTime::from),
            response: value.response.clone(),
        }
    }
}

impl From<&Notification> for NotificationEntity {
    fn from(value: &Notification) -> Self {
        Self {
            _id: value.id,
            recipient_id: value.recipient_id,
            title: value.title.clone(),
            message: value.message.clone(),
            notification_type: value.notification_type,
            priority: value.priority,
            status: value.status,
            related_entity: value.related_entity.clone(),
            channels: ChannelsEntity {
                push: (&value.channels.push).into(),
                email: (&value.channels.email).into(),
                sms: (&value.channels.sms).into(),
            },
            metadata: value.metadata.clone(),
            read_at: value.read_at.map(DateTime::from),
            clicked_at: value.clicked_at.map(DateTime::from),
            scheduled_for: value.scheduled_for.map(DateTime::from),
            retry_count: value.retry_count,
            max_retries: value.max_retries,
            next_retry_at: value.next_retry_at.map(DateTime::from),
            delivery_attempts: value
                .delivery_attempts
                .iter()
                .map(|attempt| DeliveryAttemptEntity {
                    channel: attempt.channel,
                    attempted_at: attempt.attempted_at.into(),
                    success: attempt.success,
                    error: attempt.error.clone(),
                })
                .collect(),
            expires_at: value.expires_at.map(DateTime::from),
            is_expired: value.is_expired,
            created_at: value.created_at.into(),
            updated_at: value.updated_at.into(),
            version: value.version,
        }
    }
}

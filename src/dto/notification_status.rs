use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

///
/// Delivery lifecycle of a notification.
///
/// `pending -> sent -> delivered -> read`, with `failed` reachable
/// from `pending` when delivery fails or the notification expires.
///
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationStatus {
    #[default]
    Pending,
    Sent,
    Delivered,
    Read,
    Failed,
}

impl NotificationStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, NotificationStatus::Read | NotificationStatus::Failed)
    }
}

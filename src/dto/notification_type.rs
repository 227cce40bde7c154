use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationType {
    SchemeDeadlineReminder,
    SchemeAvailability,
    ApplicationUpdate,
    GrievanceUpdate,
    GrievanceEscalation,
    EmergencyAlert,
    BirthdayWish,
    AdminReminder,
    MarketplaceUpdate,
    System,
}

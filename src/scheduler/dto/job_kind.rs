use strum::{AsRefStr, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum JobKind {
    SchemeDeadlineCheck,
    WeeklyReminder,
    OverdueGrievanceCheck,
    NotificationCleanup,
    BirthdayWishes,
    PendingApplicationCheck,
}

use super::JobKind;

///
/// Six-field cron expressions (with seconds) of every job, evaluated in UTC
///
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub scheme_deadline_check: String,
    pub weekly_reminder: String,
    pub overdue_grievance_check: String,
    pub notification_cleanup: String,
    pub birthday_wishes: String,
    pub pending_application_check: String,
}

impl SchedulerConfig {
    pub fn cron_expression(&self, kind: JobKind) -> &str {
        match kind {
            JobKind::SchemeDeadlineCheck => &self.scheme_deadline_check,
            JobKind::WeeklyReminder => &self.weekly_reminder,
            JobKind::OverdueGrievanceCheck => &self.overdue_grievance_check,
            JobKind::NotificationCleanup => &self.notification_cleanup,
            JobKind::BirthdayWishes => &self.birthday_wishes,
            JobKind::PendingApplicationCheck => &self.pending_application_check,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            scheme_deadline_check: "0 0 9 * * *".to_string(),
            weekly_reminder: "0 0 10 * * Mon".to_string(),
            overdue_grievance_check: "0 0 10 * * *".to_string(),
            notification_cleanup: "0 0 2 * * Sun".to_string(),
            birthday_wishes: "0 0 8 * * *".to_string(),
            pending_application_check: "0 0 11 * * *".to_string(),
        }
    }
}

use time::Duration;

#[derive(Debug, Clone)]
pub struct SchedulerJobsConfig {
    /// How far ahead the deadline check looks
    pub scheme_deadline_window: Duration,
    pub weekly_reminder_scheme_limit: i64,
    pub grievance_overdue_after: Duration,
    pub grievance_escalation_after: Duration,
    pub pending_application_after: Duration,
    pub notification_retention_days: u32,
}

impl Default for SchedulerJobsConfig {
    fn default() -> Self {
        Self {
            scheme_deadline_window: Duration::days(3),
            weekly_reminder_scheme_limit: 5,
            grievance_overdue_after: Duration::days(7),
            grievance_escalation_after: Duration::days(10),
            pending_application_after: Duration::days(3),
            notification_retention_days: 30,
        }
    }
}

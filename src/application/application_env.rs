use crate::{
    scheduler::{SchedulerConfig, SchedulerJobsConfig},
    service::NotificationsServiceConfig,
};
use anyhow::anyhow;
use std::str::FromStr;
use time::Duration;

pub struct ApplicationEnv {
    pub log_directory: String,
    pub log_filename: String,

    pub db_connection_string: String,
    pub db_name: String,

    pub scheme_deadline_check_cron: String,
    pub weekly_reminder_cron: String,
    pub overdue_grievance_check_cron: String,
    pub notification_cleanup_cron: String,
    pub birthday_wishes_cron: String,
    pub pending_application_check_cron: String,

    pub scheme_deadline_window_days: i64,
    pub weekly_reminder_scheme_limit: i64,
    pub grievance_overdue_days: i64,
    pub grievance_escalation_days: i64,
    pub pending_application_days: i64,
    pub notification_retention_days: u32,

    pub notification_max_title_len: usize,
    pub notification_max_message_len: usize,
    pub notification_max_retries: u32,
    pub notification_update_attempts: u32,
}

impl ApplicationEnv {
    pub fn parse() -> anyhow::Result<Self> {
        let log_directory = Self::env_var("WELFARE_NOTIFIER_LOG_DIRECTORY")?;
        let log_filename = Self::env_var("WELFARE_NOTIFIER_LOG_FILENAME")?;
        let db_connection_string = Self::env_var("WELFARE_NOTIFIER_DB_CONNECTION_STRING")?;
        let db_name = Self::env_var("WELFARE_NOTIFIER_DB_NAME")?;

        let default_cron = SchedulerConfig::default();
        let scheme_deadline_check_cron = Self::env_var_or(
            "WELFARE_NOTIFIER_SCHEME_DEADLINE_CHECK_CRON",
            default_cron.scheme_deadline_check,
        );
        let weekly_reminder_cron = Self::env_var_or(
            "WELFARE_NOTIFIER_WEEKLY_REMINDER_CRON",
            default_cron.weekly_reminder,
        );
        let overdue_grievance_check_cron = Self::env_var_or(
            "WELFARE_NOTIFIER_OVERDUE_GRIEVANCE_CHECK_CRON",
            default_cron.overdue_grievance_check,
        );
        let notification_cleanup_cron = Self::env_var_or(
            "WELFARE_NOTIFIER_NOTIFICATION_CLEANUP_CRON",
            default_cron.notification_cleanup,
        );
        let birthday_wishes_cron = Self::env_var_or(
            "WELFARE_NOTIFIER_BIRTHDAY_WISHES_CRON",
            default_cron.birthday_wishes,
        );
        let pending_application_check_cron = Self::env_var_or(
            "WELFARE_NOTIFIER_PENDING_APPLICATION_CHECK_CRON",
            default_cron.pending_application_check,
        );

        let scheme_deadline_window_days =
            Self::parse_env_var_or("WELFARE_NOTIFIER_SCHEME_DEADLINE_WINDOW_DAYS", 3)?;
        let weekly_reminder_scheme_limit =
            Self::parse_env_var_or("WELFARE_NOTIFIER_WEEKLY_REMINDER_SCHEME_LIMIT", 5)?;
        let grievance_overdue_days =
            Self::parse_env_var_or("WELFARE_NOTIFIER_GRIEVANCE_OVERDUE_DAYS", 7)?;
        let grievance_escalation_days =
            Self::parse_env_var_or("WELFARE_NOTIFIER_GRIEVANCE_ESCALATION_DAYS", 10)?;
        let pending_application_days =
            Self::parse_env_var_or("WELFARE_NOTIFIER_PENDING_APPLICATION_DAYS", 3)?;
        let notification_retention_days =
            Self::parse_env_var_or("WELFARE_NOTIFIER_NOTIFICATION_RETENTION_DAYS", 30)?;

        let notification_max_title_len =
            Self::parse_env_var_or("WELFARE_NOTIFIER_NOTIFICATION_MAX_TITLE_LEN", 200)?;
        let notification_max_message_len =
            Self::parse_env_var_or("WELFARE_NOTIFIER_NOTIFICATION_MAX_MESSAGE_LEN", 1000)?;
        let notification_max_retries =
            Self::parse_env_var_or("WELFARE_NOTIFIER_NOTIFICATION_MAX_RETRIES", 3)?;
        let notification_update_attempts =
            Self::parse_env_var_or("WELFARE_NOTIFIER_NOTIFICATION_UPDATE_ATTEMPTS", 5)?;

        if grievance_escalation_days < grievance_overdue_days {
            return Err(anyhow!(
                "WELFARE_NOTIFIER_GRIEVANCE_ESCALATION_DAYS must not be lower than WELFARE_NOTIFIER_GRIEVANCE_OVERDUE_DAYS"
            ));
        }

        Ok(Self {
            log_directory,
            log_filename,
            db_connection_string,
            db_name,
            scheme_deadline_check_cron,
            weekly_reminder_cron,
            overdue_grievance_check_cron,
            notification_cleanup_cron,
            birthday_wishes_cron,
            pending_application_check_cron,
            scheme_deadline_window_days,
            weekly_reminder_scheme_limit,
            grievance_overdue_days,
            grievance_escalation_days,
            pending_application_days,
            notification_retention_days,
            notification_max_title_len,
            notification_max_message_len,
            notification_max_retries,
            notification_update_attempts,
        })
    }

    pub fn notifications_service_config(&self) -> NotificationsServiceConfig {
        NotificationsServiceConfig {
            max_title_len: self.notification_max_title_len,
            max_message_len: self.notification_max_message_len,
            default_max_retries: self.notification_max_retries,
            max_update_attempts: self.notification_update_attempts,
        }
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            scheme_deadline_check: self.scheme_deadline_check_cron.clone(),
            weekly_reminder: self.weekly_reminder_cron.clone(),
            overdue_grievance_check: self.overdue_grievance_check_cron.clone(),
            notification_cleanup: self.notification_cleanup_cron.clone(),
            birthday_wishes: self.birthday_wishes_cron.clone(),
            pending_application_check: self.pending_application_check_cron.clone(),
        }
    }

    pub fn scheduler_jobs_config(&self) -> SchedulerJobsConfig {
        SchedulerJobsConfig {
            scheme_deadline_window: Duration::days(self.scheme_deadline_window_days),
            weekly_reminder_scheme_limit: self.weekly_reminder_scheme_limit,
            grievance_overdue_after: Duration::days(self.grievance_overdue_days),
            grievance_escalation_after: Duration::days(self.grievance_escalation_days),
            pending_application_after: Duration::days(self.pending_application_days),
            notification_retention_days: self.notification_retention_days,
        }
    }

    fn env_var(name: &'static str) -> anyhow::Result<String> {
        std::env::var(name).map_err(|_| anyhow!("environment variable {name} not set"))
    }

    fn env_var_or(name: &'static str, default: String) -> String {
        std::env::var(name).unwrap_or(default)
    }

    fn parse_env_var_or<T>(name: &'static str, default: T) -> anyhow::Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match std::env::var(name) {
            Ok(value) => value
                .parse()
                .map_err(|err| anyhow!("environment variable {name} invalid: {err}")),
            Err(_) => Ok(default),
        }
    }
}

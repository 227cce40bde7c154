use super::{JobError, JobKind, SchedulerJobsConfig};
use crate::{
    dto::{
        input::NotificationCreate, output::BulkSendResult, NotificationPriority,
        NotificationType, RelatedEntity, UserRole,
    },
    repository::{
        self, ApplicationsRepository, Grievance, GrievanceStatus, GrievancesRepository,
        SchemesRepository, UsersRepository,
    },
    service::NotificationsService,
};
use bson::{doc, oid::ObjectId};
use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};
use strum::IntoEnumIterator;
use time::OffsetDateTime;
use tokio::sync::Mutex;

///
/// Bodies of all scheduled jobs. Every job returns the number
/// of notifications it created.
///
pub struct SchedulerJobs {
    config: SchedulerJobsConfig,

    notifications_service: Arc<dyn NotificationsService>,
    users_repository: Arc<dyn UsersRepository>,
    schemes_repository: Arc<dyn SchemesRepository>,
    applications_repository: Arc<dyn ApplicationsRepository>,
    grievances_repository: Arc<dyn GrievancesRepository>,

    running: HashMap<JobKind, Mutex<()>>,
}

impl SchedulerJobs {
    pub fn new(
        config: SchedulerJobsConfig,
        notifications_service: Arc<dyn NotificationsService>,
        users_repository: Arc<dyn UsersRepository>,
        schemes_repository: Arc<dyn SchemesRepository>,
        applications_repository: Arc<dyn ApplicationsRepository>,
        grievances_repository: Arc<dyn GrievancesRepository>,
    ) -> Self {
        let running = JobKind::iter().map(|kind| (kind, Mutex::new(()))).collect();

        Self {
            config,
            notifications_service,
            users_repository,
            schemes_repository,
            applications_repository,
            grievances_repository,
            running,
        }
    }

    ///
    /// Runs the job unless its previous run is still in progress
    ///
    /// ### Errors
    /// - [JobError::AlreadyRunning] when the same job is running
    ///
    pub async fn run(&self, kind: JobKind) -> Result<usize, JobError> {
        let _guard = self
            .running
            .get(&kind)
            .and_then(|running| running.try_lock().ok())
            .ok_or(JobError::AlreadyRunning)?;

        let now = OffsetDateTime::now_utc();
        match kind {
            JobKind::SchemeDeadlineCheck => self.scheme_deadline_check(now).await,
            JobKind::WeeklyReminder => self.weekly_reminder(now).await,
            JobKind::OverdueGrievanceCheck => self.overdue_grievance_check(now).await,
            JobKind::NotificationCleanup => self.notification_cleanup().await,
            JobKind::BirthdayWishes => self.birthday_wishes(now).await,
            JobKind::PendingApplicationCheck => self.pending_application_check(now).await,
        }
    }

    ///
    /// Same as [SchedulerJobs::run] but failures are only logged
    ///
    pub async fn run_logged(&self, kind: JobKind) {
        let job = kind.as_ref();
        tracing::info!(job, "job started");

        match self.run(kind).await {
            Ok(created) => tracing::info!(job, created, "job finished"),
            Err(JobError::AlreadyRunning) => {
                tracing::warn!(job, "previous run still in progress, skipping tick")
            }
            Err(err) => tracing::error!(job, %err, "job failed"),
        }
    }

    ///
    /// Reminds eligible users about schemes whose deadline falls into the window
    ///
    pub async fn scheme_deadline_check(&self, now: OffsetDateTime) -> Result<usize, JobError> {
        let schemes = self
            .schemes_repository
            .find_active_with_deadline_between(now, now + self.config.scheme_deadline_window)
            .await?;
        tracing::info!(count = schemes.len(), "found schemes with approaching deadline");

        let mut created = 0;
        for scheme in schemes {
            let Some(deadline) = scheme.application_deadline else {
                continue;
            };

            let recipient_ids = self.user_ids_by_roles(&scheme.eligible_roles()).await?;
            if recipient_ids.is_empty() {
                tracing::debug!(scheme = %scheme.id, "scheme has no eligible users");
                continue;
            }

            let days_left = (deadline.date() - now.date()).whole_days();
            let notification = NotificationCreate::new(
                NotificationType::SchemeDeadlineReminder,
                "Scheme deadline approaching",
                format!(
                    "Applications for {} close on {} ({} days left)",
                    scheme.title,
                    deadline.date(),
                    days_left
                ),
            )
            .with_priority(NotificationPriority::High)
            .with_related_entity(RelatedEntity::scheme(scheme.id))
            .with_metadata(doc! {
                "scheme_title": &scheme.title,
                "days_left": days_left,
            });

            let result = self
                .notifications_service
                .send_bulk(&recipient_ids, notification)
                .await;
            created += Self::count_sent(result);
        }

        Ok(created)
    }

    ///
    /// Tells officers and family members about schemes still open for applications
    ///
    pub async fn weekly_reminder(&self, now: OffsetDateTime) -> Result<usize, JobError> {
        let schemes = self
            .schemes_repository
            .find_active_open(now, self.config.weekly_reminder_scheme_limit)
            .await?;
        if schemes.is_empty() {
            tracing::info!("no open schemes to remind about");
            return Ok(0);
        }

        let titles = schemes
            .iter()
            .map(|scheme| scheme.title.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let scheme_ids = schemes.iter().map(|scheme| scheme.id).collect::<Vec<_>>();

        let notification = NotificationCreate::new(
            NotificationType::SchemeAvailability,
            "Welfare schemes open for applications",
            format!("You can still apply for: {titles}"),
        )
        .with_metadata(doc! { "scheme_ids": scheme_ids });

        let result = self
            .notifications_service
            .send_to_roles(&[UserRole::Officer, UserRole::FamilyMember], notification)
            .await?;

        Ok(Self::count_sent(result))
    }

    ///
    /// Notifies about grievances left unresolved too long and escalates
    /// the oldest ones to admins
    ///
    pub async fn overdue_grievance_check(&self, now: OffsetDateTime) -> Result<usize, JobError> {
        let grievances = self
            .grievances_repository
            .find_by_status_created_before(
                &GrievanceStatus::UNRESOLVED,
                now - self.config.grievance_overdue_after,
            )
            .await?;
        tracing::info!(count = grievances.len(), "found overdue grievances");

        let escalate_before = now - self.config.grievance_escalation_after;

        let mut created = 0;
        for grievance in grievances {
            created += self.notify_grievance_overdue(&grievance, now).await;

            if grievance.created_at <= escalate_before {
                created += self.escalate_grievance(&grievance, now).await;
            }
        }

        Ok(created)
    }

    pub async fn notification_cleanup(&self) -> Result<usize, JobError> {
        let deleted = self
            .notifications_service
            .cleanup_old(self.config.notification_retention_days)
            .await?;

        Ok(deleted as usize)
    }

    ///
    /// Sends greeting to every user born on today's day and month
    ///
    pub async fn birthday_wishes(&self, now: OffsetDateTime) -> Result<usize, JobError> {
        let users = self
            .users_repository
            .find_by_birthday(u8::from(now.month()), now.day())
            .await?;
        tracing::info!(count = users.len(), "found users with birthday");

        let mut created = 0;
        for user in users {
            let message = match user.name.trim().is_empty() {
                true => "Happy Birthday! Wishing you a wonderful year ahead.".to_string(),
                false => format!(
                    "Happy Birthday, {}! Wishing you a wonderful year ahead.",
                    user.name.trim()
                ),
            };
            let notification = NotificationCreate::new(
                NotificationType::BirthdayWish,
                "Happy Birthday!",
                message,
            )
            .with_priority(NotificationPriority::Low);

            match self.notifications_service.create(user.id, notification).await {
                Ok(_) => created += 1,
                Err(err) => tracing::warn!(user = %user.id, %err, "failed to send birthday wish"),
            }
        }

        Ok(created)
    }

    ///
    /// Reminds officers and admins about applications waiting for review,
    /// one notification per scheme
    ///
    pub async fn pending_application_check(
        &self,
        now: OffsetDateTime,
    ) -> Result<usize, JobError> {
        let applications = self
            .applications_repository
            .find_pending_created_before(now - self.config.pending_application_after)
            .await?;
        if applications.is_empty() {
            tracing::info!("no pending applications");
            return Ok(0);
        }

        let mut pending_by_scheme = BTreeMap::<ObjectId, usize>::new();
        for application in &applications {
            *pending_by_scheme.entry(application.scheme_id).or_default() += 1;
        }

        let staff_ids = self
            .user_ids_by_roles(&[UserRole::Officer, UserRole::Admin])
            .await?;
        if staff_ids.is_empty() {
            tracing::warn!(
                pending = applications.len(),
                "no officers or admins to notify about pending applications"
            );
            return Ok(0);
        }

        let scheme_ids = pending_by_scheme.keys().copied().collect::<Vec<_>>();
        let scheme_titles = self
            .schemes_repository
            .find_by_ids(&scheme_ids)
            .await?
            .into_iter()
            .map(|scheme| (scheme.id, scheme.title))
            .collect::<HashMap<_, _>>();

        let pending_days = self.config.pending_application_after.whole_days();

        let mut created = 0;
        for (scheme_id, pending) in pending_by_scheme {
            let title = scheme_titles
                .get(&scheme_id)
                .map(String::as_str)
                .unwrap_or("unknown scheme");

            let notification = NotificationCreate::new(
                NotificationType::AdminReminder,
                "Applications awaiting review",
                format!(
                    "{pending} applications for {title} are pending for more than {pending_days} days"
                ),
            )
            .with_related_entity(RelatedEntity::scheme(scheme_id))
            .with_metadata(doc! { "pending": pending as i64 });

            let result = self
                .notifications_service
                .send_bulk(&staff_ids, notification)
                .await;
            created += Self::count_sent(result);
        }

        Ok(created)
    }

    async fn user_ids_by_roles(
        &self,
        roles: &[UserRole],
    ) -> Result<Vec<ObjectId>, repository::Error> {
        let ids = self
            .users_repository
            .find_by_roles(roles)
            .await?
            .into_iter()
            .map(|user| user.id)
            .collect();

        Ok(ids)
    }

    async fn notify_grievance_overdue(&self, grievance: &Grievance, now: OffsetDateTime) -> usize {
        let mut recipient_ids = Vec::with_capacity(2);
        if let Some(assigned_to) = grievance.assigned_to {
            recipient_ids.push(assigned_to);
        }
        if !recipient_ids.contains(&grievance.submitted_by) {
            recipient_ids.push(grievance.submitted_by);
        }

        let open_days = (now - grievance.created_at).whole_days();
        let notification = NotificationCreate::new(
            NotificationType::GrievanceUpdate,
            "Grievance overdue",
            format!(
                "Grievance {} \"{}\" is unresolved for {} days",
                grievance.ticket_number, grievance.title, open_days
            ),
        )
        .with_priority(NotificationPriority::High)
        .with_related_entity(RelatedEntity::grievance(grievance.id))
        .with_metadata(doc! {
            "ticket_number": &grievance.ticket_number,
            "open_days": open_days,
        });

        let result = self
            .notifications_service
            .send_bulk(&recipient_ids, notification)
            .await;

        Self::count_sent(result)
    }

    async fn escalate_grievance(&self, grievance: &Grievance, now: OffsetDateTime) -> usize {
        match self.grievances_repository.escalate(grievance.id, now).await {
            Ok(()) => tracing::info!(grievance = %grievance.id, "escalated grievance"),
            Err(repository::Error::NoDocumentUpdated) => {
                tracing::debug!(grievance = %grievance.id, "grievance already escalated");
                return 0;
            }
            Err(err) => {
                tracing::warn!(grievance = %grievance.id, %err, "failed to escalate grievance");
                return 0;
            }
        }

        let notification = NotificationCreate::new(
            NotificationType::GrievanceEscalation,
            "Grievance escalated",
            format!(
                "Grievance {} \"{}\" was escalated automatically",
                grievance.ticket_number, grievance.title
            ),
        )
        .with_priority(NotificationPriority::Critical)
        .with_related_entity(RelatedEntity::grievance(grievance.id))
        .with_metadata(doc! { "ticket_number": &grievance.ticket_number });

        match self
            .notifications_service
            .send_to_roles(&[UserRole::Admin], notification)
            .await
        {
            Ok(result) => Self::count_sent(result),
            Err(err) => {
                tracing::warn!(
                    grievance = %grievance.id,
                    %err,
                    "failed to notify admins about escalation"
                );
                0
            }
        }
    }

    fn count_sent(result: BulkSendResult) -> usize {
        for failure in &result.failed {
            tracing::warn!(
                recipient = %failure.recipient_id,
                err = %failure.error,
                "failed to notify recipient"
            );
        }

        result.successful.len()
    }
}

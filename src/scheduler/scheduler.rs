use super::{JobError, JobKind, SchedulerConfig, SchedulerJobs};
use std::sync::Arc;
use strum::IntoEnumIterator;
use tokio_cron_scheduler::{Job as CronJob, JobScheduler, JobSchedulerError};

///
/// Owns the cron runtime. Jobs are registered on [Scheduler::start]
/// and fire until [Scheduler::stop].
///
pub struct Scheduler {
    config: SchedulerConfig,
    jobs: Arc<SchedulerJobs>,
    job_scheduler: JobScheduler,
}

impl Scheduler {
    pub async fn new(
        config: SchedulerConfig,
        jobs: Arc<SchedulerJobs>,
    ) -> Result<Self, JobSchedulerError> {
        let job_scheduler = JobScheduler::new().await?;

        Ok(Self {
            config,
            jobs,
            job_scheduler,
        })
    }

    ///
    /// Registers all jobs with their cron expressions and starts firing them
    ///
    /// ### Errors
    /// - when any cron expression is invalid
    ///
    pub async fn start(&self) -> Result<(), JobSchedulerError> {
        for kind in JobKind::iter() {
            let cron_expression = self.config.cron_expression(kind);
            let job = Self::cron_job(kind, cron_expression, Arc::clone(&self.jobs))?;
            self.job_scheduler.add(job).await?;

            tracing::info!(job = kind.as_ref(), cron_expression, "registered job");
        }

        self.job_scheduler.start().await?;
        tracing::info!("scheduler started");

        Ok(())
    }

    pub async fn stop(&self) -> Result<(), JobSchedulerError> {
        let mut job_scheduler = self.job_scheduler.clone();
        job_scheduler.shutdown().await?;

        tracing::info!("scheduler stopped");

        Ok(())
    }

    ///
    /// Runs the job right away, outside of its cadence
    ///
    /// ### Errors
    /// - [JobError::AlreadyRunning] when the job is already running
    ///
    pub async fn trigger(&self, kind: JobKind) -> Result<usize, JobError> {
        tracing::info!(job = kind.as_ref(), "triggering job manually");

        self.jobs.run(kind).await
    }

    fn cron_job(
        kind: JobKind,
        cron_expression: &str,
        jobs: Arc<SchedulerJobs>,
    ) -> Result<CronJob, JobSchedulerError> {
        CronJob::new_async(cron_expression, move |_uuid, _lock| {
            let jobs = Arc::clone(&jobs);
            Box::pin(async move {
                jobs.run_logged(kind).await;
            })
        })
    }
}

use crate::{ExpireSweepJob, JailEngineJob, SchedulerJob};
use std::sync::Arc;
use tracing::info;

/// Central orchestrator for all background jobs.
///
/// Use the builder pattern to register jobs, then call `.start()` once. The
/// jail engine startup is awaited before the recurring jobs are spawned so
/// jails are tailing from process start rather than racing the first
/// scheduler tick.
///
/// # Example
///
/// ```rust,ignore
/// JobRunner::new()
///     .with_jail_engine(JailEngineJob::new(repo, lifecycle))
///     .with_expire_sweep(ExpireSweepJob::new(sweep))
///     .with_scheduler(SchedulerJob::new(scheduler, true, 3))
///     .start()
///     .await;
/// ```
pub struct JobRunner {
    jail_engine: Option<JailEngineJob>,
    expire_sweep: Option<ExpireSweepJob>,
    scheduler: Option<SchedulerJob>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            jail_engine: None,
            expire_sweep: None,
            scheduler: None,
        }
    }

    pub fn with_jail_engine(mut self, job: JailEngineJob) -> Self {
        self.jail_engine = Some(job);
        self
    }

    pub fn with_expire_sweep(mut self, job: ExpireSweepJob) -> Self {
        self.expire_sweep = Some(job);
        self
    }

    pub fn with_scheduler(mut self, job: SchedulerJob) -> Self {
        self.scheduler = Some(job);
        self
    }

    /// Start all registered background jobs.
    pub async fn start(self) {
        info!("Starting background job runner");

        if let Some(job) = self.jail_engine {
            job.run().await;
        }

        if let Some(job) = self.expire_sweep {
            Arc::new(job).start().await;
        }

        if let Some(job) = self.scheduler {
            Arc::new(job).start().await;
        }

        info!("All background jobs started");
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}

use chrono::{Local, NaiveDate, Timelike};
use meshsentry_application::ports::{SchedulerPort, UpdateSelector};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Drives [`SchedulerPort::trigger_update`] once per day at `update_hour`.
/// Ticks every minute rather than sleeping 24h so a config change to
/// `update_hour` or a late start is picked up without a restart; a
/// last-run-date marker keeps the trigger to once per calendar day.
pub struct SchedulerJob {
    scheduler: Arc<dyn SchedulerPort>,
    auto_update: bool,
    update_hour: u32,
    tick_secs: u64,
    last_run: Mutex<Option<NaiveDate>>,
    shutdown: CancellationToken,
}

impl SchedulerJob {
    pub fn new(scheduler: Arc<dyn SchedulerPort>, auto_update: bool, update_hour: u32) -> Self {
        Self {
            scheduler,
            auto_update,
            update_hour,
            tick_secs: 60,
            last_run: Mutex::new(None),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_tick_secs(mut self, tick_secs: u64) -> Self {
        self.tick_secs = tick_secs;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    async fn maybe_run(&self) {
        if !self.auto_update {
            return;
        }
        let now = Local::now();
        if now.hour() == self.update_hour {
            let today = now.date_naive();
            let mut last_run = self.last_run.lock().await;
            if *last_run == Some(today) {
                return;
            }
            *last_run = Some(today);
            drop(last_run);

            info!("SchedulerJob: triggering daily geo-data update");
            match self.scheduler.trigger_update(UpdateSelector::All).await {
                Ok(()) => info!("SchedulerJob: daily update completed"),
                Err(e) => error!(error = %e, "SchedulerJob: daily update failed"),
            }
        }
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            auto_update = self.auto_update,
            update_hour = self.update_hour,
            "Starting geo-data scheduler job"
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.tick_secs));
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("SchedulerJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        self.maybe_run().await;
                    }
                }
            }
        });
    }
}

use meshsentry_application::use_cases::ExpireSweepUseCase;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub struct ExpireSweepJob {
    sweep: Arc<ExpireSweepUseCase>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl ExpireSweepJob {
    pub fn new(sweep: Arc<ExpireSweepUseCase>) -> Self {
        Self {
            sweep,
            interval_secs: 60,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            interval_secs = self.interval_secs,
            "Starting expire sweep job"
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("ExpireSweepJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        match self.sweep.execute().await {
                            Ok(deleted) => {
                                if deleted > 0 {
                                    info!(deleted, "Expire sweep completed");
                                }
                            }
                            Err(e) => error!(error = %e, "Expire sweep failed"),
                        }
                    }
                }
            }
        });
    }
}

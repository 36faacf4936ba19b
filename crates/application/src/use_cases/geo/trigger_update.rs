use meshsentry_domain::MeshError;
use std::sync::Arc;
use tracing::instrument;

use crate::ports::{SchedulerPort, UpdateSelector};

/// Runs the scheduler's update logic immediately; does not advance the
/// daily marker, so the automatic run still fires later the same day if it
/// hasn't already.
pub struct TriggerUpdateUseCase {
    scheduler: Arc<dyn SchedulerPort>,
}

impl TriggerUpdateUseCase {
    pub fn new(scheduler: Arc<dyn SchedulerPort>) -> Self {
        Self { scheduler }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, selector: UpdateSelector) -> Result<(), MeshError> {
        self.scheduler.trigger_update(selector).await
    }
}

use meshsentry_domain::SyncStatus;
use std::sync::Arc;
use tracing::instrument;

use crate::ports::ReconcilerPort;

pub struct GetSyncStatusUseCase {
    reconciler: Arc<dyn ReconcilerPort>,
}

impl GetSyncStatusUseCase {
    pub fn new(reconciler: Arc<dyn ReconcilerPort>) -> Self {
        Self { reconciler }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self) -> SyncStatus {
        self.reconciler.get_sync_status().await
    }
}

use meshsentry_domain::MeshError;
use std::sync::Arc;
use tracing::{instrument, warn};

use crate::ports::{PolicyStorePort, ReconcilerPort};

/// Deletes rows with `expires_at <= now` and `essential = 0`. Sweep errors
/// are logged, not propagated as a fatal condition to the caller's wider
/// workflow — per the error handling design, expiration sweep errors are
/// logged rather than aborting the scheduler that drives it.
pub struct ExpireSweepUseCase {
    store: Arc<dyn PolicyStorePort>,
    reconciler: Arc<dyn ReconcilerPort>,
}

impl ExpireSweepUseCase {
    pub fn new(store: Arc<dyn PolicyStorePort>, reconciler: Arc<dyn ReconcilerPort>) -> Self {
        Self { store, reconciler }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self) -> Result<u64, MeshError> {
        match self.store.expire_sweep().await {
            Ok(deleted) => {
                if deleted > 0 {
                    self.reconciler.request_apply();
                }
                Ok(deleted)
            }
            Err(e) => {
                warn!(error = %e, "expire sweep failed");
                Err(e)
            }
        }
    }
}

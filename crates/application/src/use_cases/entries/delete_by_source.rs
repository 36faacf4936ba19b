use meshsentry_domain::MeshError;
use std::sync::Arc;
use tracing::instrument;

use crate::ports::{PolicyStorePort, ReconcilerPort};

/// Bulk-removes non-essential rows whose `source` starts with `prefix`,
/// e.g. `jail:sshd` when a jail is deleted.
pub struct DeleteBySourceUseCase {
    store: Arc<dyn PolicyStorePort>,
    reconciler: Arc<dyn ReconcilerPort>,
}

impl DeleteBySourceUseCase {
    pub fn new(store: Arc<dyn PolicyStorePort>, reconciler: Arc<dyn ReconcilerPort>) -> Self {
        Self { store, reconciler }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, prefix: &str) -> Result<u64, MeshError> {
        let deleted = self.store.delete_by_source(prefix).await?;
        if deleted > 0 {
            self.reconciler.request_apply();
        }
        Ok(deleted)
    }
}

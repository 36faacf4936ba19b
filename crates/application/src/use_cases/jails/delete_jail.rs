use meshsentry_domain::MeshError;
use std::sync::Arc;
use tracing::instrument;

use crate::ports::{JailLifecyclePort, JailRepositoryPort, PolicyStorePort, ReconcilerPort};

/// `delete → stop + delete owned entries by source prefix`.
pub struct DeleteJailUseCase {
    jail_repo: Arc<dyn JailRepositoryPort>,
    lifecycle: Arc<dyn JailLifecyclePort>,
    store: Arc<dyn PolicyStorePort>,
    reconciler: Arc<dyn ReconcilerPort>,
}

impl DeleteJailUseCase {
    pub fn new(
        jail_repo: Arc<dyn JailRepositoryPort>,
        lifecycle: Arc<dyn JailLifecyclePort>,
        store: Arc<dyn PolicyStorePort>,
        reconciler: Arc<dyn ReconcilerPort>,
    ) -> Self {
        Self {
            jail_repo,
            lifecycle,
            store,
            reconciler,
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, name: &str) -> Result<(), MeshError> {
        self.lifecycle.stop(name).await?;
        self.jail_repo.delete(name).await?;

        let prefix = meshsentry_domain::firewall_entry::source::jail(name);
        self.store.delete_by_source(&prefix).await?;
        self.reconciler.request_apply();

        Ok(())
    }
}

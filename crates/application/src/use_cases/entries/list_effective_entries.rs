use meshsentry_domain::{EntryType, FirewallEntry, MeshError};
use std::sync::Arc;
use tracing::instrument;

use crate::ports::PolicyStorePort;

pub struct ListEffectiveEntriesUseCase {
    store: Arc<dyn PolicyStorePort>,
}

impl ListEffectiveEntriesUseCase {
    pub fn new(store: Arc<dyn PolicyStorePort>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self,
        entry_type: Option<EntryType>,
    ) -> Result<Vec<FirewallEntry>, MeshError> {
        self.store.effective_entries(entry_type).await
    }
}

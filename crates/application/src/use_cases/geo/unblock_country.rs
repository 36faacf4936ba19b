use meshsentry_domain::{EntryType, MeshError};
use std::sync::Arc;
use tracing::instrument;

use crate::ports::{PolicyStorePort, ReconcilerPort};

/// Removes the `country` entry for `country_code`, if present. Goes through
/// `delete_entry` (not a raw SQL delete) so essential protection still
/// applies — invariant 3 forbids a country-unblock from removing an
/// `essential = 1` row.
pub struct UnblockCountryUseCase {
    store: Arc<dyn PolicyStorePort>,
    reconciler: Arc<dyn ReconcilerPort>,
}

impl UnblockCountryUseCase {
    pub fn new(store: Arc<dyn PolicyStorePort>, reconciler: Arc<dyn ReconcilerPort>) -> Self {
        Self { store, reconciler }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, country_code: &str) -> Result<(), MeshError> {
        let code = country_code.to_uppercase();
        let entries = self
            .store
            .effective_entries(Some(EntryType::Country))
            .await?;

        let entry = entries
            .into_iter()
            .find(|e| e.value.as_ref() == code)
            .ok_or_else(|| MeshError::NotFound(format!("country entry '{code}' not found")))?;
        let id = entry
            .id
            .ok_or_else(|| MeshError::StoreUnavailable("entry missing row id".to_string()))?;

        self.store.delete_entry(id, false).await?;
        self.reconciler.request_apply();

        Ok(())
    }
}

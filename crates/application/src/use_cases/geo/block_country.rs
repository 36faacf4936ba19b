use meshsentry_domain::{
    firewall_entry::source, validators, Action, Direction, EntryType, FirewallEntry, MeshError,
    Protocol,
};
use std::sync::Arc;
use tracing::instrument;

use crate::ports::{GeoProviderPort, PolicyStorePort, ReconcilerPort};

/// Upserts a `country` entry and primes the zone cache for it.
pub struct BlockCountryUseCase {
    store: Arc<dyn PolicyStorePort>,
    geo: Arc<dyn GeoProviderPort>,
    reconciler: Arc<dyn ReconcilerPort>,
}

impl BlockCountryUseCase {
    pub fn new(
        store: Arc<dyn PolicyStorePort>,
        geo: Arc<dyn GeoProviderPort>,
        reconciler: Arc<dyn ReconcilerPort>,
    ) -> Self {
        Self {
            store,
            geo,
            reconciler,
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, country_code: &str) -> Result<(), MeshError> {
        validators::validate_country_code(country_code).map_err(MeshError::Validation)?;
        let code = country_code.to_uppercase();

        let entry = FirewallEntry::new(
            EntryType::Country,
            code.clone(),
            Protocol::Both,
            Action::Block,
            Direction::Inbound,
            source::SYSTEM.to_string(),
            None,
            None,
            false,
            None,
        );
        self.store.upsert_entry(entry).await?;
        self.geo.fetch_and_cache(&code).await?;
        self.reconciler.request_apply();

        Ok(())
    }
}

use std::sync::Arc;
use tracing::{info, instrument};

use crate::ports::{GeoProviderPort, ReconcilerPort};

/// Wraps `GeoProviderPort::refresh_all_zones`; requests an apply when at
/// least one zone changed so the country table picks up the new CIDRs.
pub struct RefreshZonesUseCase {
    geo: Arc<dyn GeoProviderPort>,
    reconciler: Arc<dyn ReconcilerPort>,
}

impl RefreshZonesUseCase {
    pub fn new(geo: Arc<dyn GeoProviderPort>, reconciler: Arc<dyn ReconcilerPort>) -> Self {
        Self { geo, reconciler }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self) -> (usize, usize) {
        let (updated, errors) = self.geo.refresh_all_zones().await;
        if updated > 0 {
            self.reconciler.request_apply();
        }
        info!(updated, errors, "zone refresh complete");
        (updated, errors)
    }
}

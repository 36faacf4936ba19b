use async_trait::async_trait;
use meshsentry_application::ports::{GeoIpLookupPort, GeoProviderPort, SchedulerPort, UpdateSelector};
use meshsentry_domain::MeshError;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Concrete [`SchedulerPort`]: runs the update logic for a given selector
/// immediately. The daily wall-clock tick and the once-per-day dedup marker
/// are owned by `meshsentry-jobs::SchedulerJob`, which drives this port —
/// this type has no internal loop of its own.
///
/// `Lookup` reloads the configured GeoIP database in place. There is no
/// external download step in scope (the spec treats the GeoIP facility as
/// ambient, sharing the scheduler without a fetch contract of its own), so
/// `Lookup` degrades to a freshness check plus stale-variant cleanup rather
/// than fetching a new database.
pub struct GeoScheduler {
    geo: Arc<dyn GeoProviderPort>,
    geoip: Option<Arc<dyn GeoIpLookupPort>>,
}

impl GeoScheduler {
    pub fn new(geo: Arc<dyn GeoProviderPort>, geoip: Option<Arc<dyn GeoIpLookupPort>>) -> Self {
        Self { geo, geoip }
    }

    async fn run_blocking(&self) -> Result<(), MeshError> {
        let (updated, errors) = self.geo.refresh_all_zones().await;
        info!(updated, errors, "blocking zone refresh complete");
        if errors > 0 && updated == 0 {
            return Err(MeshError::Fetch(format!(
                "all {errors} country zone fetches failed"
            )));
        }
        Ok(())
    }

    fn run_lookup(&self) -> Result<(), MeshError> {
        let Some(geoip) = &self.geoip else {
            return Ok(());
        };
        match geoip.file_info() {
            Some(info) => {
                info!(size_bytes = info.size_bytes, modified = %info.modified, "GeoIP database checked");
                Ok(())
            }
            None => {
                warn!("GeoIP lookup database not available");
                Ok(())
            }
        }
    }
}

#[async_trait]
impl SchedulerPort for GeoScheduler {
    #[instrument(skip(self))]
    async fn trigger_update(&self, selector: UpdateSelector) -> Result<(), MeshError> {
        match selector {
            UpdateSelector::All => {
                let blocking = self.run_blocking().await;
                let lookup = self.run_lookup();
                blocking.and(lookup)
            }
            UpdateSelector::Blocking => self.run_blocking().await,
            UpdateSelector::Lookup => self.run_lookup(),
        }
    }
}

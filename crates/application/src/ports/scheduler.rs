use async_trait::async_trait;
use meshsentry_domain::MeshError;

/// Which data the daily/manual update refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateSelector {
    All,
    Lookup,
    Blocking,
}

/// Application-layer port for the daily geo-data scheduler's manual trigger.
#[async_trait]
pub trait SchedulerPort: Send + Sync {
    /// Runs the update logic immediately; does not advance the daily marker.
    async fn trigger_update(&self, selector: UpdateSelector) -> Result<(), MeshError>;
}

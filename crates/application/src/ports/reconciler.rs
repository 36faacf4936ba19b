use async_trait::async_trait;
use meshsentry_domain::{MeshError, SyncStatus};
use std::sync::Arc;

/// One named set of elements a [`Table`] wants present in the kernel filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredSet {
    pub name: String,
    pub elements: Vec<String>,
}

/// The full desired state for one table's `(family, name)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredState {
    pub family: String,
    pub table_name: String,
    pub sets: Vec<DesiredSet>,
}

/// A renderer registered with the reconciler. `render` must be pure over an
/// instant snapshot of the Policy Store and Geo Provider; it performs no
/// mutation.
#[async_trait]
pub trait Table: Send + Sync {
    fn family(&self) -> &str;

    fn name(&self) -> &str;

    async fn render(&self) -> Result<DesiredState, MeshError>;
}

/// Application-layer port for the debounced, coalescing applier.
#[async_trait]
pub trait ReconcilerPort: Send + Sync {
    fn register_table(&self, table: Arc<dyn Table>);

    /// Non-blocking: marks a request pending and signals the apply loop.
    fn request_apply(&self);

    /// Blocks until the next coalesced apply cycle completes and returns its
    /// result.
    async fn apply_all(&self) -> Result<(), MeshError>;

    async fn get_sync_status(&self) -> SyncStatus;

    /// Cancels the apply loop. An in-flight apply is allowed to finish; its
    /// result is discarded.
    async fn stop(&self);
}

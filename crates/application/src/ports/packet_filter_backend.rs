use async_trait::async_trait;
use meshsentry_domain::MeshError;

/// Application-layer port over the kernel packet-filter CLI driver.
///
/// Idempotent at the error layer: implementations swallow "element exists"
/// on add and "no such element/set" on delete (logged at debug); every other
/// error is surfaced as [`MeshError::BackendTransient`].
#[async_trait]
pub trait PacketFilterBackendPort: Send + Sync {
    async fn add_elements(
        &self,
        family: &str,
        table: &str,
        set: &str,
        elements: &[String],
    ) -> Result<(), MeshError>;

    async fn delete_elements(
        &self,
        family: &str,
        table: &str,
        set: &str,
        elements: &[String],
    ) -> Result<(), MeshError>;

    async fn flush_set(&self, family: &str, table: &str, set: &str) -> Result<(), MeshError>;
}

use async_trait::async_trait;
use meshsentry_domain::MeshError;

/// Application-layer port for the `geo_*`/`fw_*`/`jail_*` settings KV store.
///
/// Encrypted values use a separate pair so callers never accidentally read
/// ciphertext through the plain accessor.
#[async_trait]
pub trait SettingsPort: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, MeshError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), MeshError>;

    async fn get_encrypted(&self, key: &str) -> Result<Option<String>, MeshError>;

    async fn set_encrypted(&self, key: &str, value: &str) -> Result<(), MeshError>;
}

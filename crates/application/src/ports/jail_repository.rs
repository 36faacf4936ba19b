use async_trait::async_trait;
use meshsentry_domain::{Jail, MeshError};

/// Application-layer port for jail (rate-detection rule) persistence.
#[async_trait]
pub trait JailRepositoryPort: Send + Sync {
    async fn create(&self, jail: Jail) -> Result<Jail, MeshError>;

    async fn get_by_name(&self, name: &str) -> Result<Option<Jail>, MeshError>;

    async fn get_all(&self) -> Result<Vec<Jail>, MeshError>;

    /// Persists a jail's mutable fields. Implementations update
    /// `last_log_pos` independently via [`JailRepositoryPort::save_log_pos`]
    /// to avoid clobbering the tailer's progress with a stale in-memory copy.
    async fn update(&self, jail: Jail) -> Result<Jail, MeshError>;

    async fn save_log_pos(&self, name: &str, pos: u64) -> Result<(), MeshError>;

    async fn delete(&self, name: &str) -> Result<(), MeshError>;
}

use async_trait::async_trait;
use meshsentry_domain::{Jail, MeshError};

/// Application-layer port over jail supervisor lifecycle management. The
/// concrete implementation owns the per-jail tailer tasks; CRUD use cases
/// drive it rather than reaching into the supervisor map directly.
///
/// A missing log file is not fatal: implementations log a warning and leave
/// the jail stopped rather than returning an error from `start`.
#[async_trait]
pub trait JailLifecyclePort: Send + Sync {
    async fn start(&self, jail: Jail) -> Result<(), MeshError>;

    async fn stop(&self, name: &str) -> Result<(), MeshError>;

    /// Stop then start, used on update so a changed `filter_regex` or
    /// `log_file` takes effect immediately.
    async fn restart(&self, jail: Jail) -> Result<(), MeshError>;
}

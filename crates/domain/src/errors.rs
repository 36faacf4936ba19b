use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeshError {
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("packet-filter backend error: {0}")]
    BackendTransient(String),

    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("config drift: {0}")]
    ConfigDrift(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("essential entry cannot be removed: {0}")]
    EssentialProtected(String),
}

use chrono::{DateTime, Utc};

/// Snapshot of the reconciler's apply state.
#[derive(Debug, Clone, Default)]
pub struct SyncStatus {
    pub in_sync: bool,
    pub last_apply_at: Option<DateTime<Utc>>,
    pub last_apply_error: Option<String>,
    pub pending: bool,
}

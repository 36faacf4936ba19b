use chrono::{DateTime, Utc};
use meshsentry_domain::SyncStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct CountryRequest {
    pub country_code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSelectorQuery {
    #[serde(default = "default_selector")]
    pub selector: String,
}

fn default_selector() -> String {
    "all".to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshZonesResponse {
    pub updated: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncStatusResponse {
    pub in_sync: bool,
    pub last_apply_at: Option<DateTime<Utc>>,
    pub last_apply_error: Option<String>,
    pub pending: bool,
}

impl From<SyncStatus> for SyncStatusResponse {
    fn from(s: SyncStatus) -> Self {
        Self {
            in_sync: s.in_sync,
            last_apply_at: s.last_apply_at,
            last_apply_error: s.last_apply_error,
            pending: s.pending,
        }
    }
}

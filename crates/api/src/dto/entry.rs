use chrono::{DateTime, Utc};
use meshsentry_domain::FirewallEntry;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct EntryResponse {
    pub id: Option<i64>,
    pub entry_type: String,
    pub value: String,
    pub protocol: String,
    pub action: String,
    pub direction: String,
    pub source: String,
    pub reason: Option<String>,
    pub name: Option<String>,
    pub essential: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub enabled: bool,
    pub hit_count: i64,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<FirewallEntry> for EntryResponse {
    fn from(e: FirewallEntry) -> Self {
        Self {
            id: e.id,
            entry_type: e.entry_type.as_str().to_string(),
            value: e.value.to_string(),
            protocol: e.protocol.as_str().to_string(),
            action: e.action.as_str().to_string(),
            direction: e.direction.as_str().to_string(),
            source: e.source.to_string(),
            reason: e.reason.map(|s| s.to_string()),
            name: e.name.map(|s| s.to_string()),
            essential: e.essential,
            expires_at: e.expires_at,
            enabled: e.enabled,
            hit_count: e.hit_count,
            created_at: e.created_at,
        }
    }
}

/// Request DTO for creating/updating a firewall entry. String enum fields
/// are parsed by the handler so an unrecognised value produces a single
/// consistent 400 response rather than a serde field error.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertEntryRequest {
    pub id: Option<i64>,
    pub entry_type: String,
    pub value: String,
    #[serde(default = "default_protocol")]
    pub protocol: String,
    #[serde(default = "default_action")]
    pub action: String,
    #[serde(default = "default_direction")]
    pub direction: String,
    #[serde(default = "default_source")]
    pub source: String,
    pub reason: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub essential: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

fn default_protocol() -> String {
    "both".to_string()
}

fn default_action() -> String {
    "block".to_string()
}

fn default_direction() -> String {
    "inbound".to_string()
}

fn default_source() -> String {
    "manual".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListEntriesQuery {
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteEntryQuery {
    #[serde(default)]
    pub essential_override: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkImportResultResponse {
    pub value: String,
    pub status: String,
    pub error: Option<String>,
}

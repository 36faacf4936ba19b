use meshsentry_domain::Jail;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct JailResponse {
    pub id: Option<i64>,
    pub name: String,
    pub enabled: bool,
    pub log_file: String,
    pub filter_regex: String,
    pub max_retry: u32,
    pub find_time_secs: u64,
    pub ban_time_secs: u64,
    pub port: Option<u16>,
    pub protocol: String,
    pub action: String,
    pub escalation_enabled: bool,
    pub escalation_threshold: u32,
    pub escalation_window_secs: u64,
}

impl From<Jail> for JailResponse {
    fn from(j: Jail) -> Self {
        Self {
            id: j.id,
            name: j.name.to_string(),
            enabled: j.enabled,
            log_file: j.log_file.to_string(),
            filter_regex: j.filter_regex.to_string(),
            max_retry: j.max_retry,
            find_time_secs: j.find_time_secs,
            ban_time_secs: j.ban_time_secs,
            port: j.port,
            protocol: j.protocol.as_str().to_string(),
            action: j.action.as_str().to_string(),
            escalation_enabled: j.escalation.enabled,
            escalation_threshold: j.escalation.threshold,
            escalation_window_secs: j.escalation.window_secs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JailRequest {
    pub name: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub log_file: String,
    pub filter_regex: String,
    pub max_retry: u32,
    pub find_time_secs: u64,
    pub ban_time_secs: u64,
    pub port: Option<u16>,
    #[serde(default = "default_protocol")]
    pub protocol: String,
    #[serde(default = "default_action")]
    pub action: String,
    #[serde(default)]
    pub escalation_enabled: bool,
    #[serde(default = "default_escalation_threshold")]
    pub escalation_threshold: u32,
    #[serde(default = "default_escalation_window_secs")]
    pub escalation_window_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_protocol() -> String {
    "tcp".to_string()
}

fn default_action() -> String {
    "block".to_string()
}

fn default_escalation_threshold() -> u32 {
    3
}

fn default_escalation_window_secs() -> u64 {
    3600
}

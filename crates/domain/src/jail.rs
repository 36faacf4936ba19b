use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::firewall_entry::{Action, Protocol};

/// A named rate-detection rule, modeled on the fail2ban jail idiom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jail {
    pub id: Option<i64>,
    pub name: Arc<str>,
    pub enabled: bool,
    pub log_file: Arc<str>,
    pub filter_regex: Arc<str>,
    pub max_retry: u32,
    pub find_time_secs: u64,
    pub ban_time_secs: u64,
    pub port: Option<u16>,
    pub protocol: Protocol,
    pub action: Action,
    pub last_log_pos: u64,
    pub escalation: EscalationConfig,
}

/// Auto-escalation of repeated per-IP bans within the same /24 into one
/// range ban.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EscalationConfig {
    pub enabled: bool,
    pub threshold: u32,
    pub window_secs: u64,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold: 3,
            window_secs: 3600,
        }
    }
}

impl Jail {
    /// `ban_time_secs == 0` means a permanent ban (no expiry).
    pub fn is_permanent_ban(&self) -> bool {
        self.ban_time_secs == 0
    }

    pub fn default_sshd() -> Self {
        Self {
            id: None,
            name: Arc::from("sshd"),
            enabled: true,
            log_file: Arc::from("/var/log/auth.log"),
            filter_regex: Arc::from(r"Failed password .* from (\d+\.\d+\.\d+\.\d+)"),
            max_retry: 5,
            find_time_secs: 600,
            ban_time_secs: 3600,
            port: Some(22),
            protocol: Protocol::Tcp,
            action: Action::Block,
            last_log_pos: 0,
            escalation: EscalationConfig {
                enabled: true,
                threshold: 3,
                window_secs: 3600,
            },
        }
    }

    pub fn default_portscan() -> Self {
        Self {
            id: None,
            name: Arc::from("portscan"),
            enabled: true,
            log_file: Arc::from("/var/log/firewall.log"),
            filter_regex: Arc::from(r"SRC=(\d+\.\d+\.\d+\.\d+).*DPT=(\d+)"),
            max_retry: 10,
            find_time_secs: 60,
            ban_time_secs: 86400,
            port: None,
            protocol: Protocol::Both,
            action: Action::Block,
            last_log_pos: 0,
            escalation: EscalationConfig {
                enabled: true,
                threshold: 3,
                window_secs: 3600,
            },
        }
    }
}

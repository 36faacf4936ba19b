use serde::{Deserialize, Serialize};

/// Jail engine defaults and path safety configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JailDefaultsConfig {
    /// Roots a jail's `log_file` must resolve under.
    #[serde(default = "default_allowed_roots")]
    pub allowed_log_roots: Vec<String>,

    /// Poll cadence for the tailer.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// IPs never considered for ban (e.g. admin networks).
    #[serde(default)]
    pub ignore_ips: Vec<String>,

    /// The WireGuard UDP port; portscan-jail hits targeting it are ignored.
    #[serde(default = "default_wireguard_port")]
    pub wireguard_port: u16,
}

impl Default for JailDefaultsConfig {
    fn default() -> Self {
        Self {
            allowed_log_roots: default_allowed_roots(),
            poll_interval_secs: default_poll_interval_secs(),
            ignore_ips: Vec::new(),
            wireguard_port: default_wireguard_port(),
        }
    }
}

fn default_allowed_roots() -> Vec<String> {
    vec!["/var/log".to_string()]
}

fn default_poll_interval_secs() -> u64 {
    2
}

fn default_wireguard_port() -> u16 {
    51820
}

use serde::{Deserialize, Serialize};

/// Reconciler + Packet-Filter Backend tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FirewallConfig {
    /// Packet-filter CLI binary name. Defaults to `nft`.
    #[serde(default = "default_binary")]
    pub backend_binary: String,

    #[serde(default = "default_family")]
    pub family: String,

    #[serde(default = "default_table")]
    pub table: String,

    /// Maximum elements per batched add/delete invocation.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Debounce window after the last `RequestApply`.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Hard cap since the first pending `RequestApply` in a burst.
    #[serde(default = "default_hard_cap_ms")]
    pub hard_cap_ms: u64,
}

impl Default for FirewallConfig {
    fn default() -> Self {
        Self {
            backend_binary: default_binary(),
            family: default_family(),
            table: default_table(),
            batch_size: default_batch_size(),
            debounce_ms: default_debounce_ms(),
            hard_cap_ms: default_hard_cap_ms(),
        }
    }
}

fn default_binary() -> String {
    "nft".to_string()
}

fn default_family() -> String {
    "inet".to_string()
}

fn default_table() -> String {
    "firewall".to_string()
}

fn default_batch_size() -> usize {
    1000
}

fn default_debounce_ms() -> u64 {
    150
}

fn default_hard_cap_ms() -> u64 {
    1000
}

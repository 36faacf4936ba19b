use serde::{Deserialize, Serialize};

/// Daily geo-data reconciliation scheduler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_auto_update")]
    pub auto_update: bool,

    /// Wall-clock hour (0-23, local evaluation clock) at which the daily
    /// update runs.
    #[serde(default = "default_update_hour")]
    pub update_hour: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            auto_update: default_auto_update(),
            update_hour: default_update_hour(),
        }
    }
}

fn default_auto_update() -> bool {
    true
}

fn default_update_hour() -> u32 {
    3
}

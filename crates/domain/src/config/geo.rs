use serde::{Deserialize, Serialize};

/// Geo-blocking provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeoConfig {
    /// URL template with a `{country}` placeholder, e.g.
    /// `https://www.ipdeny.com/ipblocks/data/countries/{country}.zone`.
    #[serde(default = "default_zone_url_template")]
    pub zone_url_template: String,

    /// Staleness threshold before `NeedsUpdate` returns true.
    #[serde(default = "default_staleness_days")]
    pub staleness_days: i64,

    /// Path to a MaxMind-format GeoIP database, if GeoIP lookups are enabled.
    #[serde(default)]
    pub geoip_db_path: Option<String>,

    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            zone_url_template: default_zone_url_template(),
            staleness_days: default_staleness_days(),
            geoip_db_path: None,
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

fn default_zone_url_template() -> String {
    "https://www.ipdeny.com/ipblocks/data/countries/{country}.zone".to_string()
}

fn default_staleness_days() -> i64 {
    7
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

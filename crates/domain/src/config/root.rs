use serde::{Deserialize, Serialize};

use super::{
    database::DatabaseConfig, errors::ConfigError, firewall::FirewallConfig, geo::GeoConfig,
    jail::JailDefaultsConfig, logging::LoggingConfig, scheduler::SchedulerConfig,
    server::ServerConfig,
};
use crate::validators;

/// Command-line overrides applied on top of the file-loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub admin_port: Option<u16>,
    pub bind_address: Option<String>,
    pub database_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub firewall: FirewallConfig,
    #[serde(default)]
    pub jail: JailDefaultsConfig,
    #[serde(default)]
    pub geo: GeoConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl Config {
    /// Load configuration from an optional TOML file, then apply CLI
    /// overrides. A missing file is not an error; defaults are used.
    pub fn load(config_path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
                    path: path.to_string(),
                    source: e,
                })?;
                toml::from_str(&text)?
            }
            None => Config::default(),
        };

        if let Some(port) = overrides.admin_port {
            config.server.admin_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            config.server.bind_address = bind;
        }
        if let Some(path) = overrides.database_path {
            config.database.path = path;
        }

        Ok(config)
    }

    /// Rejects unparseable CIDRs/ports/paths/URLs before the rest of the
    /// system starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.firewall.batch_size == 0 {
            return Err(ConfigError::Invalid(
                "firewall.batch_size must be > 0".to_string(),
            ));
        }
        if self.firewall.debounce_ms == 0 {
            return Err(ConfigError::Invalid(
                "firewall.debounce_ms must be > 0".to_string(),
            ));
        }
        if self.firewall.hard_cap_ms < self.firewall.debounce_ms {
            return Err(ConfigError::Invalid(
                "firewall.hard_cap_ms must be >= firewall.debounce_ms".to_string(),
            ));
        }
        if self.scheduler.update_hour > 23 {
            return Err(ConfigError::Invalid(
                "scheduler.update_hour must be in 0..=23".to_string(),
            ));
        }
        for root in &self.jail.allowed_log_roots {
            if !std::path::Path::new(root).is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "jail.allowed_log_roots entry '{root}' must be an absolute path"
                )));
            }
        }
        for ip in &self.jail.ignore_ips {
            validators::validate_ip(ip).map_err(ConfigError::Invalid)?;
        }
        if !self.geo.zone_url_template.contains("{country}") {
            return Err(ConfigError::Invalid(
                "geo.zone_url_template must contain a {country} placeholder".to_string(),
            ));
        }
        Ok(())
    }
}

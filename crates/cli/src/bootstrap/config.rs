use meshsentry_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(config_path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(config_path, overrides)?;
    config.validate()?;

    info!(
        config_file = config_path.unwrap_or("default"),
        admin_port = config.server.admin_port,
        bind = %config.server.bind_address,
        database = %config.database.path,
        "configuration loaded"
    );

    Ok(config)
}

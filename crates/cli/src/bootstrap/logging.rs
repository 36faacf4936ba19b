use meshsentry_domain::Config;
use tracing::info;

pub fn init_logging(config: &Config) {
    let log_level = config.logging.level.parse().unwrap_or(tracing::Level::INFO);

    let subscriber = tracing_subscriber::fmt()
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .with_max_level(log_level);

    if config.logging.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!(level = %config.logging.level, json = config.logging.json, "logging initialized");
}

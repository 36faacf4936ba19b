use meshsentry_domain::config::DatabaseConfig;
use meshsentry_infrastructure::database::{create_read_pool, create_write_pool};
use sqlx::SqlitePool;
use tracing::{error, info};

pub async fn init_database(cfg: &DatabaseConfig) -> anyhow::Result<(SqlitePool, SqlitePool)> {
    info!(path = %cfg.path, "initializing database");

    let write_pool = create_write_pool(&cfg.path, cfg).await.map_err(|e| {
        error!(error = %e, "failed to initialize write pool");
        anyhow::anyhow!(e)
    })?;

    let read_pool = create_read_pool(&cfg.path, cfg).await.map_err(|e| {
        error!(error = %e, "failed to initialize read pool");
        anyhow::anyhow!(e)
    })?;

    info!(
        write_pool_max = cfg.write_pool_max_connections,
        read_pool_max = cfg.read_pool_max_connections,
        "database initialized"
    );

    Ok((write_pool, read_pool))
}

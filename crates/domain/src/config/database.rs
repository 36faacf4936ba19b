use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Maximum connections in the write pool (admin CRUD, jail writes,
    /// reconciler state). SQLite WAL serialises writers at the file level,
    /// so more than 3-4 connections do not increase write throughput.
    #[serde(default = "default_write_pool_max_connections")]
    pub write_pool_max_connections: u32,

    /// Maximum connections in the read pool (dashboard/API list endpoints).
    #[serde(default = "default_read_pool_max_connections")]
    pub read_pool_max_connections: u32,

    /// Seconds the write pool waits for a database lock before returning
    /// `SQLITE_BUSY`.
    #[serde(default = "default_write_busy_timeout_secs")]
    pub write_busy_timeout_secs: u64,

    /// Number of WAL pages that trigger an automatic checkpoint.
    #[serde(default = "default_wal_autocheckpoint")]
    pub wal_autocheckpoint: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            write_pool_max_connections: default_write_pool_max_connections(),
            read_pool_max_connections: default_read_pool_max_connections(),
            write_busy_timeout_secs: default_write_busy_timeout_secs(),
            wal_autocheckpoint: default_wal_autocheckpoint(),
        }
    }
}

fn default_db_path() -> String {
    "./meshsentry.db".to_string()
}

fn default_write_pool_max_connections() -> u32 {
    3
}

fn default_read_pool_max_connections() -> u32 {
    8
}

fn default_write_busy_timeout_secs() -> u64 {
    5
}

fn default_wal_autocheckpoint() -> u32 {
    1000
}

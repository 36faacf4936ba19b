use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// An in-memory pool with the schema applied directly (rather than through
/// `sqlx::migrate::Migrator`, which resolves `./migrations` relative to the
/// process's working directory — not reliably the workspace root under
/// `cargo test`). Mirrors the teacher's `client_repository_tests.rs` helper.
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite pool");

    sqlx::query(
        r#"
        CREATE TABLE firewall_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            entry_type TEXT NOT NULL,
            value TEXT NOT NULL,
            protocol TEXT NOT NULL,
            action TEXT NOT NULL,
            direction TEXT NOT NULL,
            source TEXT NOT NULL,
            reason TEXT,
            name TEXT,
            essential INTEGER NOT NULL DEFAULT 0,
            expires_at TEXT,
            enabled INTEGER NOT NULL DEFAULT 1,
            hit_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    sqlx::query(
        "CREATE UNIQUE INDEX idx_firewall_entries_unique ON firewall_entries (entry_type, value, protocol)",
    )
    .execute(&pool)
    .await
    .unwrap();

    sqlx::query(
        r#"
        CREATE TABLE jails (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            enabled INTEGER NOT NULL DEFAULT 1,
            log_file TEXT NOT NULL,
            filter_regex TEXT NOT NULL,
            max_retry INTEGER NOT NULL,
            find_time_secs INTEGER NOT NULL,
            ban_time_secs INTEGER NOT NULL,
            port INTEGER,
            protocol TEXT NOT NULL,
            action TEXT NOT NULL,
            last_log_pos INTEGER NOT NULL DEFAULT 0,
            escalate_enabled INTEGER NOT NULL DEFAULT 0,
            escalate_threshold INTEGER NOT NULL DEFAULT 3,
            escalate_window_secs INTEGER NOT NULL DEFAULT 3600
        )
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    sqlx::query(
        r#"
        CREATE TABLE country_zones_cache (
            country_code TEXT PRIMARY KEY,
            cidr_list TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    pool
}

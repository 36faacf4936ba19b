use async_trait::async_trait;
use meshsentry_application::ports::JailRepositoryPort;
use meshsentry_domain::jail::EscalationConfig;
use meshsentry_domain::{Action, MeshError, Protocol};
use meshsentry_domain::Jail;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{error, instrument};

#[allow(clippy::type_complexity)]
type JailRow = (
    i64,
    String,
    i64,
    String,
    String,
    i64,
    i64,
    i64,
    Option<i64>,
    String,
    String,
    i64,
    i64,
    i64,
    i64,
);

fn row_to_jail(row: JailRow) -> Result<Jail, MeshError> {
    let (
        id,
        name,
        enabled,
        log_file,
        filter_regex,
        max_retry,
        find_time_secs,
        ban_time_secs,
        port,
        protocol,
        action,
        last_log_pos,
        escalate_enabled,
        escalate_threshold,
        escalate_window_secs,
    ) = row;

    Ok(Jail {
        id: Some(id),
        name: Arc::from(name.as_str()),
        enabled: enabled != 0,
        log_file: Arc::from(log_file.as_str()),
        filter_regex: Arc::from(filter_regex.as_str()),
        max_retry: max_retry as u32,
        find_time_secs: find_time_secs as u64,
        ban_time_secs: ban_time_secs as u64,
        port: port.map(|p| p as u16),
        protocol: Protocol::from_str(&protocol)
            .ok_or_else(|| MeshError::StoreUnavailable(format!("bad protocol '{protocol}'")))?,
        action: Action::from_str(&action)
            .ok_or_else(|| MeshError::StoreUnavailable(format!("bad action '{action}'")))?,
        last_log_pos: last_log_pos as u64,
        escalation: EscalationConfig {
            enabled: escalate_enabled != 0,
            threshold: escalate_threshold as u32,
            window_secs: escalate_window_secs as u64,
        },
    })
}

pub struct SqliteJailRepository {
    pool: SqlitePool,
}

impl SqliteJailRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JailRepositoryPort for SqliteJailRepository {
    #[instrument(skip(self, jail))]
    async fn create(&self, jail: Jail) -> Result<Jail, MeshError> {
        let result = sqlx::query(
            "INSERT INTO jails
                (name, enabled, log_file, filter_regex, max_retry, find_time_secs,
                 ban_time_secs, port, protocol, action, last_log_pos,
                 escalate_enabled, escalate_threshold, escalate_window_secs)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?)",
        )
        .bind(jail.name.as_ref())
        .bind(jail.enabled as i64)
        .bind(jail.log_file.as_ref())
        .bind(jail.filter_regex.as_ref())
        .bind(jail.max_retry as i64)
        .bind(jail.find_time_secs as i64)
        .bind(jail.ban_time_secs as i64)
        .bind(jail.port.map(|p| p as i64))
        .bind(jail.protocol.as_str())
        .bind(jail.action.as_str())
        .bind(jail.escalation.enabled as i64)
        .bind(jail.escalation.threshold as i64)
        .bind(jail.escalation.window_secs as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE constraint failed") {
                MeshError::AlreadyExists(format!("jail '{}' already exists", jail.name))
            } else {
                error!(error = %e, "failed to create jail");
                MeshError::StoreUnavailable(e.to_string())
            }
        })?;

        let id = result.last_insert_rowid();
        self.get_by_name(&jail.name)
            .await?
            .filter(|j| j.id == Some(id))
            .ok_or_else(|| MeshError::StoreUnavailable("failed to fetch created jail".to_string()))
    }

    #[instrument(skip(self))]
    async fn get_by_name(&self, name: &str) -> Result<Option<Jail>, MeshError> {
        let row: Option<JailRow> = sqlx::query_as(
            "SELECT id, name, enabled, log_file, filter_regex, max_retry, find_time_secs,
                    ban_time_secs, port, protocol, action, last_log_pos,
                    escalate_enabled, escalate_threshold, escalate_window_secs
             FROM jails WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| MeshError::StoreUnavailable(e.to_string()))?;

        row.map(row_to_jail).transpose()
    }

    #[instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<Jail>, MeshError> {
        let rows: Vec<JailRow> = sqlx::query_as(
            "SELECT id, name, enabled, log_file, filter_regex, max_retry, find_time_secs,
                    ban_time_secs, port, protocol, action, last_log_pos,
                    escalate_enabled, escalate_threshold, escalate_window_secs
             FROM jails ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MeshError::StoreUnavailable(e.to_string()))?;

        rows.into_iter().map(row_to_jail).collect()
    }

    #[instrument(skip(self, jail))]
    async fn update(&self, jail: Jail) -> Result<Jail, MeshError> {
        sqlx::query(
            "UPDATE jails SET enabled = ?, log_file = ?, filter_regex = ?, max_retry = ?,
                find_time_secs = ?, ban_time_secs = ?, port = ?, protocol = ?, action = ?,
                escalate_enabled = ?, escalate_threshold = ?, escalate_window_secs = ?
             WHERE name = ?",
        )
        .bind(jail.enabled as i64)
        .bind(jail.log_file.as_ref())
        .bind(jail.filter_regex.as_ref())
        .bind(jail.max_retry as i64)
        .bind(jail.find_time_secs as i64)
        .bind(jail.ban_time_secs as i64)
        .bind(jail.port.map(|p| p as i64))
        .bind(jail.protocol.as_str())
        .bind(jail.action.as_str())
        .bind(jail.escalation.enabled as i64)
        .bind(jail.escalation.threshold as i64)
        .bind(jail.escalation.window_secs as i64)
        .bind(jail.name.as_ref())
        .execute(&self.pool)
        .await
        .map_err(|e| MeshError::StoreUnavailable(e.to_string()))?;

        self.get_by_name(&jail.name)
            .await?
            .ok_or_else(|| MeshError::NotFound(format!("jail '{}' not found", jail.name)))
    }

    #[instrument(skip(self))]
    async fn save_log_pos(&self, name: &str, pos: u64) -> Result<(), MeshError> {
        sqlx::query("UPDATE jails SET last_log_pos = ? WHERE name = ?")
            .bind(pos as i64)
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| MeshError::StoreUnavailable(e.to_string()))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, name: &str) -> Result<(), MeshError> {
        sqlx::query("DELETE FROM jails WHERE name = ?")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| MeshError::StoreUnavailable(e.to_string()))?;
        Ok(())
    }
}

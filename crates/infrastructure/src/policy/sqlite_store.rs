use async_trait::async_trait;
use chrono::{DateTime, Utc};
use meshsentry_application::ports::PolicyStorePort;
use meshsentry_domain::{Action, Direction, EntryType, FirewallEntry, MeshError, Protocol};
use sqlx::{Row, SqlitePool};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, instrument};

use super::block_cache::{parse_rows, BlockCache};

type EntryRow = (
    i64,
    String,
    String,
    String,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    i64,
    Option<String>,
    i64,
    i64,
    String,
);

fn row_to_entry(row: EntryRow) -> Result<FirewallEntry, MeshError> {
    let (
        id,
        entry_type,
        value,
        protocol,
        action,
        direction,
        source,
        reason,
        name,
        essential,
        expires_at,
        enabled,
        hit_count,
        created_at,
    ) = row;

    Ok(FirewallEntry {
        id: Some(id),
        entry_type: EntryType::from_str(&entry_type)
            .ok_or_else(|| MeshError::StoreUnavailable(format!("bad entry_type '{entry_type}'")))?,
        value: Arc::from(value.as_str()),
        protocol: Protocol::from_str(&protocol)
            .ok_or_else(|| MeshError::StoreUnavailable(format!("bad protocol '{protocol}'")))?,
        action: Action::from_str(&action)
            .ok_or_else(|| MeshError::StoreUnavailable(format!("bad action '{action}'")))?,
        direction: Direction::from_str(&direction)
            .ok_or_else(|| MeshError::StoreUnavailable(format!("bad direction '{direction}'")))?,
        source: Arc::from(source.as_str()),
        reason: reason.map(|s| Arc::from(s.as_str())),
        name: name.map(|s| Arc::from(s.as_str())),
        essential: essential != 0,
        expires_at: expires_at
            .map(|s| DateTime::parse_from_rfc3339(&s).map(|dt| dt.with_timezone(&Utc)))
            .transpose()
            .map_err(|e| MeshError::StoreUnavailable(format!("bad expires_at: {e}")))?,
        enabled: enabled != 0,
        hit_count,
        created_at: Some(
            DateTime::parse_from_rfc3339(&created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| MeshError::StoreUnavailable(format!("bad created_at: {e}")))?,
        ),
    })
}

/// SQLite-backed firewall policy store with an in-memory Block Cache for the
/// hot `IsBlocked` path described in the data model.
pub struct SqlitePolicyStore {
    pool: SqlitePool,
    block_cache: BlockCache,
}

impl SqlitePolicyStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            block_cache: BlockCache::new(Duration::from_secs(10)),
        }
    }

    pub fn with_ttl(pool: SqlitePool, ttl: Duration) -> Self {
        Self {
            pool,
            block_cache: BlockCache::new(ttl),
        }
    }
}

#[async_trait]
impl PolicyStorePort for SqlitePolicyStore {
    #[instrument(skip(self, entry))]
    async fn upsert_entry(&self, entry: FirewallEntry) -> Result<bool, MeshError> {
        let result = sqlx::query(
            "INSERT INTO firewall_entries
                (entry_type, value, protocol, action, direction, source, reason, name,
                 essential, expires_at, enabled, hit_count)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, 1)
             ON CONFLICT (entry_type, value, protocol) DO UPDATE SET
                hit_count = hit_count + 1,
                created_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now'),
                expires_at = excluded.expires_at,
                reason = excluded.reason,
                action = excluded.action,
                direction = excluded.direction,
                source = excluded.source,
                name = excluded.name
             RETURNING (hit_count = 1) AS is_new",
        )
        .bind(entry.entry_type.as_str())
        .bind(entry.value.as_ref())
        .bind(entry.protocol.as_str())
        .bind(entry.action.as_str())
        .bind(entry.direction.as_str())
        .bind(entry.source.as_ref())
        .bind(entry.reason.as_deref())
        .bind(entry.name.as_deref())
        .bind(entry.essential as i64)
        .bind(entry.expires_at.map(|t| t.to_rfc3339()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "failed to upsert firewall entry");
            MeshError::StoreUnavailable(e.to_string())
        })?;

        let is_new: i64 = result.get(0);
        Ok(is_new != 0)
    }

    #[instrument(skip(self))]
    async fn delete_entry(&self, id: i64, essential_override: bool) -> Result<(), MeshError> {
        if !essential_override {
            let essential: Option<(i64,)> =
                sqlx::query_as("SELECT essential FROM firewall_entries WHERE id = ?")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| MeshError::StoreUnavailable(e.to_string()))?;

            if let Some((1,)) = essential {
                return Err(MeshError::EssentialProtected(format!(
                    "entry {id} is essential"
                )));
            }
        }

        sqlx::query("DELETE FROM firewall_entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| MeshError::StoreUnavailable(e.to_string()))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_by_source(&self, prefix: &str) -> Result<u64, MeshError> {
        let pattern = format!("{prefix}%");
        let result = sqlx::query(
            "DELETE FROM firewall_entries WHERE essential = 0 AND source LIKE ? ESCAPE '\\'",
        )
        .bind(pattern)
        .execute(&self.pool)
        .await
        .map_err(|e| MeshError::StoreUnavailable(e.to_string()))?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn expire_sweep(&self) -> Result<u64, MeshError> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "DELETE FROM firewall_entries
             WHERE essential = 0 AND expires_at IS NOT NULL AND expires_at <= ?",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| MeshError::StoreUnavailable(e.to_string()))?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn effective_entries(
        &self,
        entry_type: Option<EntryType>,
    ) -> Result<Vec<FirewallEntry>, MeshError> {
        let now = Utc::now().to_rfc3339();
        let rows: Vec<EntryRow> = match entry_type {
            Some(t) => sqlx::query_as(
                "SELECT id, entry_type, value, protocol, action, direction, source, reason,
                        name, essential, expires_at, enabled, hit_count, created_at
                 FROM firewall_entries
                 WHERE entry_type = ? AND enabled = 1
                   AND (expires_at IS NULL OR expires_at > ?)",
            )
            .bind(t.as_str())
            .bind(&now)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| MeshError::StoreUnavailable(e.to_string()))?,
            None => sqlx::query_as(
                "SELECT id, entry_type, value, protocol, action, direction, source, reason,
                        name, essential, expires_at, enabled, hit_count, created_at
                 FROM firewall_entries
                 WHERE enabled = 1 AND (expires_at IS NULL OR expires_at > ?)",
            )
            .bind(&now)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| MeshError::StoreUnavailable(e.to_string()))?,
        };

        rows.into_iter().map(row_to_entry).collect()
    }

    #[instrument(skip(self))]
    async fn is_blocked(&self, ip: IpAddr) -> Result<bool, MeshError> {
        let pool = self.pool.clone();
        let blocked = self
            .block_cache
            .is_blocked(ip, move || async move {
                let now = Utc::now().to_rfc3339();
                let ip_rows: Vec<(String,)> = sqlx::query_as(
                    "SELECT value FROM firewall_entries
                     WHERE entry_type = 'ip' AND action = 'block' AND enabled = 1
                       AND (expires_at IS NULL OR expires_at > ?)",
                )
                .bind(&now)
                .fetch_all(&pool)
                .await
                .unwrap_or_default();

                let range_rows: Vec<(String,)> = sqlx::query_as(
                    "SELECT value FROM firewall_entries
                     WHERE entry_type = 'range' AND action = 'block' AND enabled = 1
                       AND (expires_at IS NULL OR expires_at > ?)",
                )
                .bind(&now)
                .fetch_all(&pool)
                .await
                .unwrap_or_default();

                parse_rows(
                    ip_rows.into_iter().map(|(v,)| v),
                    range_rows.into_iter().map(|(v,)| v),
                )
            })
            .await;
        Ok(blocked)
    }
}

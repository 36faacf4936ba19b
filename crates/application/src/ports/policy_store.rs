use async_trait::async_trait;
use meshsentry_domain::{EntryType, FirewallEntry, MeshError};
use std::net::IpAddr;

/// Application-layer port for the unified firewall policy store.
///
/// The concrete implementation owns a SQLite-backed repository plus the
/// in-memory Block Cache described in the data model; this trait exposes
/// only the contract the rest of the application depends on.
#[async_trait]
pub trait PolicyStorePort: Send + Sync {
    /// Inserts a new entry, or on `(entry_type, value, protocol)` conflict
    /// updates the mutable fields (`hit_count += 1`, refreshed `created_at`,
    /// overridden `expires_at`/`reason`).
    ///
    /// Returns `true` if the row was newly inserted, `false` if it updated
    /// an existing row.
    async fn upsert_entry(&self, entry: FirewallEntry) -> Result<bool, MeshError>;

    /// Removes an entry by row id. Refuses (`MeshError::EssentialProtected`)
    /// if the row is `essential` unless `essential_override` is set.
    async fn delete_entry(&self, id: i64, essential_override: bool) -> Result<(), MeshError>;

    /// Bulk-removes non-essential rows whose `source` starts with `prefix`.
    /// Returns the number of rows deleted.
    async fn delete_by_source(&self, prefix: &str) -> Result<u64, MeshError>;

    /// Deletes rows with `expires_at <= now` and `essential = 0`. Returns
    /// the number of rows deleted.
    async fn expire_sweep(&self) -> Result<u64, MeshError>;

    /// Effective rows (enabled, not expired) matching `entry_type`, or every
    /// effective row when `entry_type` is `None`.
    async fn effective_entries(
        &self,
        entry_type: Option<EntryType>,
    ) -> Result<Vec<FirewallEntry>, MeshError>;

    /// Membership test against the Block Cache. Triggers a refresh from the
    /// store when the cache has exceeded its TTL; a double-checked lock
    /// guards against a thundering herd of concurrent refreshes.
    async fn is_blocked(&self, ip: IpAddr) -> Result<bool, MeshError>;
}

use chrono::{DateTime, Utc};
use meshsentry_domain::MeshError;
use std::net::IpAddr;
use std::path::Path;

/// Size/mtime introspection used by the admin surface to report database
/// freshness without exposing the lookup internals.
#[derive(Debug, Clone, Copy)]
pub struct GeoIpFileInfo {
    pub size_bytes: u64,
    pub modified: DateTime<Utc>,
}

/// Application-layer port for MaxMind/IP2Location-format GeoIP lookups.
///
/// A parallel facility to the zone cache; it shares the scheduler for
/// refresh but answers a different question (which country does this IP
/// belong to, rather than which CIDRs belong to a country).
pub trait GeoIpLookupPort: Send + Sync {
    fn lookup(&self, ip: IpAddr) -> Option<String>;

    fn file_info(&self) -> Option<GeoIpFileInfo>;

    /// Opens the database at `new_db_path`, atomically swaps it in, and
    /// drops the old handle. Stale variant files left behind by the
    /// download step are the caller's responsibility to clean up.
    fn reload(&self, new_db_path: &Path) -> Result<(), MeshError>;
}

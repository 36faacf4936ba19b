use arc_swap::ArcSwap;
use meshsentry_application::ports::{GeoIpFileInfo, GeoIpLookupPort};
use meshsentry_domain::MeshError;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

struct Loaded {
    reader: maxminddb::Reader<Vec<u8>>,
    path: PathBuf,
}

/// MaxMind-format GeoIP lookup, hot-reloadable without downtime: a new
/// database is opened off to the side, then swapped in atomically via
/// `ArcSwap`; the old reader is simply dropped once no reader holds it.
pub struct MaxMindGeoIpLookup {
    current: ArcSwap<Loaded>,
}

impl MaxMindGeoIpLookup {
    pub fn open(path: &Path) -> Result<Self, MeshError> {
        let reader = maxminddb::Reader::open_readfile(path)
            .map_err(|e| MeshError::ConfigDrift(format!("failed to open GeoIP db {path:?}: {e}")))?;
        Ok(Self {
            current: ArcSwap::from_pointee(Loaded {
                reader,
                path: path.to_path_buf(),
            }),
        })
    }

    /// Removes MaxMind `.mmdb` siblings of the active database other than
    /// the active file itself — variant downloads left behind by the
    /// scheduler's update step.
    pub fn cleanup_stale_variants(&self) -> std::io::Result<()> {
        let active = self.current.load();
        let dir = match active.path.parent() {
            Some(d) => d,
            None => return Ok(()),
        };
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path == active.path {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) == Some("mmdb") {
                if let Err(e) = std::fs::remove_file(&path) {
                    warn!(path = ?path, error = %e, "failed to remove stale GeoIP variant");
                } else {
                    info!(path = ?path, "removed stale GeoIP variant");
                }
            }
        }
        Ok(())
    }
}

impl GeoIpLookupPort for MaxMindGeoIpLookup {
    fn lookup(&self, ip: IpAddr) -> Option<String> {
        let loaded = self.current.load();
        let country: maxminddb::geoip2::Country = loaded.reader.lookup(ip).ok()?;
        country
            .country
            .and_then(|c| c.iso_code)
            .map(|s| s.to_string())
    }

    fn file_info(&self) -> Option<GeoIpFileInfo> {
        let loaded = self.current.load();
        let meta = std::fs::metadata(&loaded.path).ok()?;
        let modified = meta.modified().ok()?;
        Some(GeoIpFileInfo {
            size_bytes: meta.len(),
            modified: chrono::DateTime::from(modified),
        })
    }

    fn reload(&self, new_db_path: &Path) -> Result<(), MeshError> {
        let reader = maxminddb::Reader::open_readfile(new_db_path).map_err(|e| {
            MeshError::ConfigDrift(format!("failed to open GeoIP db {new_db_path:?}: {e}"))
        })?;
        self.current.store(Arc::new(Loaded {
            reader,
            path: new_db_path.to_path_buf(),
        }));
        info!(path = ?new_db_path, "GeoIP database reloaded");
        Ok(())
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ipnetwork::IpNetwork;
use meshsentry_domain::MeshError;

/// Narrow interface consumed by the country [`Table`](crate::ports::Table):
/// "give me current CIDRs for a country". Breaks the nft↔geo call cycle
/// described in the design notes — the country table depends only on this,
/// never on the full `GeoProviderPort`.
#[async_trait]
pub trait ZoneSource: Send + Sync {
    async fn get_country_cidrs(&self, code: &str) -> Result<Vec<IpNetwork>, MeshError>;
}

/// Narrow interface consumed by the Geo Provider after a zone refresh: "ask
/// for an apply", without depending on the full reconciler port.
pub trait ApplyRequester: Send + Sync {
    fn request_apply(&self);
}

/// Application-layer port for the geo-blocking provider.
#[async_trait]
pub trait GeoProviderPort: ZoneSource {
    /// HTTPS GET to the per-country URL with a 30s timeout; body is
    /// line-filtered (blanks and `#` comments stripped), newline-joined,
    /// cached. Returns the raw joined string.
    async fn fetch_country_zones(&self, code: &str) -> Result<String, MeshError>;

    /// Cache-first wrapper over `fetch_country_zones`; returns the range
    /// count for the cached zone.
    async fn fetch_and_cache(&self, code: &str) -> Result<usize, MeshError>;

    /// Sequentially fetches every country currently referenced by an
    /// effective `country` firewall entry. Returns `(updated, errors)`.
    async fn refresh_all_zones(&self) -> (usize, usize);

    /// True iff any cached zone for a referenced country is older than the
    /// configured staleness threshold.
    async fn needs_update(&self) -> bool;

    async fn last_updated(&self) -> Option<DateTime<Utc>>;
}

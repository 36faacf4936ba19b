use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Cached, newline-joined CIDR list for one ISO country code.
#[derive(Debug, Clone)]
pub struct CountryZoneCache {
    pub country_code: Arc<str>,
    pub cidr_list: Arc<str>,
    pub updated_at: DateTime<Utc>,
}

impl CountryZoneCache {
    /// Seven-day staleness policy from the spec.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.updated_at) > chrono::Duration::days(7)
    }

    /// Parsed CIDR strings, comments and blanks already stripped at cache time.
    pub fn cidrs(&self) -> impl Iterator<Item = &str> {
        self.cidr_list.lines().filter(|l| !l.is_empty())
    }
}

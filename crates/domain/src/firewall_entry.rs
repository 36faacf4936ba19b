use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Kind of value a `FirewallEntry` matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Ip,
    Range,
    Country,
    Port,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Ip => "ip",
            EntryType::Range => "range",
            EntryType::Country => "country",
            EntryType::Port => "port",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ip" => Some(EntryType::Ip),
            "range" => Some(EntryType::Range),
            "country" => Some(EntryType::Country),
            "port" => Some(EntryType::Port),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
    Both,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
            Protocol::Both => "both",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "tcp" => Some(Protocol::Tcp),
            "udp" => Some(Protocol::Udp),
            "both" => Some(Protocol::Both),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Block,
    Allow,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Block => "block",
            Action::Allow => "allow",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "block" => Some(Action::Block),
            "allow" => Some(Action::Allow),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
    Both,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
            Direction::Both => "both",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "inbound" => Some(Direction::Inbound),
            "outbound" => Some(Direction::Outbound),
            "both" => Some(Direction::Both),
            _ => None,
        }
    }
}

/// A row in the unified policy store, uniquely keyed by
/// `(entry_type, value, protocol)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirewallEntry {
    pub id: Option<i64>,
    pub entry_type: EntryType,
    pub value: Arc<str>,
    pub protocol: Protocol,
    pub action: Action,
    pub direction: Direction,
    pub source: Arc<str>,
    pub reason: Option<Arc<str>>,
    pub name: Option<Arc<str>>,
    pub essential: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub enabled: bool,
    pub hit_count: i64,
    pub created_at: Option<DateTime<Utc>>,
}

impl FirewallEntry {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        entry_type: EntryType,
        value: String,
        protocol: Protocol,
        action: Action,
        direction: Direction,
        source: String,
        reason: Option<String>,
        name: Option<String>,
        essential: bool,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: None,
            entry_type,
            value: Arc::from(value.as_str()),
            protocol,
            action,
            direction,
            source: Arc::from(source.as_str()),
            reason: reason.map(|s| Arc::from(s.as_str())),
            name: name.map(|s| Arc::from(s.as_str())),
            essential,
            expires_at,
            enabled: true,
            hit_count: 0,
            created_at: None,
        }
    }

    /// An entry is effective iff it is enabled and either has no expiry or
    /// the expiry is still in the future.
    pub fn is_effective(&self, now: DateTime<Utc>) -> bool {
        self.enabled && self.expires_at.map(|exp| exp > now).unwrap_or(true)
    }
}

/// Well-known provenance tags. Jail-sourced entries use `jail:<name>`.
pub mod source {
    pub const MANUAL: &str = "manual";
    pub const SYSTEM: &str = "system";
    pub const ESCALATED: &str = "escalated";

    pub fn jail(name: &str) -> String {
        format!("jail:{name}")
    }

    pub fn blocklist(id: &str) -> String {
        format!("blocklist:{id}")
    }
}

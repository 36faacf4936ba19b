//! Core domain types for MeshSentry: the firewall policy model, jail
//! (rate-detection) model, geo zone cache, sync status, validators and
//! configuration. No I/O lives here; everything in this crate is plain
//! data and pure functions.
pub mod config;
pub mod errors;
pub mod firewall_entry;
pub mod jail;
pub mod sync_status;
pub mod validators;
pub mod zone_cache;

pub use config::{CliOverrides, Config};
pub use errors::MeshError;
pub use firewall_entry::{Action, Direction, EntryType, FirewallEntry, Protocol};
pub use jail::{EscalationConfig, Jail};
pub use sync_status::SyncStatus;
pub use zone_cache::CountryZoneCache;

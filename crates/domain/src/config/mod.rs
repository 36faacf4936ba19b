//! Configuration module for MeshSentry.
//!
//! Structures organized by domain, mirroring the shape of the persisted
//! schema and the runtime subsystems that consume each section.
pub mod database;
pub mod errors;
pub mod firewall;
pub mod geo;
pub mod jail;
pub mod logging;
pub mod root;
pub mod scheduler;
pub mod server;

pub use database::DatabaseConfig;
pub use errors::ConfigError;
pub use firewall::FirewallConfig;
pub use geo::GeoConfig;
pub use jail::JailDefaultsConfig;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use scheduler::SchedulerConfig;
pub use server::ServerConfig;

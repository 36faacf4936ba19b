//! Concrete adapters for the ports declared in `meshsentry_application`:
//! SQLite-backed repositories, the kernel packet-filter CLI driver, the geo
//! zone HTTP client, the jail tailer supervisor and the reconciler engine.
pub mod database;
pub mod geo;
pub mod jails;
pub mod packet_filter;
pub mod policy;
pub mod reconciler;
pub mod scheduler;
pub mod settings;

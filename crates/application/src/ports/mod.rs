pub mod broadcast_hook;
pub mod geo_provider;
pub mod geoip_lookup;
pub mod jail_lifecycle;
pub mod jail_repository;
pub mod packet_filter_backend;
pub mod policy_store;
pub mod reconciler;
pub mod scheduler;
pub mod settings;

pub use broadcast_hook::{BroadcastHookPort, Event, NoopBroadcastHook};
pub use geo_provider::{ApplyRequester, GeoProviderPort, ZoneSource};
pub use geoip_lookup::{GeoIpFileInfo, GeoIpLookupPort};
pub use jail_lifecycle::JailLifecyclePort;
pub use jail_repository::JailRepositoryPort;
pub use packet_filter_backend::PacketFilterBackendPort;
pub use policy_store::PolicyStorePort;
pub use reconciler::{DesiredSet, DesiredState, ReconcilerPort, Table};
pub use scheduler::{SchedulerPort, UpdateSelector};
pub use settings::SettingsPort;

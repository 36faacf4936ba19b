mod geo_scheduler;

pub use geo_scheduler::GeoScheduler;

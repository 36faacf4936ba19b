mod geoip;
mod http_provider;

pub use geoip::MaxMindGeoIpLookup;
pub use http_provider::HttpGeoProvider;

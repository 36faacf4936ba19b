mod engine;
mod tables;

pub use engine::NftReconciler;
pub use tables::{CountryTable, FirewallTable, VpnAclTable};

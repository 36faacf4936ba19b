mod country_table;
mod firewall_table;
mod vpn_acl_table;

pub use country_table::CountryTable;
pub use firewall_table::FirewallTable;
pub use vpn_acl_table::VpnAclTable;

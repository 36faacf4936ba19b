use async_trait::async_trait;
use meshsentry_application::ports::{DesiredSet, DesiredState, PolicyStorePort, Table};
use meshsentry_domain::{Action, EntryType, MeshError};
use std::sync::Arc;

/// Renders the direct-value sets: individual IPs and CIDR ranges, split by
/// action so `block_ip`/`allow_ip` (and their range counterparts) are
/// distinct nft sets. Country and port-grouped entries are handled by
/// [`super::country_table::CountryTable`] and
/// [`super::vpn_acl_table::VpnAclTable`] respectively.
pub struct FirewallTable {
    store: Arc<dyn PolicyStorePort>,
    family: String,
    table_name: String,
}

impl FirewallTable {
    pub fn new(store: Arc<dyn PolicyStorePort>, family: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            store,
            family: family.into(),
            table_name: table_name.into(),
        }
    }

    fn set_name(entry_type: EntryType, action: Action) -> String {
        let kind = match entry_type {
            EntryType::Ip => "ip",
            EntryType::Range => "range",
            _ => unreachable!("firewall table only renders ip/range entries"),
        };
        match action {
            Action::Block => format!("block_{kind}"),
            Action::Allow => format!("allow_{kind}"),
        }
    }
}

#[async_trait]
impl Table for FirewallTable {
    fn family(&self) -> &str {
        &self.family
    }

    fn name(&self) -> &str {
        &self.table_name
    }

    async fn render(&self) -> Result<DesiredState, MeshError> {
        let mut block_ip = Vec::new();
        let mut allow_ip = Vec::new();
        let mut block_range = Vec::new();
        let mut allow_range = Vec::new();

        for entry in self.store.effective_entries(Some(EntryType::Ip)).await? {
            match entry.action {
                Action::Block => block_ip.push(entry.value.to_string()),
                Action::Allow => allow_ip.push(entry.value.to_string()),
            }
        }
        for entry in self.store.effective_entries(Some(EntryType::Range)).await? {
            match entry.action {
                Action::Block => block_range.push(entry.value.to_string()),
                Action::Allow => allow_range.push(entry.value.to_string()),
            }
        }

        Ok(DesiredState {
            family: self.family.clone(),
            table_name: self.table_name.clone(),
            sets: vec![
                DesiredSet {
                    name: Self::set_name(EntryType::Ip, Action::Block),
                    elements: block_ip,
                },
                DesiredSet {
                    name: Self::set_name(EntryType::Ip, Action::Allow),
                    elements: allow_ip,
                },
                DesiredSet {
                    name: Self::set_name(EntryType::Range, Action::Block),
                    elements: block_range,
                },
                DesiredSet {
                    name: Self::set_name(EntryType::Range, Action::Allow),
                    elements: allow_range,
                },
            ],
        })
    }
}

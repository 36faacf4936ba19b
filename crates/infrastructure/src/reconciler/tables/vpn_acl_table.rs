use async_trait::async_trait;
use meshsentry_application::ports::{DesiredSet, DesiredState, PolicyStorePort, Table};
use meshsentry_domain::{EntryType, MeshError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Renders per-peer allow sets from `port`-typed entries, grouped by the
/// entry's `name` (the peer identity). An entry with no `name` falls back to
/// a shared `unassigned` set rather than being dropped.
pub struct VpnAclTable {
    store: Arc<dyn PolicyStorePort>,
    family: String,
    table_name: String,
}

impl VpnAclTable {
    pub fn new(store: Arc<dyn PolicyStorePort>, family: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            store,
            family: family.into(),
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl Table for VpnAclTable {
    fn family(&self) -> &str {
        &self.family
    }

    fn name(&self) -> &str {
        &self.table_name
    }

    async fn render(&self) -> Result<DesiredState, MeshError> {
        let mut by_peer: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for entry in self.store.effective_entries(Some(EntryType::Port)).await? {
            let peer = entry
                .name
                .as_deref()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unassigned".to_string());
            by_peer.entry(peer).or_default().push(entry.value.to_string());
        }

        let sets = by_peer
            .into_iter()
            .map(|(peer, elements)| DesiredSet {
                name: format!("vpn_acl_{peer}"),
                elements,
            })
            .collect();

        Ok(DesiredState {
            family: self.family.clone(),
            table_name: self.table_name.clone(),
            sets,
        })
    }
}

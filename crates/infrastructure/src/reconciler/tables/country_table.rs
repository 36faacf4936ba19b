use async_trait::async_trait;
use meshsentry_application::ports::{DesiredSet, DesiredState, PolicyStorePort, Table, ZoneSource};
use meshsentry_domain::{Action, EntryType, MeshError};
use std::sync::Arc;
use tracing::warn;

/// Renders `block_country`/`allow_country` sets by resolving each effective
/// `country` entry's ISO code to its cached CIDR list through [`ZoneSource`],
/// the narrow interface that breaks the nft<->geo provider call cycle.
pub struct CountryTable {
    store: Arc<dyn PolicyStorePort>,
    zones: Arc<dyn ZoneSource>,
    family: String,
    table_name: String,
}

impl CountryTable {
    pub fn new(
        store: Arc<dyn PolicyStorePort>,
        zones: Arc<dyn ZoneSource>,
        family: impl Into<String>,
        table_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            zones,
            family: family.into(),
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl Table for CountryTable {
    fn family(&self) -> &str {
        &self.family
    }

    fn name(&self) -> &str {
        &self.table_name
    }

    async fn render(&self) -> Result<DesiredState, MeshError> {
        let mut block_country = Vec::new();
        let mut allow_country = Vec::new();

        for entry in self.store.effective_entries(Some(EntryType::Country)).await? {
            let code = entry.value.to_string();
            let cidrs = match self.zones.get_country_cidrs(&code).await {
                Ok(cidrs) => cidrs,
                Err(e) => {
                    warn!(country = %code, error = %e, "no cached zone for country entry, skipping");
                    continue;
                }
            };
            let target = match entry.action {
                Action::Block => &mut block_country,
                Action::Allow => &mut allow_country,
            };
            target.extend(cidrs.into_iter().map(|c| c.to_string()));
        }

        Ok(DesiredState {
            family: self.family.clone(),
            table_name: self.table_name.clone(),
            sets: vec![
                DesiredSet {
                    name: "block_country".to_string(),
                    elements: block_country,
                },
                DesiredSet {
                    name: "allow_country".to_string(),
                    elements: allow_country,
                },
            ],
        })
    }
}

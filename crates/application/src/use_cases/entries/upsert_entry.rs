use meshsentry_domain::{validators, EntryType, FirewallEntry, MeshError};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::ports::{BroadcastHookPort, Event, PolicyStorePort, ReconcilerPort};

/// Validates and upserts a firewall entry, then requests an apply cycle.
///
/// A failed upsert must not trigger a reconciler request; `request_apply`
/// only runs after `store.upsert_entry` returns `Ok`.
pub struct UpsertEntryUseCase {
    store: Arc<dyn PolicyStorePort>,
    reconciler: Arc<dyn ReconcilerPort>,
    broadcast: Arc<dyn BroadcastHookPort>,
}

impl UpsertEntryUseCase {
    pub fn new(
        store: Arc<dyn PolicyStorePort>,
        reconciler: Arc<dyn ReconcilerPort>,
        broadcast: Arc<dyn BroadcastHookPort>,
    ) -> Self {
        Self {
            store,
            reconciler,
            broadcast,
        }
    }

    #[instrument(skip(self, entry))]
    pub async fn execute(&self, entry: FirewallEntry) -> Result<bool, MeshError> {
        validate_value(entry.entry_type, &entry.value)?;

        let id_hint = entry.id.unwrap_or_default();
        let is_new = self.store.upsert_entry(entry.clone()).await?;

        self.broadcast.on_event(Event::EntryUpserted {
            id: id_hint,
            is_new,
        });
        self.reconciler.request_apply();

        info!(
            entry_type = entry.entry_type.as_str(),
            value = %entry.value,
            is_new,
            "firewall entry upserted"
        );
        Ok(is_new)
    }
}

fn validate_value(entry_type: EntryType, value: &str) -> Result<(), MeshError> {
    match entry_type {
        EntryType::Ip => validators::validate_ip(value).map_err(MeshError::Validation),
        EntryType::Range => validators::validate_cidr(value).map_err(MeshError::Validation),
        EntryType::Port => validators::validate_port(value)
            .map(|_| ())
            .map_err(MeshError::Validation),
        EntryType::Country => {
            validators::validate_country_code(value).map_err(MeshError::Validation)
        }
    }
}

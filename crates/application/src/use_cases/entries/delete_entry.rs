use meshsentry_domain::MeshError;
use std::sync::Arc;
use tracing::instrument;

use crate::ports::{BroadcastHookPort, Event, PolicyStorePort, ReconcilerPort};

pub struct DeleteEntryUseCase {
    store: Arc<dyn PolicyStorePort>,
    reconciler: Arc<dyn ReconcilerPort>,
    broadcast: Arc<dyn BroadcastHookPort>,
}

impl DeleteEntryUseCase {
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

    #[instrument(skip(self))]
    pub async fn execute(&self, id: i64, essential_override: bool) -> Result<(), MeshError> {
        self.store.delete_entry(id, essential_override).await?;
        self.broadcast.on_event(Event::EntryDeleted { id });
        self.reconciler.request_apply();
        Ok(())
    }
}

pub mod mocks;

use meshsentry_api::AppState;
use meshsentry_application::ports::NoopBroadcastHook;
use meshsentry_application::use_cases::{
    ApplyNowUseCase, BlockCountryUseCase, BulkImportEntriesUseCase, CreateJailUseCase,
    DeleteBySourceUseCase, DeleteEntryUseCase, DeleteJailUseCase, GetSyncStatusUseCase,
    ListEffectiveEntriesUseCase, ListJailsUseCase, RefreshZonesUseCase, TriggerUpdateUseCase,
    UnblockCountryUseCase, UpdateJailUseCase, UpsertEntryUseCase,
};
use meshsentry_domain::FirewallEntry;
use std::sync::Arc;

use mocks::{
    MockGeoProvider, MockJailLifecycle, MockJailRepository, MockPolicyStore, MockReconciler,
    MockScheduler,
};

/// Everything a handler test needs: the wired `AppState` plus direct handles
/// to the backing mocks so assertions can inspect state the HTTP response
/// doesn't expose.
pub struct Harness {
    pub state: AppState,
    pub store: Arc<MockPolicyStore>,
    pub reconciler: Arc<MockReconciler>,
    pub geo: Arc<MockGeoProvider>,
    pub jail_repo: Arc<MockJailRepository>,
    pub jail_lifecycle: Arc<MockJailLifecycle>,
    pub scheduler: Arc<MockScheduler>,
}

pub fn harness() -> Harness {
    harness_with_entries(Vec::new())
}

pub fn harness_with_entries(entries: Vec<FirewallEntry>) -> Harness {
    let store: Arc<MockPolicyStore> = Arc::new(MockPolicyStore::with_entries(entries));
    let reconciler: Arc<MockReconciler> = Arc::new(MockReconciler::new());
    let geo: Arc<MockGeoProvider> = Arc::new(MockGeoProvider::new());
    let jail_repo: Arc<MockJailRepository> = Arc::new(MockJailRepository::default());
    let jail_lifecycle: Arc<MockJailLifecycle> = Arc::new(MockJailLifecycle::new());
    let scheduler: Arc<MockScheduler> = Arc::new(MockScheduler::new());
    let broadcast: Arc<NoopBroadcastHook> = Arc::new(NoopBroadcastHook);

    let state = AppState {
        upsert_entry: Arc::new(UpsertEntryUseCase::new(
            store.clone(),
            reconciler.clone(),
            broadcast.clone(),
        )),
        delete_entry: Arc::new(DeleteEntryUseCase::new(
            store.clone(),
            reconciler.clone(),
            broadcast.clone(),
        )),
        delete_by_source: Arc::new(DeleteBySourceUseCase::new(store.clone(), reconciler.clone())),
        list_entries: Arc::new(ListEffectiveEntriesUseCase::new(store.clone())),
        bulk_import: Arc::new(BulkImportEntriesUseCase::new(Arc::new(
            UpsertEntryUseCase::new(store.clone(), reconciler.clone(), broadcast.clone()),
        ))),
        block_country: Arc::new(BlockCountryUseCase::new(
            store.clone(),
            geo.clone(),
            reconciler.clone(),
        )),
        unblock_country: Arc::new(UnblockCountryUseCase::new(store.clone(), reconciler.clone())),
        refresh_zones: Arc::new(RefreshZonesUseCase::new(geo.clone(), reconciler.clone())),
        trigger_update: Arc::new(TriggerUpdateUseCase::new(scheduler.clone())),
        create_jail: Arc::new(CreateJailUseCase::new(
            jail_repo.clone(),
            jail_lifecycle.clone(),
            vec!["/var/log".to_string()],
        )),
        update_jail: Arc::new(UpdateJailUseCase::new(
            jail_repo.clone(),
            jail_lifecycle.clone(),
            vec!["/var/log".to_string()],
        )),
        delete_jail: Arc::new(DeleteJailUseCase::new(
            jail_repo.clone(),
            jail_lifecycle.clone(),
            store.clone(),
            reconciler.clone(),
        )),
        list_jails: Arc::new(ListJailsUseCase::new(jail_repo.clone())),
        apply_now: Arc::new(ApplyNowUseCase::new(reconciler.clone())),
        get_sync_status: Arc::new(GetSyncStatusUseCase::new(reconciler.clone())),
    };

    Harness {
        state,
        store,
        reconciler,
        geo,
        jail_repo,
        jail_lifecycle,
        scheduler,
    }
}

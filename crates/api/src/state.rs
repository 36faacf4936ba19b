use meshsentry_application::use_cases::{
    ApplyNowUseCase, BlockCountryUseCase, BulkImportEntriesUseCase, CreateJailUseCase,
    DeleteBySourceUseCase, DeleteEntryUseCase, DeleteJailUseCase, GetSyncStatusUseCase,
    ListEffectiveEntriesUseCase, ListJailsUseCase, RefreshZonesUseCase, TriggerUpdateUseCase,
    UnblockCountryUseCase, UpdateJailUseCase, UpsertEntryUseCase,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub upsert_entry: Arc<UpsertEntryUseCase>,
    pub delete_entry: Arc<DeleteEntryUseCase>,
    pub delete_by_source: Arc<DeleteBySourceUseCase>,
    pub list_entries: Arc<ListEffectiveEntriesUseCase>,
    pub bulk_import: Arc<BulkImportEntriesUseCase>,
    pub block_country: Arc<BlockCountryUseCase>,
    pub unblock_country: Arc<UnblockCountryUseCase>,
    pub refresh_zones: Arc<RefreshZonesUseCase>,
    pub trigger_update: Arc<TriggerUpdateUseCase>,
    pub create_jail: Arc<CreateJailUseCase>,
    pub update_jail: Arc<UpdateJailUseCase>,
    pub delete_jail: Arc<DeleteJailUseCase>,
    pub list_jails: Arc<ListJailsUseCase>,
    pub apply_now: Arc<ApplyNowUseCase>,
    pub get_sync_status: Arc<GetSyncStatusUseCase>,
}

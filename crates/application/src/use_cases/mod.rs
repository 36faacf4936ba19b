pub mod entries;
pub mod geo;
pub mod jails;
pub mod reconciler;

pub use entries::{
    BulkImportEntriesUseCase, BulkImportResult, DeleteBySourceUseCase, DeleteEntryUseCase,
    ExpireSweepUseCase, ImportOutcome, ListEffectiveEntriesUseCase, UpsertEntryUseCase,
};
pub use geo::{BlockCountryUseCase, RefreshZonesUseCase, TriggerUpdateUseCase, UnblockCountryUseCase};
pub use jails::{CreateJailUseCase, DeleteJailUseCase, ListJailsUseCase, UpdateJailUseCase};
pub use reconciler::{ApplyNowUseCase, GetSyncStatusUseCase};

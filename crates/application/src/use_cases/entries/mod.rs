mod bulk_import;
mod delete_by_source;
mod delete_entry;
mod expire_sweep;
mod list_effective_entries;
mod upsert_entry;

pub use bulk_import::{BulkImportEntriesUseCase, BulkImportResult, ImportOutcome};
pub use delete_by_source::DeleteBySourceUseCase;
pub use delete_entry::DeleteEntryUseCase;
pub use expire_sweep::ExpireSweepUseCase;
pub use list_effective_entries::ListEffectiveEntriesUseCase;
pub use upsert_entry::UpsertEntryUseCase;

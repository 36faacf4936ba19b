pub mod entry;
pub mod geo;
pub mod jail;

pub use entry::{
    BulkImportResultResponse, DeleteEntryQuery, EntryResponse, ListEntriesQuery,
    UpsertEntryRequest,
};
pub use geo::{CountryRequest, RefreshZonesResponse, SyncStatusResponse, UpdateSelectorQuery};
pub use jail::{JailRequest, JailResponse};

use meshsentry_domain::FirewallEntry;
use std::sync::Arc;
use tracing::instrument;

use super::upsert_entry::UpsertEntryUseCase;

#[derive(Debug, Clone)]
pub enum ImportOutcome {
    Inserted,
    Updated,
    Error(String),
}

#[derive(Debug, Clone)]
pub struct BulkImportResult {
    pub value: String,
    pub outcome: ImportOutcome,
}

/// Per-row import over [`UpsertEntryUseCase`]. A row failure never aborts
/// the batch; every row gets a success/warning/error record, per the admin
/// surface's bulk-operation contract.
pub struct BulkImportEntriesUseCase {
    upsert: Arc<UpsertEntryUseCase>,
}

impl BulkImportEntriesUseCase {
    pub fn new(upsert: Arc<UpsertEntryUseCase>) -> Self {
        Self { upsert }
    }

    #[instrument(skip(self, entries))]
    pub async fn execute(&self, entries: Vec<FirewallEntry>) -> Vec<BulkImportResult> {
        let mut results = Vec::with_capacity(entries.len());
        for entry in entries {
            let value = entry.value.to_string();
            let outcome = match self.upsert.execute(entry).await {
                Ok(true) => ImportOutcome::Inserted,
                Ok(false) => ImportOutcome::Updated,
                Err(e) => ImportOutcome::Error(e.to_string()),
            };
            results.push(BulkImportResult { value, outcome });
        }
        results
    }
}

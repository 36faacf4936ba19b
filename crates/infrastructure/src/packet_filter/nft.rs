use async_trait::async_trait;
use meshsentry_application::ports::PacketFilterBackendPort;
use meshsentry_domain::MeshError;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Thin driver over the `nft` (or configured) CLI. Batches element
/// add/delete invocations to stay under command-line length limits and
/// swallows the backend's idempotent error surfaces ("exists" on add,
/// "no such" on delete) rather than treating them as failures.
pub struct NftBackend {
    binary: String,
    batch_size: usize,
}

impl NftBackend {
    pub fn new(binary: String, batch_size: usize) -> Self {
        Self { binary, batch_size }
    }

    async fn run(&self, args: &[String]) -> Result<(), MeshError> {
        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .await
            .map_err(|e| MeshError::BackendTransient(format!("failed to spawn {}: {e}", self.binary)))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("exists") || stderr.contains("No such") || stderr.contains("no such") {
            debug!(stderr = %stderr, "swallowed idempotent nft error");
            return Ok(());
        }

        Err(MeshError::BackendTransient(format!(
            "{} {:?} failed: {}",
            self.binary, args, stderr
        )))
    }

    fn batches<'a>(&self, elements: &'a [String]) -> impl Iterator<Item = &'a [String]> {
        elements.chunks(self.batch_size.max(1))
    }
}

#[async_trait]
impl PacketFilterBackendPort for NftBackend {
    #[instrument(skip(self, elements))]
    async fn add_elements(
        &self,
        family: &str,
        table: &str,
        set: &str,
        elements: &[String],
    ) -> Result<(), MeshError> {
        for batch in self.batches(elements) {
            if batch.is_empty() {
                continue;
            }
            let joined = batch.join(", ");
            let args = vec![
                "add".to_string(),
                "element".to_string(),
                family.to_string(),
                table.to_string(),
                set.to_string(),
                format!("{{ {joined} }}"),
            ];
            self.run(&args).await?;
        }
        Ok(())
    }

    #[instrument(skip(self, elements))]
    async fn delete_elements(
        &self,
        family: &str,
        table: &str,
        set: &str,
        elements: &[String],
    ) -> Result<(), MeshError> {
        for batch in self.batches(elements) {
            if batch.is_empty() {
                continue;
            }
            let joined = batch.join(", ");
            let args = vec![
                "delete".to_string(),
                "element".to_string(),
                family.to_string(),
                table.to_string(),
                set.to_string(),
                format!("{{ {joined} }}"),
            ];
            self.run(&args).await?;
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn flush_set(&self, family: &str, table: &str, set: &str) -> Result<(), MeshError> {
        let args = vec![
            "flush".to_string(),
            "set".to_string(),
            family.to_string(),
            table.to_string(),
            set.to_string(),
        ];
        self.run(&args).await
    }
}

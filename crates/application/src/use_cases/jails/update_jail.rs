use meshsentry_domain::{validators, Jail, MeshError};
use std::sync::Arc;
use tracing::instrument;

use crate::ports::{JailLifecyclePort, JailRepositoryPort};

/// `update → stop+start`: a changed `log_file`/`filter_regex` must take
/// effect immediately, so the supervisor is fully restarted rather than
/// patched in place.
pub struct UpdateJailUseCase {
    jail_repo: Arc<dyn JailRepositoryPort>,
    lifecycle: Arc<dyn JailLifecyclePort>,
    allowed_log_roots: Vec<String>,
}

impl UpdateJailUseCase {
    pub fn new(
        jail_repo: Arc<dyn JailRepositoryPort>,
        lifecycle: Arc<dyn JailLifecyclePort>,
        allowed_log_roots: Vec<String>,
    ) -> Self {
        Self {
            jail_repo,
            lifecycle,
            allowed_log_roots,
        }
    }

    #[instrument(skip(self, jail))]
    pub async fn execute(&self, jail: Jail) -> Result<Jail, MeshError> {
        validators::validate_log_path(&jail.log_file, &self.allowed_log_roots)
            .map_err(MeshError::Validation)?;
        validators::validate_filter_regex(&jail.filter_regex).map_err(MeshError::Validation)?;

        let updated = self.jail_repo.update(jail).await?;

        if updated.enabled {
            self.lifecycle.restart(updated.clone()).await?;
        } else {
            self.lifecycle.stop(&updated.name).await?;
        }

        Ok(updated)
    }
}

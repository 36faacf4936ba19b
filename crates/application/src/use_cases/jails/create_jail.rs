use meshsentry_domain::{validators, Jail, MeshError};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::ports::{JailLifecyclePort, JailRepositoryPort};

/// Validates and persists a new jail, then starts its supervisor if enabled.
pub struct CreateJailUseCase {
    jail_repo: Arc<dyn JailRepositoryPort>,
    lifecycle: Arc<dyn JailLifecyclePort>,
    allowed_log_roots: Vec<String>,
}

impl CreateJailUseCase {
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

        let created = self.jail_repo.create(jail).await?;

        if created.enabled {
            self.lifecycle.start(created.clone()).await?;
        }

        info!(name = %created.name, "jail created");
        Ok(created)
    }
}

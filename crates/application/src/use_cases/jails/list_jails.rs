use meshsentry_domain::{Jail, MeshError};
use std::sync::Arc;
use tracing::instrument;

use crate::ports::JailRepositoryPort;

pub struct ListJailsUseCase {
    jail_repo: Arc<dyn JailRepositoryPort>,
}

impl ListJailsUseCase {
    pub fn new(jail_repo: Arc<dyn JailRepositoryPort>) -> Self {
        Self { jail_repo }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self) -> Result<Vec<Jail>, MeshError> {
        self.jail_repo.get_all().await
    }
}

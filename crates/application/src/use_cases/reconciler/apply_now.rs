use meshsentry_domain::MeshError;
use std::sync::Arc;
use tracing::instrument;

use crate::ports::ReconcilerPort;

pub struct ApplyNowUseCase {
    reconciler: Arc<dyn ReconcilerPort>,
}

impl ApplyNowUseCase {
    pub fn new(reconciler: Arc<dyn ReconcilerPort>) -> Self {
        Self { reconciler }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self) -> Result<(), MeshError> {
        self.reconciler.apply_all().await
    }
}

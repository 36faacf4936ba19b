use meshsentry_application::ports::{JailLifecyclePort, JailRepositoryPort};
use std::sync::Arc;
use tracing::{error, info, warn};

/// One-shot startup job: loads every persisted jail and starts the tailer
/// for each one that is enabled. Unlike the other jobs this does not
/// recur — jails are (re)started individually by the jail CRUD use cases
/// as they're created, updated or deleted.
pub struct JailEngineJob {
    repository: Arc<dyn JailRepositoryPort>,
    lifecycle: Arc<dyn JailLifecyclePort>,
}

impl JailEngineJob {
    pub fn new(repository: Arc<dyn JailRepositoryPort>, lifecycle: Arc<dyn JailLifecyclePort>) -> Self {
        Self {
            repository,
            lifecycle,
        }
    }

    pub async fn run(&self) {
        info!("JailEngineJob: loading persisted jails");

        let jails = match self.repository.get_all().await {
            Ok(jails) => jails,
            Err(e) => {
                error!(error = %e, "JailEngineJob: failed to load jails");
                return;
            }
        };

        let mut started = 0;
        for jail in jails {
            if !jail.enabled {
                continue;
            }
            let name = jail.name.clone();
            match self.lifecycle.start(jail).await {
                Ok(()) => started += 1,
                Err(e) => warn!(jail = %name, error = %e, "JailEngineJob: failed to start jail"),
            }
        }

        info!(started, "JailEngineJob: startup complete");
    }
}

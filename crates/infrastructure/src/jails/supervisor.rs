use async_trait::async_trait;
use meshsentry_application::ports::{
    BroadcastHookPort, JailLifecyclePort, JailRepositoryPort, PolicyStorePort, ReconcilerPort,
};
use meshsentry_domain::{Jail, MeshError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::tailer::{Tailer, TailerConfig};

struct Running {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owns the map of running jail tailers. Each supervisor entry owns its
/// tailer state exclusively; the map itself is guarded by a single mutex,
/// per the concurrency model's jail supervisor map discipline.
pub struct JailSupervisor {
    running: Mutex<HashMap<String, Running>>,
    config: TailerConfig,
    policy_store: Arc<dyn PolicyStorePort>,
    jail_repo: Arc<dyn JailRepositoryPort>,
    reconciler: Arc<dyn ReconcilerPort>,
    broadcast: Arc<dyn BroadcastHookPort>,
    root: CancellationToken,
}

impl JailSupervisor {
    pub fn new(
        config: TailerConfig,
        policy_store: Arc<dyn PolicyStorePort>,
        jail_repo: Arc<dyn JailRepositoryPort>,
        reconciler: Arc<dyn ReconcilerPort>,
        broadcast: Arc<dyn BroadcastHookPort>,
        root: CancellationToken,
    ) -> Self {
        Self {
            running: Mutex::new(HashMap::new()),
            config,
            policy_store,
            jail_repo,
            reconciler,
            broadcast,
            root,
        }
    }

    /// Starts every enabled jail on process init; called once by the
    /// composition root after construction.
    pub async fn start_all(&self, jails: Vec<Jail>) {
        for jail in jails.into_iter().filter(|j| j.enabled) {
            let name = jail.name.to_string();
            if let Err(e) = self.start(jail).await {
                tracing::warn!(jail = %name, error = %e, "failed to start jail on init");
            }
        }
    }
}

#[async_trait]
impl JailLifecyclePort for JailSupervisor {
    async fn start(&self, jail: Jail) -> Result<(), MeshError> {
        let name = jail.name.to_string();
        let cancel = self.root.child_token();
        let tailer = Tailer::new(
            jail,
            self.config.clone(),
            self.policy_store.clone(),
            self.jail_repo.clone(),
            self.reconciler.clone(),
            self.broadcast.clone(),
        );

        let task_cancel = cancel.clone();
        let handle = tokio::spawn(async move { tailer.run(task_cancel).await });

        let mut running = self.running.lock().await;
        if let Some(old) = running.remove(&name) {
            old.cancel.cancel();
        }
        running.insert(name.clone(), Running { cancel, handle });
        info!(jail = %name, "jail supervisor started");
        Ok(())
    }

    async fn stop(&self, name: &str) -> Result<(), MeshError> {
        let mut running = self.running.lock().await;
        if let Some(entry) = running.remove(name) {
            entry.cancel.cancel();
            let _ = entry.handle.await;
            info!(jail = %name, "jail supervisor stopped");
        }
        Ok(())
    }

    async fn restart(&self, jail: Jail) -> Result<(), MeshError> {
        self.stop(&jail.name).await?;
        self.start(jail).await
    }
}

use async_trait::async_trait;
use meshsentry_application::ports::{
    ApplyRequester, DesiredState, PacketFilterBackendPort, ReconcilerPort, Table,
};
use meshsentry_domain::{MeshError, SyncStatus};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};
use tokio::sync::{watch, Mutex as TokioMutex, Notify};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

type SetKey = (String, String, String);

struct SharedState {
    pending: bool,
    first_pending_at: Option<Instant>,
    last_request_at: Instant,
    sync_status: SyncStatus,
}

/// Debounced, coalescing applier. A single mutex guards `pending`,
/// `last_applied`'s bookkeeping timestamps and the published sync status;
/// the apply body itself runs outside that mutex once `pending` has been
/// snapshotted, per the concurrency model.
pub struct NftReconciler {
    backend: Arc<dyn PacketFilterBackendPort>,
    tables: StdMutex<Vec<Arc<dyn Table>>>,
    state: StdMutex<SharedState>,
    notify: Notify,
    generation: watch::Sender<u64>,
    cancel: CancellationToken,
    debounce: Duration,
    hard_cap: Duration,
    loop_handle: TokioMutex<Option<JoinHandle<()>>>,
}

impl NftReconciler {
    pub fn spawn(
        backend: Arc<dyn PacketFilterBackendPort>,
        debounce: Duration,
        hard_cap: Duration,
    ) -> Arc<Self> {
        let (generation, _) = watch::channel(0u64);
        let this = Arc::new(Self {
            backend,
            tables: StdMutex::new(Vec::new()),
            state: StdMutex::new(SharedState {
                pending: false,
                first_pending_at: None,
                last_request_at: Instant::now(),
                sync_status: SyncStatus::default(),
            }),
            notify: Notify::new(),
            generation,
            cancel: CancellationToken::new(),
            debounce,
            hard_cap,
            loop_handle: TokioMutex::new(None),
        });

        let worker = this.clone();
        let handle = tokio::spawn(async move { worker.run_loop().await });
        // Best-effort: store the handle so `stop` can await it. If this
        // races with an immediate `stop()` call the loop simply exits on
        // its own cancellation check.
        if let Ok(mut guard) = this.loop_handle.try_lock() {
            *guard = Some(handle);
        }
        this
    }

    async fn run_loop(self: Arc<Self>) {
        let mut last_applied: HashMap<SetKey, HashSet<String>> = HashMap::new();
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("reconciler loop cancelled");
                    return;
                }
                _ = self.wait_for_pending() => {}
            }
            if self.cancel.is_cancelled() {
                return;
            }

            let should_apply = {
                let mut state = self.state.lock().unwrap();
                if !state.pending {
                    false
                } else {
                    state.pending = false;
                    state.first_pending_at = None;
                    true
                }
            };
            if !should_apply {
                continue;
            }

            let result = self.apply_once(&mut last_applied).await;

            {
                let mut state = self.state.lock().unwrap();
                match &result {
                    Ok(()) => {
                        state.sync_status.last_apply_at = Some(chrono::Utc::now());
                        state.sync_status.last_apply_error = None;
                        state.sync_status.in_sync = !state.pending;
                    }
                    Err(e) => {
                        error!(error = %e, "apply cycle failed");
                        state.sync_status.last_apply_error = Some(e.to_string());
                        state.sync_status.in_sync = false;
                    }
                }
                state.sync_status.pending = state.pending;
            }
            self.generation.send_modify(|g| *g = g.wrapping_add(1));
        }
    }

    /// Parks until a request is pending, then waits for the earlier of the
    /// debounce window after the last request or the hard cap since the
    /// first pending request in the current burst.
    async fn wait_for_pending(&self) {
        loop {
            let (pending, last_request_at, first_pending_at) = {
                let state = self.state.lock().unwrap();
                (state.pending, state.last_request_at, state.first_pending_at)
            };
            if !pending {
                self.notify.notified().await;
                continue;
            }

            let now = Instant::now();
            let debounce_deadline = last_request_at + self.debounce;
            let hard_cap_deadline = first_pending_at.unwrap_or(now) + self.hard_cap;
            let deadline = debounce_deadline.min(hard_cap_deadline);

            if now >= deadline {
                return;
            }

            tokio::select! {
                _ = tokio::time::sleep(deadline - now) => return,
                _ = self.notify.notified() => continue,
            }
        }
    }

    /// Renders every registered table, diffs against `last_applied`, and
    /// issues batched backend mutations. `last_applied` is only replaced by
    /// the new state on full success — on any error it is left untouched so
    /// the next apply naturally retries the entire desired state.
    async fn apply_once(
        &self,
        last_applied: &mut HashMap<SetKey, HashSet<String>>,
    ) -> Result<(), MeshError> {
        let tables: Vec<Arc<dyn Table>> = self.tables.lock().unwrap().clone();

        let mut desired_states = Vec::with_capacity(tables.len());
        for table in &tables {
            desired_states.push(table.render().await?);
        }
        desired_states.sort_by(|a, b| {
            (a.family.as_str(), a.table_name.as_str()).cmp(&(b.family.as_str(), b.table_name.as_str()))
        });

        let mut candidate = last_applied.clone();
        for ds in &desired_states {
            self.apply_table(ds, last_applied, &mut candidate).await?;
        }
        *last_applied = candidate;
        Ok(())
    }

    async fn apply_table(
        &self,
        ds: &DesiredState,
        previous: &HashMap<SetKey, HashSet<String>>,
        candidate: &mut HashMap<SetKey, HashSet<String>>,
    ) -> Result<(), MeshError> {
        for set in &ds.sets {
            let key = (ds.family.clone(), ds.table_name.clone(), set.name.clone());
            let desired: HashSet<String> = set.elements.iter().cloned().collect();
            let prior = previous.get(&key).cloned().unwrap_or_default();

            let to_delete: Vec<String> = prior.difference(&desired).cloned().collect();
            let to_add: Vec<String> = desired.difference(&prior).cloned().collect();

            // Deletes precede adds so an element moved between sets never
            // transiently matches both.
            if !to_delete.is_empty() {
                self.backend
                    .delete_elements(&ds.family, &ds.table_name, &set.name, &to_delete)
                    .await?;
            }
            if !to_add.is_empty() {
                self.backend
                    .add_elements(&ds.family, &ds.table_name, &set.name, &to_add)
                    .await?;
            }
            if to_delete.is_empty() && to_add.is_empty() {
                debug!(family = %ds.family, table = %ds.table_name, set = %set.name, "no change");
            }
            candidate.insert(key, desired);
        }
        Ok(())
    }
}

#[async_trait]
impl ReconcilerPort for NftReconciler {
    fn register_table(&self, table: Arc<dyn Table>) {
        self.tables.lock().unwrap().push(table);
    }

    fn request_apply(&self) {
        let mut state = self.state.lock().unwrap();
        let now = Instant::now();
        if !state.pending {
            state.first_pending_at = Some(now);
        }
        state.pending = true;
        state.last_request_at = now;
        state.sync_status.pending = true;
        drop(state);
        self.notify.notify_one();
    }

    async fn apply_all(&self) -> Result<(), MeshError> {
        let mut rx = self.generation.subscribe();
        let baseline = *rx.borrow();
        self.request_apply();

        loop {
            if rx.changed().await.is_err() {
                return Err(MeshError::BackendTransient(
                    "reconciler loop has stopped".to_string(),
                ));
            }
            if *rx.borrow() != baseline {
                break;
            }
        }

        let state = self.state.lock().unwrap();
        match &state.sync_status.last_apply_error {
            Some(e) => Err(MeshError::BackendTransient(e.clone())),
            None => Ok(()),
        }
    }

    async fn get_sync_status(&self) -> SyncStatus {
        self.state.lock().unwrap().sync_status.clone()
    }

    async fn stop(&self) {
        self.cancel.cancel();
        self.notify.notify_one();
        let handle = self.loop_handle.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "reconciler loop task panicked");
            }
        }
    }
}

impl ApplyRequester for NftReconciler {
    fn request_apply(&self) {
        ReconcilerPort::request_apply(self)
    }
}

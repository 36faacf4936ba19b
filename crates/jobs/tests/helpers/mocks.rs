#![allow(dead_code)]

use async_trait::async_trait;
use meshsentry_application::ports::{
    JailLifecyclePort, JailRepositoryPort, PolicyStorePort, ReconcilerPort, SchedulerPort, Table,
    UpdateSelector,
};
use meshsentry_domain::{EntryType, FirewallEntry, Jail, MeshError, SyncStatus};
use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct MockScheduler {
    pub calls: AtomicU64,
    pub fail: bool,
}

impl MockScheduler {
    pub fn new() -> Self {
        Self {
            calls: AtomicU64::new(0),
            fail: false,
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SchedulerPort for MockScheduler {
    async fn trigger_update(&self, _selector: UpdateSelector) -> Result<(), MeshError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.fail {
            return Err(MeshError::Fetch("mock failure".to_string()));
        }
        Ok(())
    }
}

pub struct MockPolicyStore {
    pub entries: RwLock<Vec<FirewallEntry>>,
}

impl MockPolicyStore {
    pub fn with_entries(entries: Vec<FirewallEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl PolicyStorePort for MockPolicyStore {
    async fn upsert_entry(&self, entry: FirewallEntry) -> Result<bool, MeshError> {
        self.entries.write().await.push(entry);
        Ok(true)
    }

    async fn delete_entry(&self, id: i64, _essential_override: bool) -> Result<(), MeshError> {
        self.entries.write().await.retain(|e| e.id != Some(id));
        Ok(())
    }

    async fn delete_by_source(&self, prefix: &str) -> Result<u64, MeshError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|e| !e.source.starts_with(prefix));
        Ok((before - entries.len()) as u64)
    }

    async fn expire_sweep(&self) -> Result<u64, MeshError> {
        let now = chrono::Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|e| e.essential || e.expires_at.map_or(true, |exp| exp > now));
        Ok((before - entries.len()) as u64)
    }

    async fn effective_entries(
        &self,
        entry_type: Option<EntryType>,
    ) -> Result<Vec<FirewallEntry>, MeshError> {
        let now = chrono::Utc::now();
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| e.is_effective(now))
            .filter(|e| entry_type.map_or(true, |t| e.entry_type == t))
            .cloned()
            .collect())
    }

    async fn is_blocked(&self, _ip: IpAddr) -> Result<bool, MeshError> {
        Ok(false)
    }
}

#[derive(Default)]
pub struct MockReconciler {
    pub apply_requests: AtomicU64,
}

impl MockReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_requests(&self) -> u64 {
        self.apply_requests.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ReconcilerPort for MockReconciler {
    fn register_table(&self, _table: Arc<dyn Table>) {}

    fn request_apply(&self) {
        self.apply_requests.fetch_add(1, Ordering::Relaxed);
    }

    async fn apply_all(&self) -> Result<(), MeshError> {
        Ok(())
    }

    async fn get_sync_status(&self) -> SyncStatus {
        SyncStatus::default()
    }

    async fn stop(&self) {}
}

pub struct MockJailRepository {
    pub jails: RwLock<Vec<Jail>>,
}

impl MockJailRepository {
    pub fn with_jails(jails: Vec<Jail>) -> Self {
        Self {
            jails: RwLock::new(jails),
        }
    }
}

#[async_trait]
impl JailRepositoryPort for MockJailRepository {
    async fn create(&self, jail: Jail) -> Result<Jail, MeshError> {
        self.jails.write().await.push(jail.clone());
        Ok(jail)
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Jail>, MeshError> {
        Ok(self
            .jails
            .read()
            .await
            .iter()
            .find(|j| j.name.as_ref() == name)
            .cloned())
    }

    async fn get_all(&self) -> Result<Vec<Jail>, MeshError> {
        Ok(self.jails.read().await.clone())
    }

    async fn update(&self, jail: Jail) -> Result<Jail, MeshError> {
        Ok(jail)
    }

    async fn save_log_pos(&self, _name: &str, _pos: u64) -> Result<(), MeshError> {
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), MeshError> {
        self.jails.write().await.retain(|j| j.name.as_ref() != name);
        Ok(())
    }
}

#[derive(Default)]
pub struct MockJailLifecycle {
    pub started: RwLock<Vec<String>>,
    pub fail_on: Option<String>,
}

impl MockJailLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn started(&self) -> Vec<String> {
        self.started.read().await.clone()
    }
}

#[async_trait]
impl JailLifecyclePort for MockJailLifecycle {
    async fn start(&self, jail: Jail) -> Result<(), MeshError> {
        if self.fail_on.as_deref() == Some(jail.name.as_ref()) {
            return Err(MeshError::Validation("forced failure".to_string()));
        }
        self.started.write().await.push(jail.name.to_string());
        Ok(())
    }

    async fn stop(&self, _name: &str) -> Result<(), MeshError> {
        Ok(())
    }

    async fn restart(&self, _jail: Jail) -> Result<(), MeshError> {
        Ok(())
    }
}

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ipnetwork::IpNetwork;
use meshsentry_application::ports::{
    ApplyRequester, BroadcastHookPort, Event, GeoProviderPort, JailLifecyclePort,
    JailRepositoryPort, PolicyStorePort, ReconcilerPort, SchedulerPort, Table, UpdateSelector,
    ZoneSource,
};
use meshsentry_domain::{EntryType, FirewallEntry, Jail, MeshError, SyncStatus};
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MockPolicyStore {
    pub entries: RwLock<Vec<FirewallEntry>>,
    pub next_id: AtomicU64,
}

impl MockPolicyStore {
    pub fn with_entries(entries: Vec<FirewallEntry>) -> Self {
        let next_id = entries
            .iter()
            .filter_map(|e| e.id)
            .max()
            .map(|m| m as u64 + 1)
            .unwrap_or(1);
        Self {
            entries: RwLock::new(entries),
            next_id: AtomicU64::new(next_id),
        }
    }

    pub async fn all(&self) -> Vec<FirewallEntry> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl PolicyStorePort for MockPolicyStore {
    async fn upsert_entry(&self, mut entry: FirewallEntry) -> Result<bool, MeshError> {
        let mut entries = self.entries.write().await;
        if let Some(existing) = entries.iter_mut().find(|e| {
            e.entry_type == entry.entry_type && e.value == entry.value && e.protocol == entry.protocol
        }) {
            entry.id = existing.id;
            *existing = entry;
            return Ok(false);
        }
        entry.id = Some(self.next_id.fetch_add(1, Ordering::Relaxed) as i64);
        entries.push(entry);
        Ok(true)
    }

    async fn delete_entry(&self, id: i64, essential_override: bool) -> Result<(), MeshError> {
        let mut entries = self.entries.write().await;
        let target = entries
            .iter()
            .find(|e| e.id == Some(id))
            .ok_or_else(|| MeshError::NotFound(format!("entry {id} not found")))?;
        if target.essential && !essential_override {
            return Err(MeshError::EssentialProtected(format!(
                "entry {id} is essential"
            )));
        }
        entries.retain(|e| e.id != Some(id));
        Ok(())
    }

    async fn delete_by_source(&self, prefix: &str) -> Result<u64, MeshError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|e| e.essential || !e.source.starts_with(prefix));
        Ok((before - entries.len()) as u64)
    }

    async fn expire_sweep(&self) -> Result<u64, MeshError> {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|e| e.essential || e.expires_at.map_or(true, |exp| exp > now));
        Ok((before - entries.len()) as u64)
    }

    async fn effective_entries(
        &self,
        entry_type: Option<EntryType>,
    ) -> Result<Vec<FirewallEntry>, MeshError> {
        let now = Utc::now();
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

    async fn is_blocked(&self, ip: IpAddr) -> Result<bool, MeshError> {
        let ip = ip.to_string();
        Ok(self.entries.read().await.iter().any(|e| e.value.as_ref() == ip))
    }
}

#[derive(Default)]
pub struct MockReconciler {
    pub apply_requests: AtomicU64,
    pub apply_all_calls: AtomicU64,
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
        self.apply_all_calls.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn get_sync_status(&self) -> SyncStatus {
        SyncStatus {
            in_sync: true,
            last_apply_at: Some(Utc::now()),
            last_apply_error: None,
            pending: false,
        }
    }

    async fn stop(&self) {}
}

impl ApplyRequester for MockReconciler {
    fn request_apply(&self) {
        ReconcilerPort::request_apply(self)
    }
}

#[derive(Default)]
pub struct MockGeoProvider {
    pub cached: RwLock<Vec<(String, Vec<IpNetwork>)>>,
    pub fail_fetch: bool,
}

impl MockGeoProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ZoneSource for MockGeoProvider {
    async fn get_country_cidrs(&self, code: &str) -> Result<Vec<IpNetwork>, MeshError> {
        Ok(self
            .cached
            .read()
            .await
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, nets)| nets.clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl GeoProviderPort for MockGeoProvider {
    async fn fetch_country_zones(&self, code: &str) -> Result<String, MeshError> {
        if self.fail_fetch {
            return Err(MeshError::Fetch(format!("mock fetch failure for {code}")));
        }
        Ok("203.0.113.0/24".to_string())
    }

    async fn fetch_and_cache(&self, code: &str) -> Result<usize, MeshError> {
        let zones = self.fetch_country_zones(code).await?;
        let nets: Vec<IpNetwork> = zones
            .lines()
            .filter_map(|l| IpNetwork::from_str(l.trim()).ok())
            .collect();
        let count = nets.len();
        let mut cached = self.cached.write().await;
        cached.retain(|(c, _)| c != code);
        cached.push((code.to_string(), nets));
        Ok(count)
    }

    async fn refresh_all_zones(&self) -> (usize, usize) {
        (0, 0)
    }

    async fn needs_update(&self) -> bool {
        false
    }

    async fn last_updated(&self) -> Option<DateTime<Utc>> {
        None
    }
}

#[derive(Default)]
pub struct MockJailRepository {
    pub jails: RwLock<Vec<Jail>>,
    pub next_id: AtomicU64,
}

impl MockJailRepository {
    pub fn with_jails(jails: Vec<Jail>) -> Self {
        Self {
            jails: RwLock::new(jails),
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl JailRepositoryPort for MockJailRepository {
    async fn create(&self, mut jail: Jail) -> Result<Jail, MeshError> {
        let mut jails = self.jails.write().await;
        if jails.iter().any(|j| j.name == jail.name) {
            return Err(MeshError::AlreadyExists(format!(
                "jail '{}' already exists",
                jail.name
            )));
        }
        jail.id = Some(self.next_id.fetch_add(1, Ordering::Relaxed) as i64);
        jails.push(jail.clone());
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
        let mut jails = self.jails.write().await;
        let existing = jails
            .iter_mut()
            .find(|j| j.name == jail.name)
            .ok_or_else(|| MeshError::NotFound(format!("jail '{}' not found", jail.name)))?;
        let mut updated = jail;
        updated.id = existing.id;
        *existing = updated.clone();
        Ok(updated)
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
    pub stopped: RwLock<Vec<String>>,
}

impl MockJailLifecycle {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JailLifecyclePort for MockJailLifecycle {
    async fn start(&self, jail: Jail) -> Result<(), MeshError> {
        self.started.write().await.push(jail.name.to_string());
        Ok(())
    }

    async fn stop(&self, name: &str) -> Result<(), MeshError> {
        self.stopped.write().await.push(name.to_string());
        Ok(())
    }

    async fn restart(&self, jail: Jail) -> Result<(), MeshError> {
        self.stopped.write().await.push(jail.name.to_string());
        self.started.write().await.push(jail.name.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct MockScheduler {
    pub calls: AtomicU64,
}

impl MockScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SchedulerPort for MockScheduler {
    async fn trigger_update(&self, _selector: UpdateSelector) -> Result<(), MeshError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingBroadcastHook {
    pub events: std::sync::Mutex<Vec<Event>>,
}

impl BroadcastHookPort for RecordingBroadcastHook {
    fn on_event(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

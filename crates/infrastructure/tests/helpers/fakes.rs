#![allow(dead_code)]

use async_trait::async_trait;
use meshsentry_application::ports::{
    ApplyRequester, BroadcastHookPort, Event, PacketFilterBackendPort, ReconcilerPort, Table,
};
use meshsentry_domain::{MeshError, SyncStatus};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;

/// Records `request_apply()` calls instead of running a real debounced loop.
/// Used where a test only cares whether an apply was requested, not how the
/// reconciler's own coalescing behaves (that's exercised directly against
/// `NftReconciler` in `reconciler_test.rs`).
#[derive(Default)]
pub struct FakeReconciler {
    pub requests: AtomicUsize,
}

impl FakeReconciler {
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReconcilerPort for FakeReconciler {
    fn register_table(&self, _table: Arc<dyn Table>) {}

    fn request_apply(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }

    async fn apply_all(&self) -> Result<(), MeshError> {
        Ok(())
    }

    async fn get_sync_status(&self) -> SyncStatus {
        SyncStatus::default()
    }

    async fn stop(&self) {}
}

impl ApplyRequester for FakeReconciler {
    fn request_apply(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct FakeBroadcastHook {
    pub events: StdMutex<Vec<Event>>,
}

impl FakeBroadcastHook {
    pub fn events_snapshot(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl BroadcastHookPort for FakeBroadcastHook {
    fn on_event(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

/// Records every batch handed to it; never fails. Used to assert the
/// reconciler's coalescing and idempotence properties without shelling out
/// to a real `nft` binary.
#[derive(Default)]
pub struct RecordingBackend {
    pub calls: Mutex<Vec<(String, String, String, String, Vec<String>)>>,
}

impl RecordingBackend {
    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    pub async fn calls_snapshot(&self) -> Vec<(String, String, String, String, Vec<String>)> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl PacketFilterBackendPort for RecordingBackend {
    async fn add_elements(
        &self,
        family: &str,
        table: &str,
        set: &str,
        elements: &[String],
    ) -> Result<(), MeshError> {
        self.calls.lock().await.push((
            "add".to_string(),
            family.to_string(),
            table.to_string(),
            set.to_string(),
            elements.to_vec(),
        ));
        Ok(())
    }

    async fn delete_elements(
        &self,
        family: &str,
        table: &str,
        set: &str,
        elements: &[String],
    ) -> Result<(), MeshError> {
        self.calls.lock().await.push((
            "delete".to_string(),
            family.to_string(),
            table.to_string(),
            set.to_string(),
            elements.to_vec(),
        ));
        Ok(())
    }

    async fn flush_set(&self, _family: &str, _table: &str, _set: &str) -> Result<(), MeshError> {
        Ok(())
    }
}

/// A `Table` whose desired state is whatever the test currently has it
/// return, read fresh on every `render` call — the point of the fixture is
/// to let a test change "what the store would render" between apply cycles.
pub struct StoreBackedTable {
    pub family: String,
    pub name: String,
    pub elements: Mutex<Vec<String>>,
}

impl StoreBackedTable {
    pub fn new(family: &str, name: &str, elements: Vec<String>) -> Self {
        Self {
            family: family.to_string(),
            name: name.to_string(),
            elements: Mutex::new(elements),
        }
    }

    pub async fn set_elements(&self, elements: Vec<String>) {
        *self.elements.lock().await = elements;
    }
}

#[async_trait]
impl Table for StoreBackedTable {
    fn family(&self) -> &str {
        &self.family
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn render(&self) -> Result<meshsentry_application::ports::DesiredState, MeshError> {
        Ok(meshsentry_application::ports::DesiredState {
            family: self.family.clone(),
            table_name: self.name.clone(),
            sets: vec![meshsentry_application::ports::DesiredSet {
                name: "blocked_ips".to_string(),
                elements: self.elements.lock().await.clone(),
            }],
        })
    }
}

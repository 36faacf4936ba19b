use chrono::{Duration as ChronoDuration, Utc};
use meshsentry_application::use_cases::ExpireSweepUseCase;
use meshsentry_domain::{Action, Direction, EntryType, FirewallEntry, Protocol};
use meshsentry_jobs::ExpireSweepJob;
use std::sync::Arc;
use tokio::time::{sleep, Duration};

mod helpers;
use helpers::mocks::{MockPolicyStore, MockReconciler};

fn expired_entry(id: i64) -> FirewallEntry {
    let mut entry = FirewallEntry::new(
        EntryType::Ip,
        "203.0.113.5".to_string(),
        Protocol::Both,
        Action::Block,
        Direction::Inbound,
        "manual".to_string(),
        None,
        None,
        false,
        Some(Utc::now() - ChronoDuration::seconds(5)),
    );
    entry.id = Some(id);
    entry
}

#[tokio::test]
async fn removes_expired_entries_and_requests_an_apply() {
    let store = Arc::new(MockPolicyStore::with_entries(vec![expired_entry(1)]));
    let reconciler = Arc::new(MockReconciler::new());
    let sweep = Arc::new(ExpireSweepUseCase::new(store.clone(), reconciler.clone()));

    let job = Arc::new(ExpireSweepJob::new(sweep).with_interval(1));
    job.start().await;

    sleep(Duration::from_millis(1200)).await;

    assert_eq!(store.len().await, 0);
    assert!(reconciler.apply_requests() >= 1);
}

#[tokio::test]
async fn leaves_non_expired_entries_alone() {
    let mut entry = expired_entry(1);
    entry.expires_at = None;
    let store = Arc::new(MockPolicyStore::with_entries(vec![entry]));
    let reconciler = Arc::new(MockReconciler::new());
    let sweep = Arc::new(ExpireSweepUseCase::new(store.clone(), reconciler.clone()));

    let job = Arc::new(ExpireSweepJob::new(sweep).with_interval(1));
    job.start().await;

    sleep(Duration::from_millis(1200)).await;

    assert_eq!(store.len().await, 1);
    assert_eq!(reconciler.apply_requests(), 0);
}

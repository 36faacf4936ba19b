mod helpers;

use helpers::db::create_test_pool;
use helpers::fakes::{FakeBroadcastHook, FakeReconciler};
use meshsentry_application::ports::{JailLifecyclePort, JailRepositoryPort, PolicyStorePort};
use meshsentry_domain::{EscalationConfig, Jail};
use meshsentry_infrastructure::jails::{JailSupervisor, SqliteJailRepository, TailerConfig};
use meshsentry_infrastructure::policy::SqlitePolicyStore;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn sshd_jail(log_file: &str) -> Jail {
    Jail {
        id: None,
        name: Arc::from("sshd"),
        enabled: true,
        log_file: Arc::from(log_file),
        filter_regex: Arc::from(r"Failed password .* from (\d+\.\d+\.\d+\.\d+)"),
        max_retry: 3,
        find_time_secs: 60,
        ban_time_secs: 3600,
        port: Some(22),
        protocol: meshsentry_domain::Protocol::Both,
        action: meshsentry_domain::Action::Block,
        last_log_pos: 0,
        escalation: EscalationConfig {
            enabled: true,
            threshold: 3,
            window_secs: 3600,
        },
    }
}

async fn wait_for<F, Fut>(mut check: F, timeout: Duration)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if check().await {
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            panic!("condition not met within {timeout:?}");
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// S1 / invariant 6: three matching lines for the same IP within
/// `find_time` produce one effective ban with source `jail:<name>` and an
/// `expires_at` matching `ban_time`, and request an apply.
#[tokio::test]
async fn jail_trigger_law_bans_after_max_retry_hits() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    let log_path = tmp.path().to_str().unwrap().to_string();

    let pool = create_test_pool().await;
    let policy_store: Arc<dyn PolicyStorePort> = Arc::new(SqlitePolicyStore::new(pool.clone()));
    let jail_repo = Arc::new(SqliteJailRepository::new(pool.clone()));
    let reconciler = Arc::new(FakeReconciler::default());
    let broadcast = Arc::new(FakeBroadcastHook::default());

    let jail = sshd_jail(&log_path);
    jail_repo.create(jail.clone()).await.unwrap();

    let supervisor = JailSupervisor::new(
        TailerConfig {
            poll_interval: Duration::from_millis(30),
            ignore_ips: vec![],
            wireguard_port: 51820,
        },
        policy_store.clone(),
        jail_repo.clone(),
        reconciler.clone(),
        broadcast.clone(),
        CancellationToken::new(),
    );

    supervisor.start(jail.clone()).await.unwrap();

    {
        let mut f = std::fs::OpenOptions::new().append(true).open(&log_path).unwrap();
        for _ in 0..3 {
            writeln!(f, "Failed password for root from 1.2.3.4").unwrap();
            tokio::time::sleep(Duration::from_millis(40)).await;
        }
    }

    wait_for(
        || async {
            policy_store
                .effective_entries(Some(meshsentry_domain::EntryType::Ip))
                .await
                .unwrap()
                .iter()
                .any(|e| e.value.as_ref() == "1.2.3.4")
        },
        Duration::from_secs(3),
    )
    .await;

    let entries = policy_store
        .effective_entries(Some(meshsentry_domain::EntryType::Ip))
        .await
        .unwrap();
    let ban = entries.iter().find(|e| e.value.as_ref() == "1.2.3.4").unwrap();
    assert_eq!(ban.source.as_ref(), "jail:sshd");
    assert_eq!(ban.hit_count, 1);
    let expires = ban.expires_at.expect("ban_time > 0 implies an expiry");
    let delta = (expires - chrono::Utc::now()).num_seconds();
    assert!((3500..=3600).contains(&delta), "expires_at ~ now + ban_time, got delta={delta}");

    assert!(reconciler.requests() >= 1);

    supervisor.stop("sshd").await.unwrap();
}

/// S2 / invariant 7: three distinct bans in the same /24 within the
/// escalation window collapse into one `range` ban and remove the
/// individual `ip` rows.
#[tokio::test]
async fn escalation_law_collapses_three_bans_into_a_range() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    let log_path = tmp.path().to_str().unwrap().to_string();

    let pool = create_test_pool().await;
    let policy_store: Arc<dyn PolicyStorePort> = Arc::new(SqlitePolicyStore::new(pool.clone()));
    let jail_repo = Arc::new(SqliteJailRepository::new(pool.clone()));
    let reconciler = Arc::new(FakeReconciler::default());
    let broadcast = Arc::new(FakeBroadcastHook::default());

    let mut jail = sshd_jail(&log_path);
    jail.max_retry = 1; // ban on the first hit so three lines produce three bans
    jail_repo.create(jail.clone()).await.unwrap();

    let supervisor = JailSupervisor::new(
        TailerConfig {
            poll_interval: Duration::from_millis(30),
            ignore_ips: vec![],
            wireguard_port: 51820,
        },
        policy_store.clone(),
        jail_repo.clone(),
        reconciler.clone(),
        broadcast.clone(),
        CancellationToken::new(),
    );

    supervisor.start(jail.clone()).await.unwrap();

    {
        let mut f = std::fs::OpenOptions::new().append(true).open(&log_path).unwrap();
        for ip in ["1.2.3.10", "1.2.3.11", "1.2.3.12"] {
            writeln!(f, "Failed password for root from {ip}").unwrap();
            tokio::time::sleep(Duration::from_millis(60)).await;
        }
    }

    wait_for(
        || async {
            policy_store
                .effective_entries(Some(meshsentry_domain::EntryType::Range))
                .await
                .unwrap()
                .iter()
                .any(|e| e.value.as_ref() == "1.2.3.0/24")
        },
        Duration::from_secs(4),
    )
    .await;

    let ranges = policy_store
        .effective_entries(Some(meshsentry_domain::EntryType::Range))
        .await
        .unwrap();
    let range = ranges.iter().find(|e| e.value.as_ref() == "1.2.3.0/24").unwrap();
    assert_eq!(range.source.as_ref(), "escalated");

    let ips = policy_store
        .effective_entries(Some(meshsentry_domain::EntryType::Ip))
        .await
        .unwrap();
    for ip in ["1.2.3.10", "1.2.3.11", "1.2.3.12"] {
        assert!(
            !ips.iter().any(|e| e.value.as_ref() == ip),
            "{ip} should have been superseded by the range ban"
        );
    }

    supervisor.stop("sshd").await.unwrap();
}

/// S6: a jail whose log file does not exist logs a warning and never
/// starts a tailer, without affecting other jails.
#[tokio::test]
async fn missing_log_file_does_not_start_a_monitor() {
    let pool = create_test_pool().await;
    let policy_store: Arc<dyn PolicyStorePort> = Arc::new(SqlitePolicyStore::new(pool.clone()));
    let jail_repo = Arc::new(SqliteJailRepository::new(pool.clone()));
    let reconciler = Arc::new(FakeReconciler::default());
    let broadcast = Arc::new(FakeBroadcastHook::default());

    let jail = sshd_jail("/nonexistent/path/does-not-exist.log");
    jail_repo.create(jail.clone()).await.unwrap();

    let supervisor = JailSupervisor::new(
        TailerConfig {
            poll_interval: Duration::from_millis(30),
            ignore_ips: vec![],
            wireguard_port: 51820,
        },
        policy_store.clone(),
        jail_repo.clone(),
        reconciler.clone(),
        broadcast.clone(),
        CancellationToken::new(),
    );

    // `start` itself succeeds (it spawns the tailer task); the tailer
    // notices the missing file and returns immediately without scanning.
    supervisor.start(jail.clone()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let entries = policy_store.effective_entries(None).await.unwrap();
    assert!(entries.is_empty());

    supervisor.stop("sshd").await.unwrap();
}

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use meshsentry_api::state::AppState;
use meshsentry_application::ports::{
    ApplyRequester, BroadcastHookPort, GeoIpLookupPort, GeoProviderPort, JailLifecyclePort,
    JailRepositoryPort, NoopBroadcastHook, PolicyStorePort, ReconcilerPort, SchedulerPort,
    SettingsPort, ZoneSource,
};
use meshsentry_application::use_cases::{
    ApplyNowUseCase, BlockCountryUseCase, BulkImportEntriesUseCase, CreateJailUseCase,
    DeleteBySourceUseCase, DeleteEntryUseCase, DeleteJailUseCase, ExpireSweepUseCase,
    GetSyncStatusUseCase, ListEffectiveEntriesUseCase, ListJailsUseCase, RefreshZonesUseCase,
    TriggerUpdateUseCase, UnblockCountryUseCase, UpdateJailUseCase, UpsertEntryUseCase,
};
use meshsentry_domain::Config;
use meshsentry_infrastructure::geo::{HttpGeoProvider, MaxMindGeoIpLookup};
use meshsentry_infrastructure::jails::{JailSupervisor, SqliteJailRepository, TailerConfig};
use meshsentry_infrastructure::packet_filter::NftBackend;
use meshsentry_infrastructure::policy::SqlitePolicyStore;
use meshsentry_infrastructure::reconciler::{CountryTable, FirewallTable, NftReconciler, VpnAclTable};
use meshsentry_infrastructure::scheduler::GeoScheduler;
use meshsentry_infrastructure::settings::SqliteSettingsStore;
use meshsentry_jobs::{ExpireSweepJob, JailEngineJob, JobRunner, SchedulerJob};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::bootstrap::init_database;

/// Composition root: wires every port to its concrete adapter and owns the
/// long-lived handles (reconciler loop, jail supervisor, cancellation
/// token) the rest of the process is built from.
pub struct Core {
    pub config: Config,
    pub policy_store: Arc<dyn PolicyStorePort>,
    pub reconciler: Arc<dyn ReconcilerPort>,
    pub geo: Arc<dyn GeoProviderPort>,
    pub geoip: Option<Arc<dyn GeoIpLookupPort>>,
    pub jail_repo: Arc<dyn JailRepositoryPort>,
    pub jail_lifecycle: Arc<dyn JailLifecyclePort>,
    pub scheduler: Arc<dyn SchedulerPort>,
    pub broadcast: Arc<dyn BroadcastHookPort>,
    #[allow(dead_code)]
    pub settings: Arc<dyn SettingsPort>,
    pub shutdown: CancellationToken,
}

fn settings_secret() -> [u8; 32] {
    match std::env::var("MESHSENTRY_SETTINGS_KEY") {
        Ok(encoded) => match BASE64.decode(encoded.trim()) {
            Ok(bytes) if bytes.len() == 32 => {
                let mut key = [0u8; 32];
                key.copy_from_slice(&bytes);
                key
            }
            _ => {
                warn!("MESHSENTRY_SETTINGS_KEY is not valid base64-encoded 32 bytes, generating an ephemeral key");
                random_secret()
            }
        },
        Err(_) => {
            warn!("MESHSENTRY_SETTINGS_KEY not set; encrypted settings will not survive a restart");
            random_secret()
        }
    }
}

fn random_secret() -> [u8; 32] {
    use ring::rand::{SecureRandom, SystemRandom};
    let mut bytes = [0u8; 32];
    SystemRandom::new()
        .fill(&mut bytes)
        .expect("system RNG unavailable");
    bytes
}

impl Core {
    pub async fn build(config: Config) -> anyhow::Result<Self> {
        let (write_pool, _read_pool) = init_database(&config.database).await?;

        let shutdown = CancellationToken::new();
        let broadcast: Arc<dyn BroadcastHookPort> = Arc::new(NoopBroadcastHook);

        let policy_store: Arc<dyn PolicyStorePort> =
            Arc::new(SqlitePolicyStore::new(write_pool.clone()));

        let backend = Arc::new(NftBackend::new(
            config.firewall.backend_binary.clone(),
            config.firewall.batch_size,
        ));
        let reconciler_concrete = NftReconciler::spawn(
            backend,
            Duration::from_millis(config.firewall.debounce_ms),
            Duration::from_millis(config.firewall.hard_cap_ms),
        );
        let reconciler: Arc<dyn ReconcilerPort> = reconciler_concrete.clone();
        let apply_requester: Arc<dyn ApplyRequester> = reconciler_concrete.clone();

        let geo_concrete = Arc::new(HttpGeoProvider::new(
            write_pool.clone(),
            config.geo.zone_url_template.clone(),
            Duration::from_secs(config.geo.fetch_timeout_secs),
            config.geo.staleness_days,
            policy_store.clone(),
            apply_requester,
        )?);
        let geo: Arc<dyn GeoProviderPort> = geo_concrete.clone();
        let zones: Arc<dyn ZoneSource> = geo_concrete;

        let geoip: Option<Arc<dyn GeoIpLookupPort>> = match &config.geo.geoip_db_path {
            Some(path) => {
                let lookup = MaxMindGeoIpLookup::open(std::path::Path::new(path))?;
                Some(Arc::new(lookup))
            }
            None => None,
        };

        let jail_repo: Arc<dyn JailRepositoryPort> =
            Arc::new(SqliteJailRepository::new(write_pool.clone()));

        let ignore_ips: Vec<IpAddr> = config
            .jail
            .ignore_ips
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        let tailer_config = TailerConfig {
            poll_interval: Duration::from_secs(config.jail.poll_interval_secs),
            ignore_ips,
            wireguard_port: config.jail.wireguard_port,
        };
        let jail_lifecycle: Arc<dyn JailLifecyclePort> = Arc::new(JailSupervisor::new(
            tailer_config,
            policy_store.clone(),
            jail_repo.clone(),
            reconciler.clone(),
            broadcast.clone(),
            shutdown.child_token(),
        ));

        let scheduler: Arc<dyn SchedulerPort> =
            Arc::new(GeoScheduler::new(geo.clone(), geoip.clone()));

        let settings: Arc<dyn SettingsPort> = Arc::new(SqliteSettingsStore::new(
            write_pool.clone(),
            &settings_secret(),
        )?);

        reconciler.register_table(Arc::new(FirewallTable::new(
            policy_store.clone(),
            config.firewall.family.clone(),
            config.firewall.table.clone(),
        )));
        reconciler.register_table(Arc::new(CountryTable::new(
            policy_store.clone(),
            zones,
            config.firewall.family.clone(),
            config.firewall.table.clone(),
        )));
        reconciler.register_table(Arc::new(VpnAclTable::new(
            policy_store.clone(),
            config.firewall.family.clone(),
            config.firewall.table.clone(),
        )));

        info!("composition root built");

        Ok(Self {
            config,
            policy_store,
            reconciler,
            geo,
            geoip,
            jail_repo,
            jail_lifecycle,
            scheduler,
            broadcast,
            settings,
            shutdown,
        })
    }

    pub fn app_state(&self) -> AppState {
        let upsert_entry = Arc::new(UpsertEntryUseCase::new(
            self.policy_store.clone(),
            self.reconciler.clone(),
            self.broadcast.clone(),
        ));

        AppState {
            delete_entry: Arc::new(DeleteEntryUseCase::new(
                self.policy_store.clone(),
                self.reconciler.clone(),
                self.broadcast.clone(),
            )),
            delete_by_source: Arc::new(DeleteBySourceUseCase::new(
                self.policy_store.clone(),
                self.reconciler.clone(),
            )),
            list_entries: Arc::new(ListEffectiveEntriesUseCase::new(self.policy_store.clone())),
            bulk_import: Arc::new(BulkImportEntriesUseCase::new(upsert_entry.clone())),
            upsert_entry,
            block_country: Arc::new(BlockCountryUseCase::new(
                self.policy_store.clone(),
                self.geo.clone(),
                self.reconciler.clone(),
            )),
            unblock_country: Arc::new(UnblockCountryUseCase::new(
                self.policy_store.clone(),
                self.reconciler.clone(),
            )),
            refresh_zones: Arc::new(RefreshZonesUseCase::new(
                self.geo.clone(),
                self.reconciler.clone(),
            )),
            trigger_update: Arc::new(TriggerUpdateUseCase::new(self.scheduler.clone())),
            create_jail: Arc::new(CreateJailUseCase::new(
                self.jail_repo.clone(),
                self.jail_lifecycle.clone(),
                self.config.jail.allowed_log_roots.clone(),
            )),
            update_jail: Arc::new(UpdateJailUseCase::new(
                self.jail_repo.clone(),
                self.jail_lifecycle.clone(),
                self.config.jail.allowed_log_roots.clone(),
            )),
            delete_jail: Arc::new(DeleteJailUseCase::new(
                self.jail_repo.clone(),
                self.jail_lifecycle.clone(),
                self.policy_store.clone(),
                self.reconciler.clone(),
            )),
            list_jails: Arc::new(ListJailsUseCase::new(self.jail_repo.clone())),
            apply_now: Arc::new(ApplyNowUseCase::new(self.reconciler.clone())),
            get_sync_status: Arc::new(GetSyncStatusUseCase::new(self.reconciler.clone())),
        }
    }

    pub fn job_runner(&self) -> JobRunner {
        let expire_sweep = ExpireSweepJob::new(Arc::new(ExpireSweepUseCase::new(
            self.policy_store.clone(),
            self.reconciler.clone(),
        )))
        .with_cancellation(self.shutdown.child_token());

        let scheduler_job = SchedulerJob::new(
            self.scheduler.clone(),
            self.config.scheduler.auto_update,
            self.config.scheduler.update_hour,
        )
        .with_cancellation(self.shutdown.child_token());

        JobRunner::new()
            .with_jail_engine(JailEngineJob::new(
                self.jail_repo.clone(),
                self.jail_lifecycle.clone(),
            ))
            .with_expire_sweep(expire_sweep)
            .with_scheduler(scheduler_job)
    }

    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        self.reconciler.stop().await;
    }
}

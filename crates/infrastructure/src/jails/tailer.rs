use fancy_regex::Regex;
use meshsentry_application::ports::{
    BroadcastHookPort, Event, JailRepositoryPort, PolicyStorePort, ReconcilerPort,
};
use meshsentry_application::services::EscalationService;
use meshsentry_domain::firewall_entry::source;
use meshsentry_domain::{Action, Direction, FirewallEntry, Jail, Protocol};
use std::collections::{HashMap, VecDeque};
use std::io::{Read, Seek, SeekFrom};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Configuration shared across every jail's tailer, independent of the
/// per-jail rule.
#[derive(Clone)]
pub struct TailerConfig {
    pub poll_interval: Duration,
    pub ignore_ips: Vec<IpAddr>,
    pub wireguard_port: u16,
}

pub struct Tailer {
    jail: Jail,
    config: TailerConfig,
    policy_store: Arc<dyn PolicyStorePort>,
    jail_repo: Arc<dyn JailRepositoryPort>,
    reconciler: Arc<dyn ReconcilerPort>,
    broadcast: Arc<dyn BroadcastHookPort>,
}

/// Per-IP sliding window of recent hit timestamps, evicted past `find_time`.
struct HitWindow {
    hits: HashMap<IpAddr, VecDeque<Instant>>,
}

impl HitWindow {
    fn new() -> Self {
        Self {
            hits: HashMap::new(),
        }
    }

    /// Appends a hit and evicts entries older than `find_time`, returning the
    /// resulting window length for `ip`.
    fn record(&mut self, ip: IpAddr, find_time: Duration) -> usize {
        let now = Instant::now();
        let deque = self.hits.entry(ip).or_default();
        deque.push_back(now);
        while let Some(&front) = deque.front() {
            if now.duration_since(front) > find_time {
                deque.pop_front();
            } else {
                break;
            }
        }
        deque.len()
    }

    fn clear(&mut self, ip: &IpAddr) {
        self.hits.remove(ip);
    }
}

/// Distinct IPs banned by this jail recently enough to count toward
/// escalation, pruned to `escalate_window` on each check.
struct EscalationWindow {
    banned: Vec<(Ipv4Addr, Instant)>,
}

impl EscalationWindow {
    fn new() -> Self {
        Self { banned: Vec::new() }
    }

    fn record_and_count_subnet(
        &mut self,
        ip: Ipv4Addr,
        window: Duration,
    ) -> (ipnetwork::Ipv4Network, usize) {
        let now = Instant::now();
        self.banned.retain(|(_, t)| now.duration_since(*t) <= window);
        self.banned.push((ip, now));

        let subnet = EscalationService::subnet_24(ip);
        let in_subnet: Vec<Ipv4Addr> = self
            .banned
            .iter()
            .filter(|(addr, _)| subnet.contains(*addr))
            .map(|(addr, _)| *addr)
            .collect();
        let count = EscalationService::count_in_subnet(&subnet, &in_subnet);
        (subnet, count)
    }

    fn clear_subnet(&mut self, subnet: &ipnetwork::Ipv4Network) {
        self.banned.retain(|(addr, _)| !subnet.contains(*addr));
    }
}

impl Tailer {
    pub fn new(
        jail: Jail,
        config: TailerConfig,
        policy_store: Arc<dyn PolicyStorePort>,
        jail_repo: Arc<dyn JailRepositoryPort>,
        reconciler: Arc<dyn ReconcilerPort>,
        broadcast: Arc<dyn BroadcastHookPort>,
    ) -> Self {
        Self {
            jail,
            config,
            policy_store,
            jail_repo,
            reconciler,
            broadcast,
        }
    }

    /// Runs until `cancel` fires. A missing log file is logged as a warning
    /// and the loop returns without starting — the caller does not treat
    /// this as fatal.
    pub async fn run(self, cancel: CancellationToken) {
        let regex = match meshsentry_domain::validators::validate_filter_regex(&self.jail.filter_regex)
        {
            Ok(re) => re,
            Err(e) => {
                error!(jail = %self.jail.name, error = %e, "invalid filter_regex, tailer not started");
                return;
            }
        };

        if !std::path::Path::new(self.jail.log_file.as_ref()).exists() {
            warn!(
                jail = %self.jail.name,
                log_file = %self.jail.log_file,
                "jail log file missing, monitor not started"
            );
            return;
        }

        let mut pos = self.jail.last_log_pos;
        let mut hits = HitWindow::new();
        let mut escalation = EscalationWindow::new();
        let find_time = Duration::from_secs(self.jail.find_time_secs);

        let mut ticker = tokio::time::interval(self.config.poll_interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!(jail = %self.jail.name, "tailer shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    match self.scan_once(&regex, pos, &mut hits, &mut escalation, find_time).await {
                        Ok(new_pos) => {
                            if new_pos != pos {
                                pos = new_pos;
                                if let Err(e) = self.jail_repo.save_log_pos(&self.jail.name, pos).await {
                                    warn!(jail = %self.jail.name, error = %e, "failed to persist log position");
                                }
                            }
                        }
                        Err(e) => {
                            warn!(jail = %self.jail.name, error = %e, "tailer scan failed, will retry next tick");
                        }
                    }
                }
            }
        }
    }

    /// Reads bytes appended since `pos` (resetting to 0 on truncation/rotation),
    /// scans complete lines, and returns the offset of the last complete
    /// line — a partial trailing line is replayed on the next scan.
    async fn scan_once(
        &self,
        regex: &Regex,
        pos: u64,
        hits: &mut HitWindow,
        escalation: &mut EscalationWindow,
        find_time: Duration,
    ) -> std::io::Result<u64> {
        let log_file = self.jail.log_file.to_string();
        let mut file = std::fs::File::open(&log_file)?;
        let size = file.metadata()?.len();

        let start = if size < pos { 0 } else { pos };
        if start >= size {
            return Ok(start);
        }

        file.seek(SeekFrom::Start(start))?;
        let mut buf = Vec::with_capacity((size - start) as usize);
        file.read_to_end(&mut buf)?;

        let text = String::from_utf8_lossy(&buf);
        let last_newline = text.rfind('\n');
        let (complete, consumed) = match last_newline {
            Some(idx) => (&text[..idx], idx + 1),
            None => ("", 0),
        };

        for line in complete.lines() {
            self.process_line(regex, line, hits, escalation, find_time)
                .await;
        }

        Ok(start + consumed as u64)
    }

    async fn process_line(
        &self,
        regex: &Regex,
        line: &str,
        hits: &mut HitWindow,
        escalation: &mut EscalationWindow,
        find_time: Duration,
    ) {
        let caps = match regex.captures(line) {
            Ok(Some(c)) => c,
            _ => return,
        };

        let ip_str = match caps.get(1) {
            Some(m) => m.as_str(),
            None => return,
        };
        let ip: IpAddr = match ip_str.parse() {
            Ok(ip) => ip,
            Err(_) => return,
        };
        let dest_port: Option<u16> = caps.get(2).and_then(|m| m.as_str().parse().ok());

        if self.config.ignore_ips.contains(&ip) {
            return;
        }
        if self.jail.name.as_ref() == "portscan" {
            if let Some(port) = dest_port {
                if port == self.config.wireguard_port {
                    return;
                }
            }
        }
        match self.policy_store.is_blocked(ip).await {
            Ok(true) => return,
            Ok(false) => {}
            Err(e) => {
                warn!(jail = %self.jail.name, error = %e, "is_blocked check failed, continuing");
            }
        }

        let count = hits.record(ip, find_time);
        if count < self.jail.max_retry as usize {
            return;
        }
        hits.clear(&ip);

        self.ban(ip).await;

        if self.jail.escalation.enabled {
            if let IpAddr::V4(v4) = ip {
                self.maybe_escalate(v4, escalation).await;
            }
        }
    }

    async fn ban(&self, ip: IpAddr) {
        let expires_at = if self.jail.is_permanent_ban() {
            None
        } else {
            Some(chrono::Utc::now() + chrono::Duration::seconds(self.jail.ban_time_secs as i64))
        };

        let entry = FirewallEntry::new(
            meshsentry_domain::EntryType::Ip,
            ip.to_string(),
            self.jail.protocol,
            self.jail.action,
            Direction::Both,
            source::jail(&self.jail.name),
            Some(format!("{} rate limit exceeded", self.jail.name)),
            Some(self.jail.name.to_string()),
            false,
            expires_at,
        );

        match self.policy_store.upsert_entry(entry).await {
            Ok(_) => {
                debug!(jail = %self.jail.name, %ip, "banned");
                self.broadcast.on_event(Event::JailTriggered {
                    jail: self.jail.name.to_string(),
                    ip: ip.to_string(),
                });
                self.reconciler.request_apply();
            }
            Err(e) => {
                error!(jail = %self.jail.name, %ip, error = %e, "failed to write ban entry");
            }
        }
    }

    async fn maybe_escalate(&self, ip: Ipv4Addr, escalation: &mut EscalationWindow) {
        let window = Duration::from_secs(self.jail.escalation.window_secs);
        let (subnet, count) = escalation.record_and_count_subnet(ip, window);
        if count < self.jail.escalation.threshold as usize {
            return;
        }

        let entry = FirewallEntry::new(
            meshsentry_domain::EntryType::Range,
            subnet.to_string(),
            Protocol::Both,
            Action::Block,
            Direction::Both,
            source::ESCALATED.to_string(),
            Some(format!(
                "{} escalated: {} bans in {}",
                self.jail.name, count, subnet
            )),
            Some(self.jail.name.to_string()),
            false,
            None,
        );

        if let Err(e) = self.policy_store.upsert_entry(entry).await {
            error!(jail = %self.jail.name, %subnet, error = %e, "failed to write escalated range entry");
            return;
        }

        if let Err(e) = self.delete_individual_bans_in_subnet(&subnet).await {
            warn!(jail = %self.jail.name, %subnet, error = %e, "failed to remove individual bans superseded by escalation");
        }
        escalation.clear_subnet(&subnet);

        info!(jail = %self.jail.name, %subnet, count, "escalated to range ban");
        self.reconciler.request_apply();
    }

    async fn delete_individual_bans_in_subnet(
        &self,
        subnet: &ipnetwork::Ipv4Network,
    ) -> Result<(), meshsentry_domain::MeshError> {
        let prefix = source::jail(&self.jail.name);
        let entries = self
            .policy_store
            .effective_entries(Some(meshsentry_domain::EntryType::Ip))
            .await?;

        for entry in entries {
            if entry.source.as_ref() != prefix {
                continue;
            }
            let matches = match entry.value.parse::<Ipv4Addr>() {
                Ok(addr) => subnet.contains(addr),
                Err(_) => false,
            };
            if matches {
                if let Some(id) = entry.id {
                    self.policy_store.delete_entry(id, false).await?;
                }
            }
        }
        Ok(())
    }
}

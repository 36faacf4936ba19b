use ipnetwork::Ipv4Network;
use std::net::Ipv4Addr;

/// Pure helper for the auto-escalation rule: group per-IP jail bans by /24
/// and decide when a subnet has crossed the escalation threshold. Carries
/// no state of its own — the jail engine supplies the candidate IPs.
pub struct EscalationService;

impl EscalationService {
    /// The /24 network containing `ip`.
    pub fn subnet_24(ip: Ipv4Addr) -> Ipv4Network {
        let octets = ip.octets();
        let base = Ipv4Addr::new(octets[0], octets[1], octets[2], 0);
        Ipv4Network::new(base, 24).expect("/24 is always a valid prefix length")
    }

    /// Counts distinct addresses in `banned_ips` that fall within `subnet`.
    pub fn count_in_subnet(subnet: &Ipv4Network, banned_ips: &[Ipv4Addr]) -> usize {
        banned_ips.iter().filter(|ip| subnet.contains(**ip)).count()
    }
}

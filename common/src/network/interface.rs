use std::net::Ipv4Addr;

use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::{IpNetwork, Ipv4Network};

use crate::network::range::DiscoveryRange;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ViabilityError {
    /// The interface is operationally down.
    IsDown,
    /// The interface is the loopback device.
    IsLoopback,
    /// The interface does not have a MAC address.
    NoMacAddress,
    /// The interface does not support broadcast (required for ARP).
    NotBroadcast,
    /// The interface is a point-to-point link (e.g., a VPN).
    IsPointToPoint,
    /// None of the interface's IPv4 networks covers the discovery range.
    OutOfRange,
}

/// The interface and local IPv4 network used to reach a discovery range.
#[derive(Debug, Clone)]
pub struct LanBinding {
    pub interface: NetworkInterface,
    pub local_net: Ipv4Network,
}

impl LanBinding {
    pub fn local_addr(&self) -> Ipv4Addr {
        self.local_net.ip()
    }
}

/// Picks the interface that can broadcast into `range`.
///
/// Wired interfaces win over wireless ones when more than one qualifies.
pub fn select_for_range(
    interfaces: &[NetworkInterface],
    range: &DiscoveryRange,
) -> Option<LanBinding> {
    let candidates: Vec<LanBinding> = interfaces
        .iter()
        .filter_map(|interface| {
            let local_net = check_viability(interface, range).ok()?;
            Some(LanBinding {
                interface: interface.clone(),
                local_net,
            })
        })
        .collect();

    select_best(candidates, |binding| is_wired_name(&binding.interface.name))
}

/// Returns the IPv4 network that covers `range` if the interface can carry ARP.
pub fn check_viability(
    interface: &NetworkInterface,
    range: &DiscoveryRange,
) -> Result<Ipv4Network, ViabilityError> {
    if !interface.is_up() {
        return Err(ViabilityError::IsDown);
    }
    if interface.is_loopback() {
        return Err(ViabilityError::IsLoopback);
    }
    if interface.mac.is_none() {
        return Err(ViabilityError::NoMacAddress);
    }
    if !interface.is_broadcast() {
        return Err(ViabilityError::NotBroadcast);
    }
    if interface.is_point_to_point() {
        return Err(ViabilityError::IsPointToPoint);
    }

    interface
        .ips
        .iter()
        .find_map(|net| match net {
            IpNetwork::V4(v4) if v4.contains(range.network()) && v4.prefix() <= 24 => Some(*v4),
            _ => None,
        })
        .ok_or(ViabilityError::OutOfRange)
}

fn select_best(
    mut candidates: Vec<LanBinding>,
    is_wired: impl Fn(&LanBinding) -> bool,
) -> Option<LanBinding> {
    match candidates.len() {
        0 => None,
        1 => candidates.pop(),
        _ => {
            let wired = candidates.iter().position(|c| is_wired(c)).unwrap_or(0);
            Some(candidates.swap_remove(wired))
        }
    }
}

// Name heuristic; sysfs is not available on every platform.
fn is_wired_name(name: &str) -> bool {
    name.starts_with("en") || name.starts_with("eth")
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

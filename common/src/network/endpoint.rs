//! # Endpoint Model
//!
//! An endpoint is a diagnostic subject: either a host found on the local
//! segment or a statically configured external server. Its identity is the
//! address alone.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use pnet::util::MacAddr;

use crate::error::ConfigError;

/// A numeric network address or a hostname left for the probe to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Address {
    Ip(IpAddr),
    Hostname(String),
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Ip(ip) => write!(f, "{ip}"),
            Address::Hostname(name) => f.write_str(name),
        }
    }
}

impl From<IpAddr> for Address {
    fn from(ip: IpAddr) -> Self {
        Address::Ip(ip)
    }
}

impl From<std::net::Ipv4Addr> for Address {
    fn from(ip: std::net::Ipv4Addr) -> Self {
        Address::Ip(IpAddr::V4(ip))
    }
}

impl FromStr for Address {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(ip) = s.parse::<IpAddr>() {
            return Ok(Address::Ip(ip));
        }
        if is_hostname(s) {
            return Ok(Address::Hostname(s.to_ascii_lowercase()));
        }
        Err(ConfigError::InvalidAddress {
            input: s.to_string(),
        })
    }
}

/// RFC 1123 style labels: alphanumerics and inner hyphens, dot separated.
fn is_hostname(s: &str) -> bool {
    if s.is_empty() || s.len() > 253 {
        return false;
    }
    s.trim_end_matches('.').split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

/// How an endpoint entered the record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    ArpDiscovered,
    PingDiscovered,
    WellKnownExternal,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Origin::ArpDiscovered => "arp",
            Origin::PingDiscovered => "ping",
            Origin::WellKnownExternal => "external",
        };
        f.write_str(s)
    }
}

/// What is known about the device behind an address.
///
/// A link-layer address learned from a reply and a descriptive label for a
/// configured endpoint are different things; absence is `None` on the
/// endpoint, never a placeholder string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PhysicalId {
    LinkLayer(MacAddr),
    Label(String),
}

impl fmt::Display for PhysicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicalId::LinkLayer(mac) => write!(f, "{mac}"),
            PhysicalId::Label(label) => f.write_str(label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub address: Address,
    pub physical_id: Option<PhysicalId>,
    pub origin: Origin,
}

impl Endpoint {
    pub fn arp(ip: IpAddr, mac: MacAddr) -> Self {
        Self {
            address: Address::Ip(ip),
            physical_id: Some(PhysicalId::LinkLayer(mac)),
            origin: Origin::ArpDiscovered,
        }
    }

    pub fn ping(ip: IpAddr) -> Self {
        Self {
            address: Address::Ip(ip),
            physical_id: None,
            origin: Origin::PingDiscovered,
        }
    }

    pub fn external(address: Address, label: impl Into<String>) -> Self {
        Self {
            address,
            physical_id: Some(PhysicalId::Label(label.into())),
            origin: Origin::WellKnownExternal,
        }
    }
}

/// Appends `incoming` to `merged`, skipping addresses already present.
///
/// The first occurrence of an address wins, so earlier sources keep their
/// origin and physical identifier.
pub fn merge_unique<I>(merged: &mut Vec<Endpoint>, incoming: I)
where
    I: IntoIterator<Item = Endpoint>,
{
    let mut seen: std::collections::HashSet<Address> =
        merged.iter().map(|e| e.address.clone()).collect();
    for endpoint in incoming {
        if seen.insert(endpoint.address.clone()) {
            merged.push(endpoint);
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

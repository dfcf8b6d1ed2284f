//! # Discovery Range Model
//!
//! A discovery range is one flat /24 segment identified by its first three
//! octets (`192.168.40`). Sweeps walk the 254 usable host suffixes, `.1`
//! through `.254`; the network and broadcast addresses are never probed.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::ConfigError;

/// Number of usable host addresses in a /24 sweep.
pub const HOST_COUNT: usize = 254;

const FIRST_HOST: u8 = 1;
const LAST_HOST: u8 = 254;
const SWEEP_PREFIX_LEN: u8 = 24;

/// Represents a continuous range of IPv4 addresses, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Range {
    pub start_addr: Ipv4Addr,
    pub end_addr: Ipv4Addr,
}

impl Ipv4Range {
    pub fn new(start_addr: Ipv4Addr, end_addr: Ipv4Addr) -> Self {
        Self {
            start_addr,
            end_addr,
        }
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Ipv4Addr> + Clone + use<> {
        let start: u32 = u32::from(self.start_addr);
        let end: u32 = u32::from(self.end_addr);
        (start..=end).map(Ipv4Addr::from)
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        let addr: u32 = u32::from(addr);
        u32::from(self.start_addr) <= addr && addr <= u32::from(self.end_addr)
    }
}

/// The subnet under scan.
///
/// Immutable once parsed. Both `"10.0.0"` and `"10.0.0.0/24"` are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiscoveryRange {
    octets: [u8; 3],
}

impl DiscoveryRange {
    pub fn new(a: u8, b: u8, c: u8) -> Self {
        Self { octets: [a, b, c] }
    }

    /// The prefix in dotted form, e.g. `192.168.40`.
    pub fn prefix(&self) -> String {
        let [a, b, c] = self.octets;
        format!("{a}.{b}.{c}")
    }

    pub fn host_count(&self) -> usize {
        HOST_COUNT
    }

    /// Usable host addresses, `P.1` through `P.254`, ascending.
    ///
    /// Every call returns a fresh iterator, so the sequence can be walked
    /// again without re-parsing the range.
    pub fn hosts(&self) -> impl DoubleEndedIterator<Item = Ipv4Addr> + Clone + use<> {
        self.host_range().iter()
    }

    pub fn host_range(&self) -> Ipv4Range {
        Ipv4Range::new(self.host(FIRST_HOST), self.host(LAST_HOST))
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.host_range().contains(addr)
    }

    pub fn network(&self) -> Ipv4Addr {
        self.host(0)
    }

    fn host(&self, suffix: u8) -> Ipv4Addr {
        let [a, b, c] = self.octets;
        Ipv4Addr::new(a, b, c, suffix)
    }
}

impl fmt::Display for DiscoveryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.0/{SWEEP_PREFIX_LEN}", self.prefix())
    }
}

impl FromStr for DiscoveryRange {
    type Err = ConfigError;

    /// Parses a three-octet prefix (`192.168.40`) or a /24 CIDR block
    /// (`192.168.40.0/24`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }

        match s.split_once('/') {
            Some((ip_str, prefix_str)) => parse_cidr(s, ip_str, prefix_str),
            None => parse_prefix(s),
        }
    }
}

fn parse_prefix(s: &str) -> Result<DiscoveryRange, ConfigError> {
    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() != 3 {
        return Err(ConfigError::OctetCount {
            input: s.to_string(),
            count: parts.len(),
        });
    }

    let mut octets = [0u8; 3];
    for (slot, part) in octets.iter_mut().zip(&parts) {
        *slot = parse_octet(s, part)?;
    }
    Ok(DiscoveryRange { octets })
}

fn parse_cidr(s: &str, ip_str: &str, prefix_str: &str) -> Result<DiscoveryRange, ConfigError> {
    let prefix_len = prefix_str
        .trim()
        .parse::<u8>()
        .map_err(|_| ConfigError::InvalidOctet {
            input: s.to_string(),
            octet: prefix_str.to_string(),
        })?;
    if prefix_len != SWEEP_PREFIX_LEN {
        return Err(ConfigError::UnsupportedPrefixLen { prefix_len });
    }

    let parts: Vec<&str> = ip_str.trim().split('.').collect();
    if parts.len() != 4 {
        return Err(ConfigError::OctetCount {
            input: s.to_string(),
            count: parts.len(),
        });
    }
    if parse_octet(s, parts[3])? != 0 {
        return Err(ConfigError::HostBitsSet {
            input: s.to_string(),
        });
    }
    parse_prefix(&parts[..3].join("."))
}

fn parse_octet(input: &str, part: &str) -> Result<u8, ConfigError> {
    part.parse::<u8>().map_err(|_| ConfigError::InvalidOctet {
        input: input.to_string(),
        octet: part.to_string(),
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

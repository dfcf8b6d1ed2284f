use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::network::endpoint::{Address, Endpoint};
use crate::network::range::DiscoveryRange;

/// Subnet swept when none is given.
pub const DEFAULT_PREFIX: &str = "192.168.40";

/// How long link-layer discovery waits for replies after broadcasting.
pub const ARP_WINDOW: Duration = Duration::from_secs(2);

/// Per-probe timeout for sweep and latency probes.
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(300);

/// Concurrent probes in flight during a sweep or latency pass.
pub const DEFAULT_WORKERS: usize = 32;

pub const EXTERNAL_LABEL: &str = "External server";

/// A statically configured endpoint measured on every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalEndpoint {
    pub address: Address,
    pub label: String,
}

impl ExternalEndpoint {
    pub fn new(address: Address, label: impl Into<String>) -> Self {
        Self {
            address,
            label: label.into(),
        }
    }

    pub fn to_endpoint(&self) -> Endpoint {
        Endpoint::external(self.address.clone(), self.label.clone())
    }
}

/// Parses `ADDR` or `ADDR=LABEL`; a missing or blank label becomes
/// [`EXTERNAL_LABEL`].
impl FromStr for ExternalEndpoint {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (address, label) = match s.split_once('=') {
            Some((address, label)) if !label.trim().is_empty() => (address, label.trim()),
            Some((address, _)) => (address, EXTERNAL_LABEL),
            None => (s, EXTERNAL_LABEL),
        };
        Ok(Self::new(address.parse()?, label))
    }
}

/// Two public resolvers and one hostname, so both literal and resolved
/// probing are exercised.
pub fn default_externals() -> Vec<ExternalEndpoint> {
    let public = |a, b, c, d| {
        ExternalEndpoint::new(
            Address::from(std::net::Ipv4Addr::new(a, b, c, d)),
            EXTERNAL_LABEL,
        )
    };
    vec![
        public(8, 8, 8, 8),
        public(1, 1, 1, 1),
        ExternalEndpoint::new(Address::Hostname("google.com".to_string()), EXTERNAL_LABEL),
    ]
}

/// Run configuration, built once and passed by reference to every stage.
#[derive(Debug, Clone)]
pub struct Config {
    pub range: DiscoveryRange,
    pub externals: Vec<ExternalEndpoint>,
    pub arp_window: Duration,
    pub probe_timeout: Duration,
    pub workers: usize,
    /// Skips link-layer discovery and goes straight to the sweep.
    pub skip_link_layer: bool,
    /// Console verbosity, 0 prints everything.
    pub quiet: u8,
}

impl Config {
    pub fn new(range: DiscoveryRange) -> Self {
        Self {
            range,
            externals: default_externals(),
            arp_window: ARP_WINDOW,
            probe_timeout: PROBE_TIMEOUT,
            workers: DEFAULT_WORKERS,
            skip_link_layer: false,
            quiet: 0,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers.max(1)
    }

    pub fn external_endpoints(&self) -> impl Iterator<Item = Endpoint> + '_ {
        self.externals.iter().map(ExternalEndpoint::to_endpoint)
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

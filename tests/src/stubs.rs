//! Stand-ins for the network-facing collaborators.
//!
//! Each stub answers from a fixed script and counts its calls, so tests can
//! assert both what a run produced and which strategies it touched.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use pnet::util::MacAddr;

use netdiag_common::network::endpoint::Endpoint;
use netdiag_common::network::range::DiscoveryRange;
use netdiag_core::{
    DiscoveryOutcome, LinkLayerDiscovery, Probes, ProbeRunner, SpeedTest, SweepDiscovery,
    Throughput, UnavailableReason,
};

pub const TIMED_OUT: &str = "Request timed out.";

pub fn echo_reply(address: &str, millis: f64) -> String {
    format!("Reply from {address}: bytes=32 time={millis}ms TTL=64")
}

pub struct StubLinkLayer {
    outcome: DiscoveryOutcome,
    calls: AtomicUsize,
}

impl StubLinkLayer {
    pub fn replying(replies: &[(Ipv4Addr, MacAddr)]) -> Self {
        let found = replies
            .iter()
            .map(|(addr, mac)| Endpoint::arp(IpAddr::V4(*addr), *mac))
            .collect();
        Self::with_outcome(DiscoveryOutcome::Succeeded(found))
    }

    pub fn empty() -> Self {
        Self::with_outcome(DiscoveryOutcome::Succeeded(Vec::new()))
    }

    pub fn unavailable(reason: UnavailableReason) -> Self {
        Self::with_outcome(DiscoveryOutcome::Unavailable(reason))
    }

    fn with_outcome(outcome: DiscoveryOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LinkLayerDiscovery for StubLinkLayer {
    async fn discover(&self, _: &DiscoveryRange) -> DiscoveryOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// Reports the listed addresses as reachable, everything else as silent.
pub struct StubSweep {
    reachable: Vec<Ipv4Addr>,
    calls: AtomicUsize,
}

impl StubSweep {
    pub fn reachable(reachable: &[Ipv4Addr]) -> Self {
        Self {
            reachable: reachable.to_vec(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn silent() -> Self {
        Self::reachable(&[])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SweepDiscovery for StubSweep {
    async fn sweep(&self, range: &DiscoveryRange) -> Vec<Endpoint> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        range
            .hosts()
            .filter(|addr| self.reachable.contains(addr))
            .map(|addr| Endpoint::ping(IpAddr::V4(addr)))
            .collect()
    }
}

enum Scripted {
    Output(String),
    Failure,
}

/// Probe runner with a per-address script; unscripted addresses time out.
pub struct StubRunner {
    script: HashMap<String, Scripted>,
    fail_by_default: bool,
    calls: AtomicUsize,
}

impl Default for StubRunner {
    fn default() -> Self {
        Self {
            script: HashMap::new(),
            fail_by_default: false,
            calls: AtomicUsize::new(0),
        }
    }
}

impl StubRunner {
    pub fn silent() -> Self {
        Self::default()
    }

    /// Every unscripted probe fails to launch.
    pub fn failing() -> Self {
        Self {
            fail_by_default: true,
            ..Self::default()
        }
    }

    pub fn output(mut self, address: &str, output: impl Into<String>) -> Self {
        self.script
            .insert(address.to_string(), Scripted::Output(output.into()));
        self
    }

    pub fn reply(self, address: &str, millis: f64) -> Self {
        let output = echo_reply(address, millis);
        self.output(address, output)
    }

    pub fn fail(mut self, address: &str) -> Self {
        self.script.insert(address.to_string(), Scripted::Failure);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProbeRunner for StubRunner {
    async fn echo(&self, address: &str, _: Duration) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script.get(address) {
            Some(Scripted::Output(output)) => Ok(output.clone()),
            Some(Scripted::Failure) => anyhow::bail!("could not launch probe to {address}"),
            None if self.fail_by_default => anyhow::bail!("could not launch probe to {address}"),
            None => Ok(TIMED_OUT.to_string()),
        }
    }
}

/// Speed-test client that returns a fixed result without touching the network.
pub struct StubSpeedTest {
    result: Option<Throughput>,
    calls: AtomicUsize,
}

impl StubSpeedTest {
    pub fn ok(throughput: Throughput) -> Self {
        Self {
            result: Some(throughput),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            result: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeedTest for StubSpeedTest {
    async fn run(&self) -> anyhow::Result<Throughput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
            .ok_or_else(|| anyhow::anyhow!("speed-test server unreachable"))
    }
}

/// Stub probes plus handles for inspecting their call counters.
pub struct StubSet {
    pub link_layer: Arc<StubLinkLayer>,
    pub sweep: Arc<StubSweep>,
    pub runner: Arc<StubRunner>,
}

impl StubSet {
    pub fn new(link_layer: StubLinkLayer, sweep: StubSweep, runner: StubRunner) -> Self {
        Self {
            link_layer: Arc::new(link_layer),
            sweep: Arc::new(sweep),
            runner: Arc::new(runner),
        }
    }

    pub fn probes(&self) -> Probes {
        Probes {
            link_layer: self.link_layer.clone(),
            sweep: self.sweep.clone(),
            runner: self.runner.clone(),
        }
    }
}

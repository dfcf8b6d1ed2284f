//! Unprivileged fallback: one echo request per host of the range.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use netdiag_common::network::endpoint::Endpoint;
use netdiag_common::network::range::DiscoveryRange;
use netdiag_protocols::ping;

use super::SweepDiscovery;
use crate::pool;
use crate::probe::ProbeRunner;

pub struct IcmpSweepProbe {
    runner: Arc<dyn ProbeRunner>,
    timeout: Duration,
    workers: usize,
}

impl IcmpSweepProbe {
    pub fn new(runner: Arc<dyn ProbeRunner>, timeout: Duration, workers: usize) -> Self {
        Self {
            runner,
            timeout,
            workers,
        }
    }
}

#[async_trait]
impl SweepDiscovery for IcmpSweepProbe {
    async fn sweep(&self, range: &DiscoveryRange) -> Vec<Endpoint> {
        let hosts: Vec<_> = range.hosts().collect();
        let runner = Arc::clone(&self.runner);
        let timeout = self.timeout;

        let slots = pool::run_slotted(hosts.clone(), self.workers, move |addr| {
            let runner = Arc::clone(&runner);
            async move {
                match runner.echo(&addr.to_string(), timeout).await {
                    // A success marker is enough, the time field may be absent.
                    Ok(output) => ping::parse(&output).is_echo(),
                    Err(e) => {
                        debug!("Sweep probe to {addr} failed: {e:#}");
                        false
                    }
                }
            }
        })
        .await;

        hosts
            .into_iter()
            .zip(slots)
            .filter(|(_, reachable)| *reachable == Some(true))
            .map(|(addr, _)| Endpoint::ping(IpAddr::V4(addr)))
            .collect()
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

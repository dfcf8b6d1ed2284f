use std::sync::Arc;
use std::time::Duration;

use netdiag_common::network::endpoint::Address;
use netdiag_common::report::LatencySample;
use netdiag_protocols::ping::{self, REPLY_PATTERNS, ReplyPattern};
use tracing::debug;

use crate::probe::ProbeRunner;

/// Measures one round trip per address through a [`ProbeRunner`].
///
/// Every failure mode (timeout, unreachable, spawn error, unparseable
/// output) collapses into an absent sample.
#[derive(Clone)]
pub struct LatencyMeasurer {
    runner: Arc<dyn ProbeRunner>,
    timeout: Duration,
    patterns: &'static [ReplyPattern],
}

impl LatencyMeasurer {
    pub fn new(runner: Arc<dyn ProbeRunner>, timeout: Duration) -> Self {
        Self {
            runner,
            timeout,
            patterns: REPLY_PATTERNS,
        }
    }

    pub fn with_patterns(mut self, patterns: &'static [ReplyPattern]) -> Self {
        self.patterns = patterns;
        self
    }

    pub async fn measure(&self, address: &Address) -> Option<f64> {
        let target = address.to_string();
        match self.runner.echo(&target, self.timeout).await {
            Ok(output) => ping::parse_with(&output, self.patterns).round_trip_ms(),
            Err(e) => {
                debug!("Probe to {target} failed: {e:#}");
                None
            }
        }
    }

    pub async fn sample(&self, address: &Address) -> LatencySample {
        self.measure(address)
            .await
            .map_or_else(LatencySample::no_reply, LatencySample::replied)
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

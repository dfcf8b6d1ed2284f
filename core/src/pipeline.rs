//! # Diagnostic Pipeline
//!
//! Discovery, then latency aggregation. Each stage hands an owned value to
//! the next, so stopping between stages leaves nothing half-built.

use std::sync::Arc;

use netdiag_common::config::Config;
use netdiag_common::report::DiagnosticReport;
use netdiag_common::success;
use tracing::info;

use crate::aggregator::DiagnosticAggregator;
use crate::discovery::arp::ArpDiscoveryProbe;
use crate::discovery::sweep::IcmpSweepProbe;
use crate::discovery::{DiscoveryCoordinator, LinkLayerDiscovery, StageHook, SweepDiscovery};
use crate::error::{RunError, Stage};
use crate::latency::LatencyMeasurer;
use crate::probe::{ProbeRunner, SystemPing};
use crate::signal::StopSignal;

/// The collaborators a run talks to the network through.
#[derive(Clone)]
pub struct Probes {
    pub link_layer: Arc<dyn LinkLayerDiscovery>,
    pub sweep: Arc<dyn SweepDiscovery>,
    pub runner: Arc<dyn ProbeRunner>,
}

impl Probes {
    /// Raw ARP plus the system `ping` utility.
    pub fn system(config: &Config) -> Self {
        let runner: Arc<dyn ProbeRunner> = Arc::new(SystemPing::default());
        Self {
            link_layer: Arc::new(ArpDiscoveryProbe::new(config.arp_window)),
            sweep: Arc::new(IcmpSweepProbe::new(
                Arc::clone(&runner),
                config.probe_timeout,
                config.workers(),
            )),
            runner,
        }
    }
}

pub struct Diagnostics<'a> {
    config: &'a Config,
    probes: Probes,
    on_stage: Option<StageHook>,
}

impl<'a> Diagnostics<'a> {
    pub fn new(config: &'a Config, probes: Probes) -> Self {
        Self {
            config,
            probes,
            on_stage: None,
        }
    }

    pub fn with_stage_hook(mut self, hook: StageHook) -> Self {
        self.on_stage = Some(hook);
        self
    }

    pub async fn run(&self, stop: &StopSignal) -> Result<DiagnosticReport, RunError> {
        info!("Diagnosing {}", self.config.range);

        let mut coordinator = DiscoveryCoordinator::new(
            self.config,
            Arc::clone(&self.probes.link_layer),
            Arc::clone(&self.probes.sweep),
        );
        if let Some(hook) = &self.on_stage {
            coordinator = coordinator.with_stage_hook(Arc::clone(hook));
        }
        let discovery = coordinator.discover(stop).await?;

        if let Some(hook) = &self.on_stage {
            hook(Stage::Aggregation);
        }
        let measurer = LatencyMeasurer::new(
            Arc::clone(&self.probes.runner),
            self.config.probe_timeout,
        );
        let report = DiagnosticAggregator::new(measurer, self.config.workers())
            .aggregate(discovery)
            .await;
        stop.checkpoint(Stage::Aggregation)?;

        success!(
            "Measured {} endpoints, {} replied",
            report.len(),
            report.replies()
        );
        Ok(report)
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

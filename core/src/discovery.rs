//! # Discovery Coordination
//!
//! Finds the endpoints of a run in two strictly ordered stages. Link-layer
//! discovery goes first; the sweep runs only when it was unavailable or came
//! back empty. The configured external endpoints are merged in last.
//!
//! Strategies report through a tagged [`DiscoveryOutcome`] and the
//! coordinator branches on the tag. No strategy error ever reaches the caller.

pub mod arp;
pub mod sweep;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use netdiag_common::config::Config;
use netdiag_common::network::endpoint::{Endpoint, merge_unique};
use netdiag_common::network::range::DiscoveryRange;
use netdiag_common::report::DiscoveryMethod;
use netdiag_common::success;

use crate::error::{RunError, Stage};
use crate::signal::StopSignal;

/// Called with each stage as it starts.
pub type StageHook = Arc<dyn Fn(Stage) + Send + Sync>;

/// Why link-layer discovery could not run on this host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnavailableReason {
    #[error("no broadcast-capable interface reaches {0}")]
    NoInterface(String),
    #[error("interface {0} has no MAC address")]
    NoMacAddress(String),
    #[error("permission denied opening a datalink channel")]
    PermissionDenied,
    #[error("datalink transport failed: {0}")]
    Transport(String),
    #[error("link-layer discovery disabled")]
    Disabled,
}

/// Result of a link-layer attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryOutcome {
    /// The exchange ran. The set may still be empty.
    Succeeded(Vec<Endpoint>),
    Unavailable(UnavailableReason),
}

#[async_trait]
pub trait LinkLayerDiscovery: Send + Sync {
    async fn discover(&self, range: &DiscoveryRange) -> DiscoveryOutcome;
}

#[async_trait]
pub trait SweepDiscovery: Send + Sync {
    /// Reachable hosts of `range`, in address order.
    async fn sweep(&self, range: &DiscoveryRange) -> Vec<Endpoint>;
}

/// Endpoints of one run and the strategy that found the local ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub method: DiscoveryMethod,
    pub endpoints: Vec<Endpoint>,
}

pub struct DiscoveryCoordinator<'a> {
    config: &'a Config,
    link_layer: Arc<dyn LinkLayerDiscovery>,
    sweep: Arc<dyn SweepDiscovery>,
    on_stage: Option<StageHook>,
}

impl<'a> DiscoveryCoordinator<'a> {
    pub fn new(
        config: &'a Config,
        link_layer: Arc<dyn LinkLayerDiscovery>,
        sweep: Arc<dyn SweepDiscovery>,
    ) -> Self {
        Self {
            config,
            link_layer,
            sweep,
            on_stage: None,
        }
    }

    pub fn with_stage_hook(mut self, hook: StageHook) -> Self {
        self.on_stage = Some(hook);
        self
    }

    /// Runs discovery and merges the external endpoints.
    ///
    /// Fails only when `stop` is raised at a stage boundary.
    pub async fn discover(&self, stop: &StopSignal) -> Result<Discovery, RunError> {
        let range = &self.config.range;

        let outcome = if self.config.skip_link_layer {
            DiscoveryOutcome::Unavailable(UnavailableReason::Disabled)
        } else {
            self.enter(Stage::LinkLayerDiscovery);
            self.link_layer.discover(range).await
        };
        stop.checkpoint(Stage::LinkLayerDiscovery)?;

        let (method, found) = match outcome {
            DiscoveryOutcome::Succeeded(found) if !found.is_empty() => {
                success!("{} hosts answered ARP on {range}", found.len());
                (DiscoveryMethod::LinkLayer, found)
            }
            DiscoveryOutcome::Succeeded(_) => {
                info!("No ARP replies on {range}, sweeping instead");
                self.run_sweep(range, stop).await?
            }
            DiscoveryOutcome::Unavailable(reason) => {
                info!("Sweeping {range}: {reason}");
                self.run_sweep(range, stop).await?
            }
        };

        let mut endpoints = Vec::with_capacity(found.len() + self.config.externals.len());
        merge_unique(&mut endpoints, found);
        merge_unique(&mut endpoints, self.config.external_endpoints());

        Ok(Discovery { method, endpoints })
    }

    async fn run_sweep(
        &self,
        range: &DiscoveryRange,
        stop: &StopSignal,
    ) -> Result<(DiscoveryMethod, Vec<Endpoint>), RunError> {
        self.enter(Stage::SweepDiscovery);
        let found = self.sweep.sweep(range).await;
        stop.checkpoint(Stage::SweepDiscovery)?;
        success!("{} hosts answered the sweep of {range}", found.len());
        Ok((DiscoveryMethod::Sweep, found))
    }

    fn enter(&self, stage: Stage) {
        if let Some(hook) = &self.on_stage {
            hook(stage);
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

use std::fmt;

use thiserror::Error;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LinkLayerDiscovery,
    SweepDiscovery,
    Aggregation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::LinkLayerDiscovery => "link-layer discovery",
            Stage::SweepDiscovery => "sweep discovery",
            Stage::Aggregation => "latency aggregation",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("run cancelled after {after}")]
    Cancelled { after: Stage },
}

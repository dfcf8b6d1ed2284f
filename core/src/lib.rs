pub mod aggregator;
pub mod discovery;
pub mod error;
pub mod latency;
pub mod pipeline;
pub mod pool;
pub mod probe;
pub mod signal;
pub mod speed;

pub use aggregator::DiagnosticAggregator;
pub use discovery::{
    Discovery, DiscoveryCoordinator, DiscoveryOutcome, LinkLayerDiscovery, StageHook,
    SweepDiscovery, UnavailableReason,
};
pub use error::{RunError, Stage};
pub use latency::LatencyMeasurer;
pub use pipeline::{Diagnostics, Probes};
pub use probe::{PlatformFamily, ProbeRunner, SystemPing};
pub use signal::StopSignal;
pub use speed::{SpeedTest, SpeedtestCli, Throughput, measure_throughput};

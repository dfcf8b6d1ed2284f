use netdiag_common::network::endpoint::Address;
use netdiag_common::report::{DiagnosticRecord, DiagnosticReport, LatencySample};
use tracing::debug;

use crate::discovery::Discovery;
use crate::latency::LatencyMeasurer;
use crate::pool;

/// Measures every discovered endpoint once and builds the report.
///
/// Endpoints without a reply stay in the report with an absent sample.
#[derive(Clone)]
pub struct DiagnosticAggregator {
    measurer: LatencyMeasurer,
    workers: usize,
}

impl DiagnosticAggregator {
    pub fn new(measurer: LatencyMeasurer, workers: usize) -> Self {
        Self { measurer, workers }
    }

    pub async fn aggregate(&self, discovery: Discovery) -> DiagnosticReport {
        let addresses: Vec<Address> = discovery
            .endpoints
            .iter()
            .map(|endpoint| endpoint.address.clone())
            .collect();

        let measurer = self.measurer.clone();
        let samples = pool::run_slotted(addresses, self.workers, move |address| {
            let measurer = measurer.clone();
            async move { measurer.sample(&address).await }
        })
        .await;

        let records: Vec<DiagnosticRecord> = discovery
            .endpoints
            .into_iter()
            .zip(samples)
            .map(|(endpoint, sample)| DiagnosticRecord {
                endpoint,
                sample: sample.unwrap_or_else(LatencySample::no_reply),
            })
            .collect();

        debug!(
            "Measured {} endpoints, {} replied",
            records.len(),
            records.iter().filter(|r| r.sample.is_reply()).count()
        );
        DiagnosticReport::new(discovery.method, records)
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

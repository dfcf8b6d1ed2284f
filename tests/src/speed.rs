#![cfg(test)]
use netdiag_common::config::Config;
use netdiag_common::network::range::DiscoveryRange;
use netdiag_core::{Diagnostics, StopSignal, Throughput, measure_throughput};

use crate::stubs::{StubLinkLayer, StubRunner, StubSet, StubSpeedTest, StubSweep};

const MEASURED: Throughput = Throughput {
    download_mbps: 87.31,
    upload_mbps: 19.6,
    server_rtt_ms: 11.2,
};

#[tokio::test]
async fn measured_throughput_is_passed_through() {
    let client = StubSpeedTest::ok(MEASURED);
    assert_eq!(measure_throughput(&client).await, Some(MEASURED));
    assert_eq!(client.calls(), 1);
}

/// A failed speed test leaves the finished report untouched.
#[tokio::test]
async fn failed_speed_test_keeps_report() {
    let cfg = Config::new(DiscoveryRange::new(10, 0, 0));
    let stubs = StubSet::new(
        StubLinkLayer::empty(),
        StubSweep::silent(),
        StubRunner::silent().reply("google.com", 12.0),
    );
    let report = Diagnostics::new(&cfg, stubs.probes())
        .run(&StopSignal::new())
        .await
        .unwrap();
    let before = report.records.clone();

    let client = StubSpeedTest::failing();
    assert_eq!(measure_throughput(&client).await, None);
    assert_eq!(client.calls(), 1);

    assert_eq!(report.records, before);
    assert_eq!(report.replies(), 1);
}

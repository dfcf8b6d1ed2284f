#![cfg(test)]
use std::collections::BTreeSet;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use pnet::util::MacAddr;

use netdiag_common::config::Config;
use netdiag_common::network::endpoint::{Address, Endpoint, Origin, merge_unique};
use netdiag_common::network::range::DiscoveryRange;
use netdiag_common::report::DiscoveryMethod;
use netdiag_core::{
    DiagnosticAggregator, Discovery, DiscoveryCoordinator, LatencyMeasurer, StopSignal,
};

use crate::stubs::{StubLinkLayer, StubRunner, StubSweep, TIMED_OUT};

#[test]
fn every_prefix_yields_254_ascending_hosts() {
    for range in [
        DiscoveryRange::new(10, 0, 0),
        DiscoveryRange::new(192, 168, 40),
        DiscoveryRange::new(255, 255, 255),
        DiscoveryRange::new(0, 0, 0),
    ] {
        let hosts: Vec<Ipv4Addr> = range.hosts().collect();
        assert_eq!(hosts.len(), 254, "{range}");
        assert_eq!(hosts.iter().collect::<BTreeSet<_>>().len(), 254);
        assert!(hosts.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(hosts[0].octets()[3], 1);
        assert_eq!(hosts[253].octets()[3], 254);
        // Restartable: a second walk sees the same sequence.
        assert!(range.hosts().eq(hosts.iter().copied()));
    }
}

#[test]
fn overlapping_sources_merge_first_wins() {
    let mac = MacAddr::new(0xaa, 0xbb, 0, 0, 0, 1);
    let ip = |d| IpAddr::V4(Ipv4Addr::new(10, 0, 0, d));

    let mut merged = Vec::new();
    merge_unique(&mut merged, vec![Endpoint::arp(ip(2), mac), Endpoint::arp(ip(4), mac)]);
    merge_unique(&mut merged, vec![Endpoint::ping(ip(4)), Endpoint::ping(ip(6))]);

    let origins: Vec<(String, Origin)> = merged
        .iter()
        .map(|e| (e.address.to_string(), e.origin))
        .collect();
    assert_eq!(
        origins,
        [
            ("10.0.0.2".to_string(), Origin::ArpDiscovered),
            ("10.0.0.4".to_string(), Origin::ArpDiscovered),
            ("10.0.0.6".to_string(), Origin::PingDiscovered),
        ]
    );
}

/// A swept host that is also a configured external appears once, as swept.
#[tokio::test]
async fn external_shadowed_by_discovered_host() {
    let cfg = Config::new(DiscoveryRange::new(8, 8, 8));
    let coordinator = DiscoveryCoordinator::new(
        &cfg,
        Arc::new(StubLinkLayer::empty()),
        Arc::new(StubSweep::reachable(&[Ipv4Addr::new(8, 8, 8, 8)])),
    );

    let found = coordinator.discover(&StopSignal::new()).await.unwrap();

    let eights: Vec<&Endpoint> = found
        .endpoints
        .iter()
        .filter(|e| e.address.to_string() == "8.8.8.8")
        .collect();
    assert_eq!(eights.len(), 1);
    assert_eq!(eights[0].origin, Origin::PingDiscovered);
    assert_eq!(found.endpoints.len(), 3);
}

#[tokio::test]
async fn measurer_is_total() {
    let outputs = [
        "Reply from 10.0.0.1: bytes=32 time=4ms TTL=64",
        "64 bytes from 10.0.0.1: icmp_seq=1 ttl=64 time=0.318 ms",
        TIMED_OUT,
        "",
        "TTL=",
        "time=abcms TTL=64",
        "time=-1ms TTL=64",
        "\u{fffd}\u{fffd} garbage \u{0}",
    ];
    for output in outputs {
        let runner = StubRunner::silent().output("10.0.0.1", output);
        let measurer = LatencyMeasurer::new(Arc::new(runner), Duration::from_millis(300));
        let result = measurer
            .measure(&Address::from(Ipv4Addr::new(10, 0, 0, 1)))
            .await;
        assert!(result.is_none_or(|ms| ms.is_finite() && ms >= 0.0), "{output:?}");
    }

    let measurer = LatencyMeasurer::new(
        Arc::new(StubRunner::silent().fail("10.0.0.1")),
        Duration::from_millis(300),
    );
    assert_eq!(
        measurer
            .measure(&Address::from(Ipv4Addr::new(10, 0, 0, 1)))
            .await,
        None
    );
}

#[tokio::test]
async fn aggregation_is_idempotent() {
    let runner = StubRunner::silent()
        .reply("10.0.0.3", 3.25)
        .reply("10.0.0.200", 41.0)
        .fail("10.0.0.9")
        .reply("google.com", 12.0);
    let measurer = LatencyMeasurer::new(Arc::new(runner), Duration::from_millis(300));
    let aggregator = DiagnosticAggregator::new(measurer, 3);

    let discovery = Discovery {
        method: DiscoveryMethod::Sweep,
        endpoints: [3u8, 9, 200, 17]
            .into_iter()
            .map(|d| Endpoint::ping(IpAddr::V4(Ipv4Addr::new(10, 0, 0, d))))
            .chain(std::iter::once(Endpoint::external(
                Address::Hostname("google.com".to_string()),
                "External server",
            )))
            .collect(),
    };

    let first = aggregator.aggregate(discovery.clone()).await;
    let second = aggregator.aggregate(discovery.clone()).await;

    assert_eq!(first.records, second.records);
    let endpoints: Vec<Endpoint> = first.records.iter().map(|r| r.endpoint.clone()).collect();
    assert_eq!(endpoints, discovery.endpoints);
    let latencies: Vec<Option<f64>> = first
        .records
        .iter()
        .map(|r| r.sample.round_trip_ms)
        .collect();
    assert_eq!(latencies, [Some(3.25), None, Some(41.0), None, Some(12.0)]);
}

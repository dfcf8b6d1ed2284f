#![cfg(test)]
use std::net::Ipv4Addr;

use pnet::util::MacAddr;

use netdiag_common::config::{Config, EXTERNAL_LABEL};
use netdiag_common::network::endpoint::{Origin, PhysicalId};
use netdiag_common::network::range::DiscoveryRange;
use netdiag_common::report::{DiagnosticReport, DiscoveryMethod};
use netdiag_core::{Diagnostics, RunError, Stage, StopSignal, UnavailableReason};

use crate::stubs::{StubLinkLayer, StubRunner, StubSet, StubSweep};

fn config() -> Config {
    Config::new(DiscoveryRange::new(10, 0, 0))
}

fn host(d: u8) -> Ipv4Addr {
    Ipv4Addr::new(10, 0, 0, d)
}

async fn run(cfg: &Config, stubs: &StubSet) -> DiagnosticReport {
    let result = Diagnostics::new(cfg, stubs.probes())
        .run(&StopSignal::new())
        .await;
    assert!(result.is_ok(), "Run failed: {:?}", result.as_ref().err());
    result.unwrap()
}

fn addresses(report: &DiagnosticReport) -> Vec<String> {
    report
        .records
        .iter()
        .map(|r| r.endpoint.address.to_string())
        .collect()
}

/// An ARP hit is final: the sweep never runs and the externals follow it.
#[tokio::test]
async fn arp_hit_skips_sweep() {
    let cfg = config();
    let mac = MacAddr::new(0xaa, 0xbb, 0, 0, 0, 0);
    let stubs = StubSet::new(
        StubLinkLayer::replying(&[(host(5), mac)]),
        StubSweep::reachable(&[host(7)]),
        StubRunner::silent(),
    );

    let report = run(&cfg, &stubs).await;

    assert_eq!(report.method, DiscoveryMethod::LinkLayer);
    assert_eq!(
        addresses(&report),
        ["10.0.0.5", "8.8.8.8", "1.1.1.1", "google.com"]
    );
    let first = &report.records[0].endpoint;
    assert_eq!(first.origin, Origin::ArpDiscovered);
    assert_eq!(first.physical_id, Some(PhysicalId::LinkLayer(mac)));
    assert_eq!(stubs.sweep.calls(), 0, "Sweep ran despite ARP replies");
}

/// An empty ARP result falls back to the sweep.
#[tokio::test]
async fn empty_arp_falls_back_to_sweep() {
    let cfg = config();
    let stubs = StubSet::new(
        StubLinkLayer::empty(),
        StubSweep::reachable(&[host(7)]),
        StubRunner::silent(),
    );

    let report = run(&cfg, &stubs).await;

    assert_eq!(report.method, DiscoveryMethod::Sweep);
    assert_eq!(report.len(), 4);
    let first = &report.records[0].endpoint;
    assert_eq!(first.address.to_string(), "10.0.0.7");
    assert_eq!(first.origin, Origin::PingDiscovered);
    assert_eq!(first.physical_id, None);
    assert_eq!(stubs.link_layer.calls(), 1);
    assert_eq!(stubs.sweep.calls(), 1);
}

/// Parsed round-trip times land on the right rows.
#[tokio::test]
async fn reply_times_reach_the_report() {
    let cfg = config();
    let stubs = StubSet::new(
        StubLinkLayer::empty(),
        StubSweep::reachable(&[host(7)]),
        StubRunner::silent()
            .output("10.0.0.7", "Reply ... time=23.4ms TTL=64")
            .output("8.8.8.8", "Reply ... time=23.4ms")
            .reply("google.com", 17.0),
    );

    let report = run(&cfg, &stubs).await;

    let latencies: Vec<Option<f64>> = report
        .records
        .iter()
        .map(|r| r.sample.round_trip_ms)
        .collect();
    assert_eq!(latencies, [Some(23.4), None, None, Some(17.0)]);
    assert_eq!(stubs.runner.calls(), 4);
}

/// Nothing answers and ARP cannot run: the externals still make a report.
#[tokio::test]
async fn all_probes_unreachable() {
    let cfg = config();
    let stubs = StubSet::new(
        StubLinkLayer::unavailable(UnavailableReason::PermissionDenied),
        StubSweep::silent(),
        StubRunner::failing(),
    );

    let report = run(&cfg, &stubs).await;

    assert_eq!(report.len(), 3);
    assert_eq!(report.replies(), 0);
    for record in &report.records {
        assert_eq!(record.endpoint.origin, Origin::WellKnownExternal);
        assert_eq!(
            record.endpoint.physical_id,
            Some(PhysicalId::Label(EXTERNAL_LABEL.to_string()))
        );
        assert!(!record.sample.is_reply());
    }
}

#[tokio::test]
async fn forced_sweep_never_touches_link_layer() {
    let mut cfg = config();
    cfg.skip_link_layer = true;
    let stubs = StubSet::new(
        StubLinkLayer::replying(&[(host(5), MacAddr::new(0xaa, 0xbb, 0, 0, 0, 0))]),
        StubSweep::reachable(&[host(9), host(3)]),
        StubRunner::silent(),
    );

    let report = run(&cfg, &stubs).await;

    assert_eq!(stubs.link_layer.calls(), 0);
    assert_eq!(&addresses(&report)[..2], ["10.0.0.3", "10.0.0.9"]);
}

#[tokio::test]
async fn configured_externals_follow_defaults() {
    let mut cfg = config();
    cfg.externals.push("9.9.9.9=Quad9".parse().unwrap());
    let stubs = StubSet::new(
        StubLinkLayer::empty(),
        StubSweep::silent(),
        StubRunner::silent().reply("9.9.9.9", 11.5),
    );

    let report = run(&cfg, &stubs).await;

    let last = report.records.last().unwrap();
    assert_eq!(last.endpoint.address.to_string(), "9.9.9.9");
    assert_eq!(
        last.endpoint.physical_id,
        Some(PhysicalId::Label("Quad9".to_string()))
    );
    assert_eq!(last.sample.round_trip_ms, Some(11.5));
}

#[tokio::test]
async fn stop_before_discovery_ends_cancels_run() {
    let cfg = config();
    let stubs = StubSet::new(
        StubLinkLayer::empty(),
        StubSweep::silent(),
        StubRunner::silent(),
    );
    let stop = StopSignal::new();
    stop.raise();

    let result = Diagnostics::new(&cfg, stubs.probes()).run(&stop).await;

    assert!(matches!(
        result,
        Err(RunError::Cancelled {
            after: Stage::LinkLayerDiscovery
        })
    ));
    assert_eq!(stubs.sweep.calls(), 0);
    assert_eq!(stubs.runner.calls(), 0);
}

/// Uses the real `ping` binary against loopback; skipped where it is missing.
#[tokio::test]
async fn system_ping_loopback() {
    use netdiag_common::network::endpoint::Address;
    use netdiag_core::{LatencyMeasurer, ProbeRunner, SystemPing};
    use std::sync::Arc;
    use std::time::Duration;

    let timeout = Duration::from_millis(500);
    let runner = Arc::new(SystemPing::default());
    let output = match runner.echo("127.0.0.1", timeout).await {
        Ok(output) if output.to_ascii_lowercase().contains("ttl=") => output,
        _ => {
            eprintln!("Skipping loopback probe: no usable ping utility.");
            return;
        }
    };

    let loopback = Address::from(Ipv4Addr::LOCALHOST);
    let measured = LatencyMeasurer::new(runner, timeout).measure(&loopback).await;
    assert!(
        measured.is_some_and(|ms| ms >= 0.0),
        "Echo reply without a usable time: {output}"
    );
}

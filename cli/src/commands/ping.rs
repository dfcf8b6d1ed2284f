use std::sync::Arc;
use std::time::Duration;

use colored::*;
use tracing::warn;

use crate::terminal::{colors, format, print};
use netdiag_common::{network::endpoint::Address, success};
use netdiag_core::{LatencyMeasurer, SystemPing};

pub async fn ping(address: Address, timeout: Duration) -> anyhow::Result<()> {
    print::header("measuring latency", 0);
    print::print_status(format!(
        "Sending one echo request to {}",
        address.to_string().color(colors::IPV4_ADDR)
    ));

    let measurer = LatencyMeasurer::new(Arc::new(SystemPing::default()), timeout);
    match measurer.measure(&address).await {
        Some(ms) => success!("{address} replied in {}", format::latency(Some(ms))),
        None => warn!("No reply from {address} within {} ms", timeout.as_millis()),
    }
    Ok(())
}

//! Link-layer discovery over a raw datalink channel.
//!
//! One ARP request goes out per host of the range, then replies are read for
//! a fixed window. Needs a capture-capable interface and usually root; every
//! failure to get one becomes [`DiscoveryOutcome::Unavailable`].

use std::collections::BTreeMap;
use std::io;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use async_trait::async_trait;
use pnet::datalink::{self, Channel, DataLinkReceiver, DataLinkSender, NetworkInterface};
use pnet::util::MacAddr;
use tracing::{debug, warn};

use netdiag_common::network::endpoint::Endpoint;
use netdiag_common::network::interface;
use netdiag_common::network::range::DiscoveryRange;
use netdiag_protocols::arp;

use super::{DiscoveryOutcome, LinkLayerDiscovery, UnavailableReason};

const READ_TIMEOUT: Duration = Duration::from_millis(50);

pub struct ArpDiscoveryProbe {
    window: Duration,
}

impl ArpDiscoveryProbe {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }
}

#[async_trait]
impl LinkLayerDiscovery for ArpDiscoveryProbe {
    async fn discover(&self, range: &DiscoveryRange) -> DiscoveryOutcome {
        let range = *range;
        let window = self.window;
        let joined = tokio::task::spawn_blocking(move || {
            discover_blocking(&range, window, &datalink::interfaces(), datalink::channel)
        })
        .await;

        let outcome = joined.unwrap_or_else(|e| {
            DiscoveryOutcome::Unavailable(UnavailableReason::Transport(e.to_string()))
        });
        if let DiscoveryOutcome::Unavailable(reason) = &outcome {
            warn!("ARP discovery unavailable: {reason}");
        }
        outcome
    }
}

/// Addressing used while talking on the wire.
struct ArpContext {
    src_mac: MacAddr,
    src_addr: Ipv4Addr,
    range: DiscoveryRange,
}

/// Selects an interface, opens a channel with `opener` and runs the exchange.
pub fn discover_blocking<F>(
    range: &DiscoveryRange,
    window: Duration,
    interfaces: &[NetworkInterface],
    opener: F,
) -> DiscoveryOutcome
where
    F: FnOnce(&NetworkInterface, datalink::Config) -> io::Result<Channel>,
{
    let Some(binding) = interface::select_for_range(interfaces, range) else {
        return DiscoveryOutcome::Unavailable(UnavailableReason::NoInterface(range.to_string()));
    };
    let Some(src_mac) = binding.interface.mac else {
        return DiscoveryOutcome::Unavailable(UnavailableReason::NoMacAddress(
            binding.interface.name.clone(),
        ));
    };

    let (mut tx, rx) = match open_eth_channel(&binding.interface, opener) {
        Ok(channel) => channel,
        Err(reason) => return DiscoveryOutcome::Unavailable(reason),
    };

    let ctx = ArpContext {
        src_mac,
        src_addr: binding.local_addr(),
        range: *range,
    };
    debug!(
        "ARP exchange on {} as {} ({src_mac})",
        binding.interface.name, ctx.src_addr
    );

    match exchange(tx.as_mut(), rx, &ctx, window) {
        Ok(found) => DiscoveryOutcome::Succeeded(found),
        Err(e) => DiscoveryOutcome::Unavailable(UnavailableReason::Transport(format!("{e:#}"))),
    }
}

fn open_eth_channel<F>(
    intf: &NetworkInterface,
    opener: F,
) -> Result<(Box<dyn DataLinkSender>, Box<dyn DataLinkReceiver>), UnavailableReason>
where
    F: FnOnce(&NetworkInterface, datalink::Config) -> io::Result<Channel>,
{
    let cfg = datalink::Config {
        read_timeout: Some(READ_TIMEOUT),
        ..Default::default()
    };
    match opener(intf, cfg) {
        Ok(Channel::Ethernet(tx, rx)) => Ok((tx, rx)),
        Ok(_) => Err(UnavailableReason::Transport(format!(
            "non-ethernet channel for {}",
            intf.name
        ))),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            Err(UnavailableReason::PermissionDenied)
        }
        Err(e) => Err(UnavailableReason::Transport(format!(
            "opening on {}: {e}",
            intf.name
        ))),
    }
}

fn exchange(
    tx: &mut dyn DataLinkSender,
    rx: Box<dyn DataLinkReceiver>,
    ctx: &ArpContext,
    window: Duration,
) -> anyhow::Result<Vec<Endpoint>> {
    let reader = FrameReader::spawn(rx).context("starting the ARP reader")?;

    for dst_addr in ctx.range.hosts().filter(|addr| *addr != ctx.src_addr) {
        let frame = arp::create_request(ctx.src_mac, ctx.src_addr, dst_addr)?;
        match tx.send_to(&frame, None) {
            Some(sent) => sent.with_context(|| format!("sending ARP request to {dst_addr}"))?,
            None => bail!("sender refused ARP request to {dst_addr}"),
        }
    }

    collect_replies(&reader, ctx, window)
}

/// Reads until `window` has elapsed, however long the backend blocks.
fn collect_replies(
    reader: &FrameReader,
    ctx: &ArpContext,
    window: Duration,
) -> anyhow::Result<Vec<Endpoint>> {
    // First MAC per address wins; BTreeMap keeps the output in address order.
    let mut replies: BTreeMap<Ipv4Addr, MacAddr> = BTreeMap::new();
    let deadline = Instant::now() + window;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        let frame = match reader.frames.recv_timeout(remaining) {
            Ok(Ok(frame)) => frame,
            Ok(Err(e)) => return Err(e).context("receiving ARP replies"),
            Err(RecvTimeoutError::Timeout) => break,
            Err(RecvTimeoutError::Disconnected) => bail!("ARP reader stopped unexpectedly"),
        };
        match arp::parse_reply(&frame) {
            Ok(Some(reply))
                if ctx.range.contains(reply.sender_addr) && reply.sender_addr != ctx.src_addr =>
            {
                replies.entry(reply.sender_addr).or_insert(reply.sender_mac);
            }
            Ok(_) => {}
            Err(e) => debug!("Dropping frame: {e}"),
        }
    }

    Ok(replies
        .into_iter()
        .map(|(addr, mac)| Endpoint::arp(IpAddr::V4(addr), mac))
        .collect())
}

/// Moves the blocking receive loop off the collecting thread.
///
/// Read timeouts are swallowed; any other receive error is forwarded once and
/// ends the thread. Dropping the reader asks the thread to stop at its next
/// timeout. A backend that never returns from `next()` keeps the thread
/// parked, but no longer holds up the caller.
struct FrameReader {
    frames: Receiver<io::Result<Vec<u8>>>,
    stop: Arc<AtomicBool>,
}

impl FrameReader {
    fn spawn(mut rx: Box<dyn DataLinkReceiver>) -> io::Result<Self> {
        let (sender, frames) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let stopped = Arc::clone(&stop);

        thread::Builder::new()
            .name("arp-reader".to_string())
            .spawn(move || {
                while !stopped.load(Ordering::Relaxed) {
                    let item = match rx.next() {
                        Ok(frame) => Ok(frame.to_vec()),
                        Err(e) if is_read_timeout(&e) => continue,
                        Err(e) => Err(e),
                    };
                    let failed = item.is_err();
                    if sender.send(item).is_err() || failed {
                        break;
                    }
                }
            })?;

        Ok(Self { frames, stop })
    }
}

impl Drop for FrameReader {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

fn is_read_timeout(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

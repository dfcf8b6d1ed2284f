pub mod diagnose;
pub mod ping;
pub mod range;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use netdiag_common::config::{self, Config, ExternalEndpoint};
use netdiag_common::network::endpoint::Address;
use netdiag_common::network::range::DiscoveryRange;

const TIMEOUT_MS: u64 = config::PROBE_TIMEOUT.as_millis() as u64;
const ARP_WINDOW_MS: u64 = config::ARP_WINDOW.as_millis() as u64;

#[derive(Parser)]
#[command(name = "netdiag", version)]
#[command(about = "LAN host discovery and latency diagnostics.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discover hosts on a /24 and measure latency to each of them
    #[command(alias = "d")]
    Diagnose(DiagnoseArgs),
    /// Measure latency to a single address
    #[command(alias = "p")]
    Ping {
        address: Address,
        /// Probe timeout in milliseconds
        #[arg(long, value_name = "MS", default_value_t = TIMEOUT_MS)]
        timeout: u64,
    },
    /// List the host addresses of a /24
    Range { prefix: DiscoveryRange },
}

#[derive(Args)]
pub struct DiagnoseArgs {
    /// Subnet prefix, `192.168.40` or `192.168.40.0/24`
    #[arg(default_value = config::DEFAULT_PREFIX)]
    pub prefix: DiscoveryRange,

    /// Probes in flight at once
    #[arg(short, long, default_value_t = config::DEFAULT_WORKERS)]
    pub workers: usize,

    /// Per-probe timeout in milliseconds
    #[arg(long, value_name = "MS", default_value_t = TIMEOUT_MS)]
    pub timeout: u64,

    /// How long to listen for ARP replies, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = ARP_WINDOW_MS)]
    pub arp_window: u64,

    /// Skip ARP and go straight to the ping sweep
    #[arg(long)]
    pub no_arp: bool,

    /// Additional external endpoint to measure, `ADDR` or `ADDR=LABEL`
    #[arg(long = "external", value_name = "ADDR[=LABEL]")]
    pub externals: Vec<ExternalEndpoint>,

    /// Directory the CSV report and latency chart are written to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Do not write a CSV report
    #[arg(long)]
    pub no_csv: bool,

    /// Do not write the latency chart
    #[arg(long)]
    pub no_chart: bool,

    /// Skip the internet speed test after the report
    #[arg(long)]
    pub no_speedtest: bool,

    /// Less output, repeat for even less
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,
}

impl DiagnoseArgs {
    pub fn to_config(&self) -> Config {
        let mut cfg = Config::new(self.prefix);
        cfg.externals.extend(self.externals.iter().cloned());
        cfg.arp_window = Duration::from_millis(self.arp_window);
        cfg.probe_timeout = Duration::from_millis(self.timeout);
        cfg.workers = self.workers;
        cfg.skip_link_layer = self.no_arp;
        cfg.quiet = self.quiet;
        cfg
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
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

//! Internet throughput through an external speed-test client.
//!
//! The measurement itself is delegated; this module only launches the client,
//! reads its JSON summary and turns a failure into a reported, absent result.

use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, bail};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::error;

pub const SPEED_TEST_DEADLINE: Duration = Duration::from_secs(120);

const BITS_PER_MEGABIT: f64 = 1_000_000.0;

/// Download and upload in Mbit/s, plus the round trip to the test server.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throughput {
    pub download_mbps: f64,
    pub upload_mbps: f64,
    pub server_rtt_ms: f64,
}

#[async_trait]
pub trait SpeedTest: Send + Sync {
    async fn run(&self) -> anyhow::Result<Throughput>;
}

/// Runs `speed_test` once. A failure is logged and yields `None`.
pub async fn measure_throughput(speed_test: &dyn SpeedTest) -> Option<Throughput> {
    match speed_test.run().await {
        Ok(throughput) => Some(throughput),
        Err(e) => {
            error!("Speed test failed: {e:#}");
            None
        }
    }
}

/// Runs `speedtest-cli --json`.
#[derive(Debug, Clone)]
pub struct SpeedtestCli {
    program: String,
    deadline: Duration,
}

impl Default for SpeedtestCli {
    fn default() -> Self {
        Self::new("speedtest-cli", SPEED_TEST_DEADLINE)
    }
}

impl SpeedtestCli {
    pub fn new(program: impl Into<String>, deadline: Duration) -> Self {
        Self {
            program: program.into(),
            deadline,
        }
    }
}

#[async_trait]
impl SpeedTest for SpeedtestCli {
    async fn run(&self) -> anyhow::Result<Throughput> {
        let mut command = Command::new(&self.program);
        command
            .arg("--json")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.deadline, command.output())
            .await
            .with_context(|| format!("{} exceeded {:?}", self.program, self.deadline))?
            .with_context(|| format!("failed to run {}", self.program))?;

        if !output.status.success() {
            bail!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        parse_report(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Fields of the client's JSON summary; rates are in bit/s.
#[derive(Debug, Deserialize)]
struct ClientReport {
    download: f64,
    upload: f64,
    ping: f64,
}

pub fn parse_report(json: &str) -> anyhow::Result<Throughput> {
    let report: ClientReport =
        serde_json::from_str(json.trim()).context("unrecognised speed-test output")?;
    Ok(Throughput {
        download_mbps: report.download / BITS_PER_MEGABIT,
        upload_mbps: report.upload / BITS_PER_MEGABIT,
        server_rtt_ms: report.ping,
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

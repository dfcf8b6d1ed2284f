//! Round-trip probe invocation.
//!
//! Both sweep discovery and latency measurement send a single echo request
//! through a [`ProbeRunner`]. The production runner shells out to the
//! platform `ping`, which works without raw-socket privileges; tests swap in
//! runners that return canned output.

use std::process::Stdio;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tokio::process::Command;

/// Hard floor for the outer deadline around one probe process.
const MIN_DEADLINE: Duration = Duration::from_secs(1);

#[async_trait]
pub trait ProbeRunner: Send + Sync {
    /// Sends one echo request to `address` and returns the probe's text output.
    async fn echo(&self, address: &str, timeout: Duration) -> anyhow::Result<String>;
}

/// Platform families with distinct `ping` command lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformFamily {
    /// `-w` takes milliseconds.
    Windows,
    /// iputils: `-W` takes whole seconds.
    Linux,
    /// macOS and the BSDs: `-W` takes milliseconds.
    Bsd,
}

impl PlatformFamily {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            PlatformFamily::Windows
        } else if cfg!(any(
            target_os = "macos",
            target_os = "freebsd",
            target_os = "openbsd",
            target_os = "netbsd"
        )) {
            PlatformFamily::Bsd
        } else {
            PlatformFamily::Linux
        }
    }

    pub fn echo_args(&self, address: &str, timeout: Duration) -> Vec<String> {
        let millis = timeout.as_millis().max(1);
        let (count_flag, wait_flag, wait) = match self {
            PlatformFamily::Windows => ("-n", "-w", millis.to_string()),
            PlatformFamily::Linux => ("-c", "-W", millis.div_ceil(1000).to_string()),
            PlatformFamily::Bsd => ("-c", "-W", millis.to_string()),
        };
        vec![
            count_flag.to_string(),
            "1".to_string(),
            wait_flag.to_string(),
            wait,
            address.to_string(),
        ]
    }
}

/// Runs the operating system's `ping` utility.
#[derive(Debug, Clone)]
pub struct SystemPing {
    program: String,
    family: PlatformFamily,
}

impl Default for SystemPing {
    fn default() -> Self {
        Self::new(PlatformFamily::current())
    }
}

impl SystemPing {
    pub fn new(family: PlatformFamily) -> Self {
        Self {
            program: "ping".to_string(),
            family,
        }
    }
}

#[async_trait]
impl ProbeRunner for SystemPing {
    async fn echo(&self, address: &str, timeout: Duration) -> anyhow::Result<String> {
        let deadline = timeout.max(MIN_DEADLINE);
        let mut command = Command::new(&self.program);
        command
            .args(self.family.echo_args(address, timeout))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let output = tokio::time::timeout(deadline, command.output())
            .await
            .with_context(|| format!("probe to {address} exceeded {deadline:?}"))?
            .with_context(|| format!("failed to run {}", self.program))?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
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

//! CSV persistence of a diagnostic report.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::Writer;
use netdiag_common::report::DiagnosticReport;

const HEADER: [&str; 4] = ["Address", "Physical ID", "Origin", "Latency (ms)"];

/// `diagnostic_<YYYYmmdd_HHMMSS>.csv`, keyed by the report's creation time.
pub fn file_name(report: &DiagnosticReport) -> String {
    format!("diagnostic_{}.csv", report.run_stamp())
}

/// Writes the report into `dir` and returns the file's path.
pub fn write_csv(report: &DiagnosticReport, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(file_name(report));
    let writer = Writer::from_path(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_records(report, writer)?;
    Ok(path)
}

/// Absent values become empty cells.
pub fn write_records<W: io::Write>(report: &DiagnosticReport, mut writer: Writer<W>) -> Result<()> {
    writer.write_record(HEADER)?;
    for row in report.rows() {
        let latency = row.latency_ms.map(|ms| ms.to_string()).unwrap_or_default();
        writer.write_record([
            row.address.as_str(),
            row.physical_id.as_deref().unwrap_or(""),
            row.origin.as_str(),
            latency.as_str(),
        ])?;
    }
    writer.flush().context("failed to flush CSV report")?;
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

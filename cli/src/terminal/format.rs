use std::net::IpAddr;

use colored::*;
use netdiag_common::report::ReportRow;

use crate::terminal::colors;

pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_REPLY: &str = "no reply";

const FAST_MS: f64 = 20.0;
const FAIR_MS: f64 = 100.0;

const INDEX_WIDTH: usize = 5;
const ADDRESS_WIDTH: usize = 17;
const PHYSICAL_WIDTH: usize = 19;
const ORIGIN_WIDTH: usize = 10;

pub fn physical_id_text(physical_id: Option<&str>) -> &str {
    physical_id.unwrap_or(NOT_AVAILABLE)
}

pub fn latency_text(latency_ms: Option<f64>) -> String {
    match latency_ms {
        Some(ms) => format!("{ms:.1} ms"),
        None => NO_REPLY.to_string(),
    }
}

pub fn table_head() -> String {
    let head = format!(
        "{:<INDEX_WIDTH$}{:<ADDRESS_WIDTH$}{:<PHYSICAL_WIDTH$}{:<ORIGIN_WIDTH$}{}",
        "#", "Address", "Physical ID", "Origin", "Latency"
    );
    format!("{}", head.color(colors::SEPARATOR).bold())
}

/// One report row, padded before coloring so escape codes do not skew columns.
pub fn table_row(idx: usize, row: &ReportRow) -> String {
    let index = format!("{:<INDEX_WIDTH$}", format!("[{idx}]")).color(colors::ACCENT);

    let address = format!("{:<ADDRESS_WIDTH$}", row.address);
    let address = if row.address.parse::<IpAddr>().is_ok() {
        address.color(colors::IPV4_ADDR)
    } else {
        address.color(colors::HOSTNAME)
    };

    let physical = format!(
        "{:<PHYSICAL_WIDTH$}",
        physical_id_text(row.physical_id.as_deref())
    );
    let physical = match row.physical_id.as_deref() {
        None => physical.dimmed(),
        Some(id) if is_mac(id) => physical.color(colors::MAC_ADDR),
        Some(_) => physical.color(colors::LABEL),
    };

    let origin = format!("{:<ORIGIN_WIDTH$}", row.origin).color(colors::TEXT_DEFAULT);

    format!(
        "{index}{address}{physical}{origin}{}",
        latency(row.latency_ms)
    )
}

pub fn latency(latency_ms: Option<f64>) -> ColoredString {
    let text = latency_text(latency_ms);
    match latency_ms {
        None => text.color(colors::NO_REPLY),
        Some(ms) if ms < FAST_MS => text.color(colors::LATENCY_FAST),
        Some(ms) if ms < FAIR_MS => text.color(colors::LATENCY_FAIR),
        Some(_) => text.color(colors::LATENCY_SLOW).bold(),
    }
}

fn is_mac(id: &str) -> bool {
    id.len() == 17 && id.split(':').count() == 6
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

//! # Diagnostic Report
//!
//! The record set a run hands to reporting collaborators: one latency sample
//! per endpoint, in discovery order, stamped with the creation time.

use std::fmt;

use chrono::{DateTime, Local};

use crate::network::endpoint::Endpoint;

/// Measured round-trip time, or its explicit absence.
///
/// `None` means no reply was observed. It is a data point, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LatencySample {
    pub round_trip_ms: Option<f64>,
}

impl LatencySample {
    pub fn replied(round_trip_ms: f64) -> Self {
        Self {
            round_trip_ms: Some(round_trip_ms),
        }
    }

    pub fn no_reply() -> Self {
        Self::default()
    }

    pub fn is_reply(&self) -> bool {
        self.round_trip_ms.is_some()
    }
}

/// Which discovery strategy produced the endpoints of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryMethod {
    LinkLayer,
    Sweep,
}

impl fmt::Display for DiscoveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryMethod::LinkLayer => f.write_str("ARP"),
            DiscoveryMethod::Sweep => f.write_str("ping sweep"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticRecord {
    pub endpoint: Endpoint,
    pub sample: LatencySample,
}

/// Flattened view of a record for tabular and CSV output.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub address: String,
    pub physical_id: Option<String>,
    pub origin: String,
    pub latency_ms: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct DiagnosticReport {
    pub created_at: DateTime<Local>,
    pub method: DiscoveryMethod,
    pub records: Vec<DiagnosticRecord>,
}

impl DiagnosticReport {
    pub fn new(method: DiscoveryMethod, records: Vec<DiagnosticRecord>) -> Self {
        Self {
            created_at: Local::now(),
            method,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn replies(&self) -> usize {
        self.records.iter().filter(|r| r.sample.is_reply()).count()
    }

    pub fn rows(&self) -> impl Iterator<Item = ReportRow> + '_ {
        self.records.iter().map(|record| ReportRow {
            address: record.endpoint.address.to_string(),
            physical_id: record.endpoint.physical_id.as_ref().map(ToString::to_string),
            origin: record.endpoint.origin.to_string(),
            latency_ms: record.sample.round_trip_ms,
        })
    }

    /// Timestamp used to key persisted artifacts, e.g. `20250101_093000`.
    pub fn run_stamp(&self) -> String {
        self.created_at.format("%Y%m%d_%H%M%S").to_string()
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

//! # Ping Reply Parser
//!
//! The system `ping` utility prints a reply line that differs by platform
//! family and locale. Each family is described by a [`ReplyPattern`]: the
//! marker whose presence proves a real echo reply came back, and the labels
//! that may precede the round-trip time. Supporting another variant means
//! adding a row to [`REPLY_PATTERNS`].
//!
//! ```text
//! Windows  Reply from 8.8.8.8: bytes=32 time=12ms TTL=117
//!          Respuesta desde 8.8.8.8: bytes=32 tiempo=12ms TTL=117
//!          Reply from 192.168.1.1: bytes=32 time<1ms TTL=64
//! Unix     64 bytes from 8.8.8.8: icmp_seq=1 ttl=117 time=12.3 ms
//! ```

/// One family of reply formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyPattern {
    pub success_marker: &'static str,
    pub time_labels: &'static [&'static str],
}

pub const WINDOWS_REPLY: ReplyPattern = ReplyPattern {
    success_marker: "TTL=",
    time_labels: &["time=", "tiempo=", "Zeit=", "time<", "tiempo<", "Zeit<"],
};

pub const UNIX_REPLY: ReplyPattern = ReplyPattern {
    success_marker: "ttl=",
    time_labels: &["time=", "tiempo="],
};

pub const REPLY_PATTERNS: &[ReplyPattern] = &[WINDOWS_REPLY, UNIX_REPLY];

/// What a probe's output says about the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reply {
    /// No success marker: timeout, unreachable, or unrecognised output.
    Silent,
    /// A reply was seen. The time is absent when no label could be parsed.
    Echo { round_trip_ms: Option<f64> },
}

impl Reply {
    pub fn is_echo(&self) -> bool {
        matches!(self, Reply::Echo { .. })
    }

    pub fn round_trip_ms(&self) -> Option<f64> {
        match self {
            Reply::Echo { round_trip_ms } => *round_trip_ms,
            Reply::Silent => None,
        }
    }
}

/// Classifies `output` against the default pattern table.
pub fn parse(output: &str) -> Reply {
    parse_with(output, REPLY_PATTERNS)
}

/// Classifies `output` against `patterns`, first matching marker wins.
pub fn parse_with(output: &str, patterns: &[ReplyPattern]) -> Reply {
    let Some(pattern) = patterns
        .iter()
        .find(|pattern| output.contains(pattern.success_marker))
    else {
        return Reply::Silent;
    };

    let round_trip_ms = pattern
        .time_labels
        .iter()
        .find_map(|label| extract_after(output, label));

    Reply::Echo { round_trip_ms }
}

fn extract_after(output: &str, label: &str) -> Option<f64> {
    let (_, rest) = output.split_once(label)?;
    let raw = match rest.find("ms") {
        Some(end) => &rest[..end],
        None => rest.split_whitespace().next()?,
    };
    parse_millis(raw)
}

/// Lenient number parsing: surrounding whitespace and a decimal comma are fine.
fn parse_millis(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().replace(',', ".").parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

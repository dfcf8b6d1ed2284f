//! # netdiag common
//!
//! Shared model for the diagnostic pipeline: endpoints, discovery ranges,
//! latency samples and the final report, plus the run configuration and the
//! interface selection helpers the link-layer probe relies on.

pub mod config;
pub mod error;
pub mod log;
pub mod network;
pub mod report;

#[doc(hidden)]
pub use tracing;

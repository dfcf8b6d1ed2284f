use thiserror::Error;

/// Raised while building the run configuration, before any probe is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("subnet prefix cannot be empty")]
    EmptyPrefix,
    #[error("subnet prefix '{input}' must have exactly three octets, found {count}")]
    OctetCount { input: String, count: usize },
    #[error("invalid octet '{octet}' in subnet prefix '{input}'")]
    InvalidOctet { input: String, octet: String },
    #[error("only /24 networks can be swept, got /{prefix_len}")]
    UnsupportedPrefixLen { prefix_len: u8 },
    #[error("network address '{input}' must end in .0")]
    HostBitsSet { input: String },
    #[error("invalid endpoint address '{input}'")]
    InvalidAddress { input: String },
}

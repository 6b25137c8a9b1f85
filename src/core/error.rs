use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by local AFM validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AfmError {
    /// Input is not exactly nine ASCII digits.
    #[error("AFM must consist of exactly 9 digits")]
    InvalidFormat,

    /// Input has the right shape but the check digit does not match.
    #[error("AFM check digit mismatch: expected {expected}, found {found}")]
    InvalidChecksum {
        /// Check digit computed from the first eight digits.
        expected: u8,
        /// Ninth digit as supplied.
        found: u8,
    },
}

impl AfmError {
    /// The error kind reported to callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidFormat => ErrorKind::InvalidFormat,
            Self::InvalidChecksum { .. } => ErrorKind::InvalidChecksum,
        }
    }
}

/// Classification of every way an AFM check can fail.
///
/// Serialized in SCREAMING_SNAKE_CASE (e.g. `"TRANSPORT_ERROR"`), which is
/// also the form used for `error_code` in error-outcome records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Input is not 9 digits.
    InvalidFormat,
    /// Correct shape, arithmetic check fails.
    InvalidChecksum,
    /// Network failure, timeout or non-success response from the registry.
    #[serde(rename = "TRANSPORT_ERROR")]
    Transport,
    /// Registry response could not be read as XML.
    #[serde(rename = "PARSE_ERROR")]
    Parse,
    /// Registry answered with an in-band error code.
    #[serde(rename = "REGISTRY_ERROR")]
    Registry,
}

impl ErrorKind {
    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidFormat => "INVALID_FORMAT",
            Self::InvalidChecksum => "INVALID_CHECKSUM",
            Self::Transport => "TRANSPORT_ERROR",
            Self::Parse => "PARSE_ERROR",
            Self::Registry => "REGISTRY_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

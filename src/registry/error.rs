use std::time::Duration;

use thiserror::Error;

use crate::core::ErrorKind;

/// Failure talking to the registry or reading its answer.
///
/// "Not found" and "inactive" are not errors: they come back as a
/// [`RegistryResult`](super::RegistryResult) with `valid == false` or
/// `status == Inactive`.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// Connection or protocol failure before a response was received.
    #[error("registry transport error: {0}")]
    Transport(String),

    /// No response within the configured timeout.
    #[error("registry request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The registry answered with a non-success HTTP status.
    #[error("registry returned HTTP {status}: {detail}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Fault reason or a prefix of the response body.
        detail: String,
    },

    /// The registry answered with a SOAP fault.
    #[error("registry fault: {0}")]
    Fault(String),

    /// The response body is not well-formed XML.
    #[error("registry response parse error: {0}")]
    Parse(String),

    /// The request envelope could not be written.
    #[error("request envelope error: {0}")]
    Envelope(String),
}

impl RegistryError {
    /// The error kind reported to callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(_) => ErrorKind::Parse,
            _ => ErrorKind::Transport,
        }
    }
}

//! # afm-check
//!
//! Validation of Greek tax identification numbers (AFM) with an optional
//! lookup against the GSIS registry service (RgWsPublic2).
//!
//! The checksum runs locally and rejects malformed identifiers without any
//! network traffic. Identifiers that pass are sent to the registry, whose
//! loosely structured SOAP answer is normalized into a stable record.
//!
//! ## Quick Start
//!
//! ```rust
//! use afm_check::core::*;
//!
//! assert!(is_valid_afm("090000045"));
//! assert_eq!(check_afm("090000046").unwrap_err().kind(), ErrorKind::InvalidChecksum);
//! assert_eq!(check_afm(" 090000045").unwrap_err(), AfmError::InvalidFormat);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | AFM checksum validation, error kinds |
//! | `registry` | SOAP client, response normalization, verification flow |
//! | `server` | axum HTTP surface and the `afm-server` binary |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "registry")]
pub mod registry;

#[cfg(feature = "server")]
pub mod server;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;

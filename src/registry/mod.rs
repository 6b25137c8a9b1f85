//! GSIS registry lookup (RgWsPublic2 SOAP service).
//!
//! Sends one SOAP 1.2 request per lookup and normalizes the answer into a
//! [`RegistryResult`]. Only checksum-valid identifiers should reach the
//! network; [`RegistryClient::verify`] enforces that.
//!
//! # Example
//!
//! ```ignore
//! use afm_check::registry::*;
//!
//! let client = RegistryClient::new(RegistryConfig::new(user, password))?;
//! let outcome = client.verify("090000045").await;
//! if outcome.is_confirmed() {
//!     println!("{:?} ({:?})", outcome.result.name, outcome.result.status);
//! }
//! ```

mod client;
mod config;
mod document;
mod envelope;
mod error;
mod result;
mod verify;

pub use client::RegistryClient;
pub use config::{DEFAULT_TIMEOUT, RegistryConfig};
pub use document::{FieldPath, XmlDocument, XmlNode};
pub use envelope::build_request;
pub use error::RegistryError;
pub use result::{FirmActivity, RegistryResult, RegistryStatus, TaxpayerDetails, is_active_marker};
pub use verify::Verification;

/// Production endpoint of the RgWsPublic2 service.
pub const DEFAULT_ENDPOINT: &str = "https://www1.gsis.gr/wsaade/RgWsPublic2/RgWsPublic2";

/// Content type of SOAP 1.2 requests.
pub const SOAP_CONTENT_TYPE: &str = "application/soap+xml;charset=UTF-8";

/// `deactivation_flag_descr` value for an active AFM.
pub const ACTIVE_MARKER: &str = "ΕΝΕΡΓΟΣ ΑΦΜ";

/// `deactivation_flag_descr` value for a deactivated AFM.
pub const INACTIVE_MARKER: &str = "ΑΠΕΝΕΡΓΟΠΟΙΗΜΕΝΟΣ ΑΦΜ";

/// Namespace URIs used by the request envelope.
pub mod rg_ns {
    pub const ENV: &str = "http://www.w3.org/2003/05/soap-envelope";
    pub const WSSE: &str =
        "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd";
    pub const SERVICE: &str = "http://rgwspublic2/RgWsPublic2Service";
    pub const TYPES: &str = "http://rgwspublic2/RgWsPublic2";
}

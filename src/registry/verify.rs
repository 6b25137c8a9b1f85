use serde::{Deserialize, Serialize};

use super::error::RegistryError;
use super::result::RegistryResult;
use crate::core::{AfmError, ErrorKind};

/// Combined outcome of the checksum and the registry lookup.
///
/// Serializes as a flat object: the verification fields followed by the
/// fields of the embedded [`RegistryResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    /// The identifier as checked. Named apart from the registry's `afm`,
    /// which shares the flattened object.
    pub checked_afm: String,
    /// Whether the identifier passed the local checksum.
    pub checksum_valid: bool,
    /// Why the identifier could not be confirmed, if it was not.
    pub error_kind: Option<ErrorKind>,
    /// Human-readable detail for `error_kind`.
    pub detail: Option<String>,
    #[serde(flatten)]
    pub result: RegistryResult,
}

impl Verification {
    /// Outcome for an identifier that failed local validation.
    pub fn rejected(afm: &str, error: &AfmError) -> Self {
        Self {
            checked_afm: afm.to_string(),
            checksum_valid: false,
            error_kind: Some(error.kind()),
            detail: Some(error.to_string()),
            result: RegistryResult::default(),
        }
    }

    /// Outcome for a checksum-valid identifier given the registry answer.
    pub fn from_query(afm: &str, outcome: Result<RegistryResult, RegistryError>) -> Self {
        let (error_kind, detail, result) = match outcome {
            Ok(result) if result.has_error() => {
                let detail = result
                    .error_descr
                    .clone()
                    .or_else(|| result.error_code.clone());
                (Some(ErrorKind::Registry), detail, result)
            }
            Ok(result) => (None, None, result),
            Err(e) => (
                Some(e.kind()),
                Some(e.to_string()),
                RegistryResult::from(&e),
            ),
        };
        Self {
            checked_afm: afm.to_string(),
            checksum_valid: true,
            error_kind,
            detail,
            result,
        }
    }

    /// The simple yes/no answer: checksum passed and the registry confirmed
    /// the identifier. Every failure counts as `false`.
    pub fn is_confirmed(&self) -> bool {
        self.checksum_valid && self.result.valid
    }
}

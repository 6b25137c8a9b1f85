//! HTTP client for the registry service.

use reqwest::header::CONTENT_TYPE;

use super::config::RegistryConfig;
use super::document::XmlDocument;
use super::envelope::build_request;
use super::error::RegistryError;
use super::result::{RegistryResult, fault_reason};
use super::verify::Verification;
use super::SOAP_CONTENT_TYPE;

/// Longest slice of an error body carried into `RegistryError::Status`.
const MAX_ERROR_DETAIL: usize = 256;

/// Client for the registry's AFM lookup method.
///
/// Cheap to clone; clones share the underlying connection pool. Each call is
/// independent and issues exactly one request. There are no retries.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    config: RegistryConfig,
    http: reqwest::Client,
}

impl RegistryClient {
    /// Create a client. The config timeout bounds every request.
    ///
    /// # Errors
    ///
    /// `RegistryError::Transport` if the HTTP client cannot be built
    /// (e.g. TLS backend initialization failure).
    pub fn new(config: RegistryConfig) -> Result<Self, RegistryError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RegistryError::Transport(e.to_string()))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Query the registry about `afm`.
    ///
    /// `afm` is expected to have passed the checksum already; use
    /// [`verify`](Self::verify) to run both steps.
    ///
    /// # Errors
    ///
    /// `Timeout`, `Transport` and `Status` for network-level failures,
    /// `Fault` for SOAP faults, `Parse` for bodies that are not XML.
    /// "Not found" and "inactive" are regular results.
    pub async fn query(&self, afm: &str) -> Result<RegistryResult, RegistryError> {
        let envelope = build_request(&self.config, afm)?;

        tracing::debug!(afm, endpoint = %self.config.endpoint, "querying registry");

        let resp = self
            .http
            .post(&self.config.endpoint)
            .header(CONTENT_TYPE, SOAP_CONTENT_TYPE)
            .body(envelope)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let detail = XmlDocument::parse(&body)
                .ok()
                .and_then(|doc| fault_reason(&doc.root))
                .unwrap_or_else(|| truncate(&body, MAX_ERROR_DETAIL).to_string());
            tracing::warn!(afm, status = status.as_u16(), %detail, "registry returned error status");
            return Err(RegistryError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let result = RegistryResult::from_response(&body).inspect_err(|e| {
            tracing::warn!(afm, error = %e, "unusable registry response");
        })?;

        tracing::debug!(
            afm,
            valid = result.valid,
            status = ?result.status,
            error_code = result.error_code.as_deref(),
            "registry answered"
        );
        Ok(result)
    }

    /// Like [`query`](Self::query), but failures become an error-outcome
    /// record instead of an `Err`.
    pub async fn query_outcome(&self, afm: &str) -> RegistryResult {
        match self.query(afm).await {
            Ok(result) => result,
            Err(e) => RegistryResult::from(&e),
        }
    }

    /// Validate the checksum of `afm` and, only if it passes, query the
    /// registry.
    pub async fn verify(&self, afm: &str) -> Verification {
        if let Err(e) = crate::core::check_afm(afm) {
            tracing::debug!(afm, error = %e, "rejected before registry lookup");
            return Verification::rejected(afm, &e);
        }
        Verification::from_query(afm, self.query(afm).await)
    }

    fn transport_error(&self, e: reqwest::Error) -> RegistryError {
        let err = if e.is_timeout() {
            RegistryError::Timeout(self.config.timeout)
        } else {
            RegistryError::Transport(e.to_string())
        };
        tracing::warn!(endpoint = %self.config.endpoint, error = %err, "registry request failed");
        err
    }
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("abc", 10), "abc");
        assert_eq!(truncate("abcdef", 3), "abc");
        // 'Α' is two bytes in UTF-8
        assert_eq!(truncate("ΑΒΓ", 3), "Α");
    }

    #[test]
    fn client_keeps_config() {
        let cfg = RegistryConfig::new("u", "p").endpoint("http://127.0.0.1:1/rg");
        let client = RegistryClient::new(cfg).unwrap();
        assert_eq!(client.config().endpoint, "http://127.0.0.1:1/rg");
    }
}

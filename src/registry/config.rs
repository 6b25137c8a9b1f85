use std::fmt;
use std::time::Duration;

use super::DEFAULT_ENDPOINT;

/// Default bound on a single registry call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Connection settings and credentials for the registry service.
///
/// Built once by the caller and handed to
/// [`RegistryClient::new`](super::RegistryClient::new).
#[derive(Clone)]
pub struct RegistryConfig {
    /// Service URL.
    pub endpoint: String,
    /// WS-Security username.
    pub username: String,
    /// WS-Security password.
    pub password: String,
    /// AFM of the caller, sent as `afm_called_by` when set.
    pub caller_afm: Option<String>,
    /// Bound on the whole request, connect to last body byte.
    pub timeout: Duration,
}

impl RegistryConfig {
    /// Config for the default endpoint with the given credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            username: username.into(),
            password: password.into(),
            caller_afm: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn caller_afm(mut self, afm: impl Into<String>) -> Self {
        self.caller_afm = Some(afm.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `true` when both username and password are non-empty.
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for RegistryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryConfig")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("caller_afm", &self.caller_afm)
            .field("timeout", &self.timeout)
            .finish()
    }
}

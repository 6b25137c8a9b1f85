use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::Parser;

use crate::registry::{DEFAULT_ENDPOINT, RegistryConfig};

/// AFM lookup service.
///
/// Every option can also be set through the environment variable shown.
#[derive(Debug, Clone, Parser)]
#[command(name = "afm-server", version, about)]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Address to bind.
    #[arg(long, env = "AFM_BIND_ADDR", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind: IpAddr,

    /// Registry service URL.
    #[arg(long, env = "AFM_REGISTRY_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Registry username.
    #[arg(long, env = "AFM_REGISTRY_USERNAME", default_value = "", hide_env_values = true)]
    pub username: String,

    /// Registry password.
    #[arg(long, env = "AFM_REGISTRY_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// AFM of the calling organization, sent as `afm_called_by`.
    #[arg(long, env = "AFM_CALLER")]
    pub caller_afm: Option<String>,

    /// Registry request timeout in seconds.
    #[arg(long, env = "AFM_REGISTRY_TIMEOUT_SECS", default_value_t = 15)]
    pub timeout_secs: u64,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, env = "AFM_VERBOSE")]
    pub verbose: bool,
}

impl ServerConfig {
    /// Registry settings derived from this configuration.
    pub fn registry(&self) -> RegistryConfig {
        let mut cfg = RegistryConfig::new(&self.username, &self.password)
            .endpoint(&self.endpoint)
            .timeout(Duration::from_secs(self.timeout_secs));
        if let Some(caller) = self.caller_afm.as_deref().filter(|c| !c.is_empty()) {
            cfg = cfg.caller_afm(caller);
        }
        cfg
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Default tracing filter directive.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

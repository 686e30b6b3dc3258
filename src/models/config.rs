//! Configuration model loaded from external sources.

use serde::Deserialize;

fn default_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_smtp_timeout_secs() -> u64 {
    60
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Shared bearer token gating `/api/send-email`. Must be non-empty.
    pub relay_secret: String,
    /// Overall socket timeout applied to outbound SMTP connections.
    #[serde(default = "default_smtp_timeout_secs")]
    pub smtp_timeout_secs: u64,
}

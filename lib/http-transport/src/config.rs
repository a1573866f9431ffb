use std::time::Duration;

use serde::Deserialize;

/// The `User-Agent` sent when nothing else is configured.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Settings handed to whichever transport gets selected.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransportConfig {
    /// Added to every request that doesn't set its own `User-Agent`.
    pub user_agent: String,
    /// Only used by the native transport.
    pub connect_timeout: Option<Duration>,
    /// Only used by the native transport.
    pub request_timeout: Option<Duration>,
}

impl TransportConfig {
    pub fn new() -> Self {
        TransportConfig::default()
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            user_agent: USER_AGENT.to_string(),
            connect_timeout: None,
            request_timeout: None,
        }
    }
}

use serde::Deserialize;
use shared::config::{Listener, ListenerError, UpstreamClient};
use thiserror::Error;
use url::Url;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid listener: {0}")]
    Listener(#[from] ListenerError),

    #[error("Upstream must be an http or https URL, got scheme {0}")]
    UnsupportedScheme(String),

    #[error("Upstream URL must not carry a query string")]
    UpstreamHasQuery,
}

/// Helpdesk relay configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Main listener for incoming requests
    pub listener: Listener,
    /// Admin listener for health endpoints
    pub admin_listener: Listener,
    /// Base URL of the helpdesk API. The inbound path and query are appended to it.
    pub upstream: Url,
    #[serde(default)]
    pub client: UpstreamClient,
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.listener.validate()?;
        self.admin_listener.validate()?;

        match self.upstream.scheme() {
            "http" | "https" => {}
            other => return Err(ValidationError::UnsupportedScheme(other.to_string())),
        }
        if self.upstream.query().is_some() {
            return Err(ValidationError::UpstreamHasQuery);
        }

        Ok(())
    }
}

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ListenerError {
    #[error("Port cannot be 0")]
    InvalidPort,

    #[error("Listener host cannot be empty")]
    EmptyHost,
}

/// Network listener configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Listener {
    /// Host address to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    /// Port number to listen on
    pub port: u16,
}

impl Listener {
    pub fn validate(&self) -> Result<(), ListenerError> {
        if self.host.is_empty() {
            return Err(ListenerError::EmptyHost);
        }
        if self.port == 0 {
            return Err(ListenerError::InvalidPort);
        }
        Ok(())
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// Settings for the outbound HTTP client of a relay.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct UpstreamClient {
    /// Applies to the whole outbound call, body included.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Skips TLS certificate verification on outbound calls.
    ///
    /// Off unless explicitly enabled; a warning is logged whenever a client is
    /// built with it.
    #[serde(default)]
    pub danger_accept_invalid_certs: bool,
}

impl Default for UpstreamClient {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            danger_accept_invalid_certs: false,
        }
    }
}

impl UpstreamClient {
    /// Builds the client. `follow_redirects` is false where the relay needs to
    /// see the 3xx itself.
    pub fn build(&self, follow_redirects: bool) -> Result<reqwest::Client, reqwest::Error> {
        let redirect = if follow_redirects {
            reqwest::redirect::Policy::default()
        } else {
            reqwest::redirect::Policy::none()
        };

        if self.danger_accept_invalid_certs {
            tracing::warn!("TLS certificate verification is disabled for upstream calls");
        }

        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .redirect(redirect)
            .danger_accept_invalid_certs(self.danger_accept_invalid_certs)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listener_validation() {
        let listener = Listener {
            host: "0.0.0.0".into(),
            port: 3000,
        };
        assert!(listener.validate().is_ok());

        let zero_port = Listener {
            port: 0,
            ..listener.clone()
        };
        assert_eq!(zero_port.validate(), Err(ListenerError::InvalidPort));

        let no_host = Listener {
            host: "".into(),
            ..listener
        };
        assert_eq!(no_host.validate(), Err(ListenerError::EmptyHost));
    }

    #[test]
    fn test_upstream_client_defaults() {
        let parsed: UpstreamClient = serde_yaml::from_str("{}").unwrap();
        assert_eq!(parsed, UpstreamClient::default());
        assert_eq!(parsed.timeout_secs, 30);
        assert!(!parsed.danger_accept_invalid_certs);

        let parsed: UpstreamClient =
            serde_yaml::from_str("{timeout_secs: 5, danger_accept_invalid_certs: true}").unwrap();
        assert_eq!(parsed.timeout_secs, 5);
        assert!(parsed.danger_accept_invalid_certs);
        assert!(parsed.build(false).is_ok());
    }
}

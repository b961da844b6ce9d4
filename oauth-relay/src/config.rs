use serde::Deserialize;
use shared::config::{Listener, ListenerError, UpstreamClient};
use std::collections::HashMap;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid listener: {0}")]
    Listener(#[from] ListenerError),

    #[error("At least one environment must be configured")]
    NoEnvironments,

    #[error("Empty environment selector")]
    EmptySelector,

    #[error("Environment selector {0} cannot contain '_'")]
    SelectorWithUnderscore(String),

    #[error("Environment {0} must use an http or https URL")]
    UnsupportedScheme(String),

    #[error("Empty host in authorize_allowed_hosts")]
    EmptyAllowedHost,
}

/// OAuth relay configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Main listener for incoming requests
    pub listener: Listener,
    /// Admin listener for health endpoints
    pub admin_listener: Listener,
    /// Maps environment selectors to the base URL of that environment's OAuth backend
    ///
    /// The selector is the token prefix before the first '_', so selectors
    /// themselves cannot contain one.
    pub environments: HashMap<String, Url>,
    /// Hosts `/oauth/authorize` may be proxied to. Unrestricted when absent.
    #[serde(default)]
    pub authorize_allowed_hosts: Option<Vec<String>>,
    #[serde(default)]
    pub client: UpstreamClient,
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.listener.validate()?;
        self.admin_listener.validate()?;

        if self.environments.is_empty() {
            return Err(ValidationError::NoEnvironments);
        }
        for (selector, url) in &self.environments {
            if selector.is_empty() {
                return Err(ValidationError::EmptySelector);
            }
            if selector.contains('_') {
                return Err(ValidationError::SelectorWithUnderscore(selector.clone()));
            }
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ValidationError::UnsupportedScheme(selector.clone()));
            }
        }

        if let Some(hosts) = &self.authorize_allowed_hosts
            && hosts.iter().any(|h| h.is_empty())
        {
            return Err(ValidationError::EmptyAllowedHost);
        }

        Ok(())
    }
}

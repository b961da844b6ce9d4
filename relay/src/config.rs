use helpdesk_relay::config::Config as HelpdeskRelayConfig;
use oauth_relay::config::Config as OauthRelayConfig;
use serde::Deserialize;
use std::fs::File;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct MetricsConfig {
    pub statsd_host: String,
    pub statsd_port: u16,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Error events are reported to Sentry when set.
    #[serde(default)]
    pub sentry_dsn: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct CommonConfig {
    pub metrics: Option<MetricsConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    #[serde(flatten)]
    pub common: CommonConfig,
    pub helpdesk_relay: Option<HelpdeskRelayConfig>,
    pub oauth_relay: Option<OauthRelayConfig>,
}

impl Config {
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let data = serde_yaml::from_reader(file)?;

        Ok(data)
    }

    pub fn sentry_dsn(&self) -> Option<&str> {
        self.common.logging.as_ref()?.sentry_dsn.as_deref()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("config has no {0} section")]
    MissingSection(&'static str),
    #[error("invalid helpdesk_relay config: {0}")]
    HelpdeskRelay(#[from] helpdesk_relay::config::ValidationError),
    #[error("invalid oauth_relay config: {0}")]
    OauthRelay(#[from] oauth_relay::config::ValidationError),
}

use http::StatusCode;
use std::io;

#[derive(thiserror::Error, Debug)]
pub enum OauthRelayError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("could not build upstream client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to read request body: {0}")]
    RequestBody(String),

    #[error("invalid gateway event: {0}")]
    InvalidEvent(String),

    #[error("unsupported path {0}")]
    UnsupportedPath(String),

    #[error("request has no authorization header")]
    MissingAuthorization,

    #[error("request has no grant_type")]
    MissingGrantType,

    /// No backend environment could be derived from the grant. Carries the
    /// refresh token when one was supplied, since the error body echoes it.
    #[error("grant does not name a known environment")]
    InvalidGrant { refresh_token: Option<String> },

    #[error("request has no proxy_url")]
    MissingProxyUrl,

    #[error("invalid proxy_url: {0}")]
    InvalidProxyUrl(#[source] url::ParseError),

    #[error("proxy_url host {0} is not allowed")]
    ProxyHostNotAllowed(String),

    #[error("invalid upstream URL: {0}")]
    InvalidTarget(#[source] url::ParseError),

    #[error("upstream request failed: {0}")]
    UpstreamRequest(#[source] reqwest::Error),

    #[error("authorize endpoint answered {0} without a Location header")]
    MissingLocation(StatusCode),
}

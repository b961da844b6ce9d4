use std::io;

#[derive(thiserror::Error, Debug)]
pub enum HelpdeskRelayError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("could not build upstream client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to read request body: {0}")]
    RequestBody(String),

    #[error("multipart body has no blank line ending its preamble")]
    MissingMultipartPreamble,

    #[error("invalid Data-Length header: {0}")]
    InvalidDataLength(String),

    #[error("invalid upstream URL: {0}")]
    InvalidUpstreamUrl(#[from] url::ParseError),

    #[error("upstream request failed: {0}")]
    UpstreamRequest(#[source] reqwest::Error),

    #[error("upstream responded with status {0}")]
    UpstreamStatus(http::StatusCode),
}

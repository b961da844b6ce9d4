use crate::authorization::rewrite_authorization;
use crate::errors::HelpdeskRelayError;
use crate::metrics_defs::{REQUESTS, UPSTREAM_DURATION};
use crate::multipart::{extract_payload, parse_data_length};
use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName};
use http::{Request, Response, StatusCode, Uri};
use serde::Serialize;
use serde::de::IgnoredAny;
use shared::config::UpstreamClient;
use shared::http::json_response;
use std::time::Instant;
use url::Url;

/// Content type of file uploads sent to the helpdesk.
pub const UPLOAD_CONTENT_TYPE: &str = "application/binary";
/// Content type of every other request sent to the helpdesk.
pub const FORWARD_CONTENT_TYPE: &str = "application/json;charset=UTF-8";
/// Content type of every response returned by the relay.
pub const RESPONSE_CONTENT_TYPE: &str = "text/json;charset=UTF-8";

static DATA_LENGTH: HeaderName = HeaderName::from_static("data-length");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Branch {
    Upload,
    Forward,
}

impl Branch {
    fn of(headers: &HeaderMap) -> Self {
        let is_multipart = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("multipart/form-data"));
        if is_multipart {
            Branch::Upload
        } else {
            Branch::Forward
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Branch::Upload => "upload",
            Branch::Forward => "forward",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    description: String,
}

/// Relays one inbound request to the helpdesk API and maps the outcome to the
/// response the client sees.
pub struct HelpdeskRelay {
    client: reqwest::Client,
    upstream: Url,
}

impl HelpdeskRelay {
    pub fn new(upstream: Url, client: &UpstreamClient) -> Result<Self, HelpdeskRelayError> {
        let client = client.build(true).map_err(HelpdeskRelayError::Client)?;
        Ok(Self { client, upstream })
    }

    pub async fn handle(&self, request: Request<Bytes>) -> Response<Bytes> {
        let branch = Branch::of(request.headers());
        tracing::debug!(
            method = %request.method(),
            path = %request.uri().path(),
            branch = branch.as_str(),
            "Relaying request"
        );

        let result = match branch {
            Branch::Upload => self.upload(request).await,
            Branch::Forward => self.forward(request).await,
        };

        match result {
            Ok(body) => {
                shared::counter!(REQUESTS, "branch" => branch.as_str(), "outcome" => "ok")
                    .increment(1);
                let mut response = Response::new(relay_body(body));
                response.headers_mut().insert(
                    CONTENT_TYPE,
                    http::HeaderValue::from_static(RESPONSE_CONTENT_TYPE),
                );
                response
            }
            Err(e) => {
                let (status, body) = error_body(branch, &e);
                tracing::warn!(
                    branch = branch.as_str(),
                    status = status.as_u16(),
                    error = %e,
                    "Relay failed"
                );
                shared::counter!(REQUESTS, "branch" => branch.as_str(), "outcome" => "error")
                    .increment(1);
                json_response(status, RESPONSE_CONTENT_TYPE, &body)
            }
        }
    }

    async fn upload(&self, request: Request<Bytes>) -> Result<Bytes, HelpdeskRelayError> {
        let (parts, body) = request.into_parts();
        let data_length = parts
            .headers
            .get(&DATA_LENGTH)
            .map(|v| parse_data_length(v.as_bytes()))
            .transpose()?;
        let payload = extract_payload(&body, data_length)?;
        tracing::debug!(
            dropped = body.len() - payload.len(),
            payload = payload.len(),
            "Extracted upload payload"
        );

        let builder = self
            .client
            .post(self.target_url(&parts.uri)?)
            .header(CONTENT_TYPE, UPLOAD_CONTENT_TYPE)
            .body(payload);
        self.send(Branch::Upload, with_authorization(builder, &parts.headers))
            .await
    }

    async fn forward(&self, request: Request<Bytes>) -> Result<Bytes, HelpdeskRelayError> {
        let (parts, body) = request.into_parts();
        let builder = self
            .client
            .request(parts.method.clone(), self.target_url(&parts.uri)?)
            .header(CONTENT_TYPE, FORWARD_CONTENT_TYPE)
            .body(body);
        self.send(Branch::Forward, with_authorization(builder, &parts.headers))
            .await
    }

    async fn send(
        &self,
        branch: Branch,
        builder: reqwest::RequestBuilder,
    ) -> Result<Bytes, HelpdeskRelayError> {
        let start = Instant::now();
        let result = builder.send().await;
        shared::histogram!(UPSTREAM_DURATION, "branch" => branch.as_str())
            .record(start.elapsed().as_secs_f64());

        let response = result.map_err(HelpdeskRelayError::UpstreamRequest)?;
        let status = response.status();
        if !status.is_success() {
            return Err(HelpdeskRelayError::UpstreamStatus(status));
        }
        response
            .bytes()
            .await
            .map_err(HelpdeskRelayError::UpstreamRequest)
    }

    fn target_url(&self, uri: &Uri) -> Result<Url, HelpdeskRelayError> {
        let base = self.upstream.as_str().trim_end_matches('/');
        let mut target = format!("{base}{}", uri.path());
        if let Some(query) = uri.query().filter(|q| !q.is_empty()) {
            target.push('?');
            target.push_str(query);
        }
        Ok(Url::parse(&target)?)
    }
}

fn with_authorization(
    builder: reqwest::RequestBuilder,
    headers: &HeaderMap,
) -> reqwest::RequestBuilder {
    match headers.get(AUTHORIZATION).map(|v| v.to_str()) {
        Some(Ok(value)) => builder.header(AUTHORIZATION, rewrite_authorization(value)),
        Some(Err(_)) => {
            tracing::warn!("Dropping non-ASCII authorization header");
            builder
        }
        None => builder,
    }
}

/// Upstream bodies that are not JSON are replaced with an empty object.
fn relay_body(body: Bytes) -> Bytes {
    match serde_json::from_slice::<IgnoredAny>(&body) {
        Ok(_) => body,
        Err(_) => Bytes::from_static(b"{}"),
    }
}

fn error_body(branch: Branch, error: &HelpdeskRelayError) -> (StatusCode, ErrorBody) {
    match error {
        HelpdeskRelayError::UpstreamStatus(_) => match branch {
            Branch::Upload => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: "Internal Server Error",
                    description: "Upload failed".into(),
                },
            ),
            Branch::Forward => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: "RecordNotFound",
                    description: "Not found".into(),
                },
            ),
        },
        HelpdeskRelayError::MissingMultipartPreamble
        | HelpdeskRelayError::InvalidDataLength(_)
        | HelpdeskRelayError::RequestBody(_)
        | HelpdeskRelayError::InvalidUpstreamUrl(_) => (
            StatusCode::BAD_REQUEST,
            ErrorBody {
                error: "Bad Request",
                description: error.to_string(),
            },
        ),
        HelpdeskRelayError::UpstreamRequest(_) => (
            StatusCode::BAD_GATEWAY,
            ErrorBody {
                error: "Bad Gateway",
                description: "Upstream unavailable".into(),
            },
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorBody {
                error: "Internal Server Error",
                description: "Relay failed".into(),
            },
        ),
    }
}

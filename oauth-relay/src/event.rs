//! Serverless gateway envelopes.
//!
//! A gateway in front of a function hands it the request as a JSON event and
//! expects a JSON response back. Both the REST style (`httpMethod`, `path`)
//! and the HTTP style (`requestContext.http.method`, `rawPath`) events are
//! accepted.

use crate::errors::OauthRelayError;
use crate::inbound::InboundRequest;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method, Response};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayEvent {
    #[serde(default)]
    pub http_method: Option<String>,
    #[serde(default)]
    pub request_context: Option<RequestContext>,
    #[serde(default)]
    pub headers: Option<IndexMap<String, String>>,
    #[serde(default)]
    pub query_string_parameters: Option<IndexMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
    /// Gateways send `null` as well as omitting the field; both mean false.
    #[serde(default)]
    pub is_base64_encoded: Option<bool>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub raw_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RequestContext {
    #[serde(default)]
    pub http: Option<RequestContextHttp>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RequestContextHttp {
    pub method: String,
}

impl GatewayEvent {
    pub fn from_slice(raw: &[u8]) -> Result<Self, OauthRelayError> {
        serde_json::from_slice(raw).map_err(|e| OauthRelayError::InvalidEvent(e.to_string()))
    }

    fn method(&self) -> Option<&str> {
        self.http_method.as_deref().or_else(|| {
            self.request_context
                .as_ref()?
                .http
                .as_ref()
                .map(|http| http.method.as_str())
        })
    }

    pub fn into_inbound(self) -> Result<InboundRequest, OauthRelayError> {
        let method = self
            .method()
            .ok_or_else(|| OauthRelayError::InvalidEvent("no HTTP method".into()))?;
        let method = Method::from_bytes(method.as_bytes())
            .map_err(|_| OauthRelayError::InvalidEvent(format!("invalid method {method}")))?;

        let mut headers = HeaderMap::new();
        for (name, value) in self.headers.into_iter().flatten() {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| OauthRelayError::InvalidEvent(format!("invalid header {name}")))?;
            let value = HeaderValue::from_str(&value)
                .map_err(|_| OauthRelayError::InvalidEvent(format!("invalid value for {name}")))?;
            headers.insert(name, value);
        }

        let body = match self.body {
            Some(body) if self.is_base64_encoded.unwrap_or(false) => Some(Bytes::from(
                STANDARD
                    .decode(body)
                    .map_err(|e| OauthRelayError::InvalidEvent(format!("body: {e}")))?,
            )),
            Some(body) => Some(Bytes::from(body)),
            None => None,
        };

        Ok(InboundRequest {
            method,
            path: self.raw_path.or(self.path).unwrap_or_else(|| "/".into()),
            headers,
            query: self.query_string_parameters.unwrap_or_default(),
            body: body.filter(|b| !b.is_empty()),
        })
    }
}

/// Response handed back to the gateway.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    pub headers: IndexMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl From<Response<Bytes>> for GatewayResponse {
    fn from(response: Response<Bytes>) -> Self {
        let (parts, body) = response.into_parts();
        let headers = parts
            .headers
            .iter()
            .filter_map(|(name, value)| {
                Some((name.as_str().to_string(), value.to_str().ok()?.to_string()))
            })
            .collect();

        let (body, is_base64_encoded) = match String::from_utf8(body.to_vec()) {
            Ok(text) => (text, false),
            Err(_) => (STANDARD.encode(&body), true),
        };

        Self {
            status_code: parts.status.as_u16(),
            headers,
            body,
            is_base64_encoded,
        }
    }
}

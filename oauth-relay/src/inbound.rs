use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, Method, Request};
use indexmap::IndexMap;
use url::form_urlencoded;

/// Query parameter carrying the API path when the relay sits behind a single
/// gateway route.
const PATH_PARAM: &str = "p";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    UrlEncoded,
    Other,
}

/// A request as the OAuth relay sees it, whether it came in over HTTP or as a
/// gateway event.
#[derive(Clone, Debug)]
pub struct InboundRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    /// Single-valued query parameters in arrival order; a repeated name keeps its last value.
    pub query: IndexMap<String, String>,
    pub body: Option<Bytes>,
}

impl InboundRequest {
    pub fn from_http(request: Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();
        let query = parts
            .uri
            .query()
            .map(|q| parse_query(q.as_bytes()))
            .unwrap_or_default();

        Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            headers: parts.headers,
            query,
            body: (!body.is_empty()).then_some(body),
        }
    }

    /// Removes the `p` parameter from the query and returns it as the API
    /// path, falling back to the request path.
    pub fn take_api_path(&mut self) -> String {
        match self.query.shift_remove(PATH_PARAM) {
            Some(p) if p.starts_with('/') => p,
            Some(p) => format!("/{p}"),
            None => self.path.clone(),
        }
    }

    pub fn header(&self, name: impl http::header::AsHeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn authorization(&self) -> Option<&str> {
        self.header(AUTHORIZATION)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE)
    }

    pub fn body_kind(&self) -> BodyKind {
        match self.content_type() {
            Some(ct) if ct.contains("json") => BodyKind::Json,
            Some(ct) if ct.contains("urlencoded") => BodyKind::UrlEncoded,
            _ => BodyKind::Other,
        }
    }

    /// Looks a parameter up in the query string first, then in the body.
    pub fn param(&self, name: &str) -> Option<String> {
        self.query
            .get(name)
            .cloned()
            .or_else(|| self.body_field(name))
    }

    fn body_field(&self, name: &str) -> Option<String> {
        let body = self.body.as_ref()?;
        match self.body_kind() {
            BodyKind::Json => {
                let value: serde_json::Value = serde_json::from_slice(body).ok()?;
                value.get(name)?.as_str().map(str::to_string)
            }
            BodyKind::UrlEncoded => form_urlencoded::parse(body)
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned()),
            BodyKind::Other => None,
        }
    }
}

pub fn parse_query(query: &[u8]) -> IndexMap<String, String> {
    form_urlencoded::parse(query).into_owned().collect()
}

/// Serializes query parameters, or returns `None` when there are none.
pub fn encode_query(query: &IndexMap<String, String>) -> Option<String> {
    if query.is_empty() {
        return None;
    }
    Some(
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(query)
            .finish(),
    )
}

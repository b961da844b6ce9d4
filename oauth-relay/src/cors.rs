use http::HeaderMap;
use http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, HeaderValue, ORIGIN,
};

const ALLOW_METHODS: &str = "POST, GET, OPTIONS, DELETE";
const ALLOW_HEADERS: &str = "Authorization, Origin, X-Requested-With, Content-Type, Accept, *";
const MAX_AGE: &str = "3600";

/// CORS headers for the authorize endpoint.
///
/// A request with an `Origin` gets that origin echoed back with credentials
/// allowed; anything else gets the wildcard without credentials.
pub fn cors_headers(request_headers: &HeaderMap) -> HeaderMap {
    let origin = request_headers.get(ORIGIN).filter(|o| o.as_bytes() != b"*");

    let mut headers = HeaderMap::new();
    match origin {
        Some(origin) => {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
            headers.insert(
                ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
        }
        None => {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
            headers.insert(
                ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("false"),
            );
        }
    }
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(MAX_AGE));
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers
}

use crate::errors::HelpdeskRelayError;
use crate::relay::{HelpdeskRelay, RESPONSE_CONTENT_TYPE};
use http_body_util::BodyExt;
use http_body_util::combinators::BoxBody;
use hyper::body::{Body, Bytes, Incoming};
use hyper::service::Service;
use hyper::{Request, Response, StatusCode};
use shared::http::{into_boxed, json_response};
use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub struct HelpdeskRelayService {
    relay: Arc<HelpdeskRelay>,
}

impl HelpdeskRelayService {
    pub fn new(relay: HelpdeskRelay) -> Self {
        Self {
            relay: Arc::new(relay),
        }
    }
}

impl Service<Request<Incoming>> for HelpdeskRelayService {
    type Response = Response<BoxBody<Bytes, HelpdeskRelayError>>;
    type Error = HelpdeskRelayError;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let relay = self.relay.clone();

        Box::pin(async move { Ok(into_boxed(relay_request(&relay, req).await)) })
    }
}

/// Buffers the request body and hands the request to the relay. A body that
/// cannot be read is answered with 400.
async fn relay_request<B>(relay: &HelpdeskRelay, req: Request<B>) -> Response<Bytes>
where
    B: Body<Data = Bytes>,
    B::Error: Display,
{
    let (parts, body) = req.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            let error = HelpdeskRelayError::RequestBody(e.to_string());
            tracing::warn!(error = %error, "Dropping request");
            return json_response(
                StatusCode::BAD_REQUEST,
                RESPONSE_CONTENT_TYPE,
                &serde_json::json!({
                    "error": "Bad Request",
                    "description": error.to_string(),
                }),
            );
        }
    };

    relay.handle(Request::from_parts(parts, body)).await
}

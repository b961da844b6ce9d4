use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::service::Service;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioExecutor;
use hyper_util::rt::TokioIo;
use hyper_util::server::conn::auto::Builder;
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::TcpListener;

pub const JSON_CONTENT_TYPE: &str = "application/json";

pub async fn run_http_service<S, E>(host: &str, port: u16, service: S) -> Result<(), E>
where
    S: Service<Request<Incoming>, Response = Response<BoxBody<Bytes, E>>, Error = E>
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
    E: From<std::io::Error> + std::error::Error + Send + Sync + 'static,
{
    let listener = TcpListener::bind(format!("{host}:{port}")).await?;
    tracing::info!(host, port, "Listening");
    let service_arc = Arc::new(service);

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let _ = stream.set_nodelay(true);
        let io = TokioIo::new(stream);
        let svc = service_arc.clone();

        // Hand the connection to hyper; auto-detect h1/h2 on this socket
        tokio::spawn(async move {
            if let Err(e) = Builder::new(TokioExecutor::new())
                .serve_connection(io, svc)
                .await
            {
                tracing::debug!(peer = %peer_addr, error = %e, "Connection closed with error");
            }
        });
    }
}

/// Wraps an in-memory response so it can be handed to hyper by any service,
/// whatever that service's error type is.
pub fn into_boxed<E>(response: Response<Bytes>) -> Response<BoxBody<Bytes, E>>
where
    E: 'static,
{
    response.map(|body| Full::new(body).map_err(|e: Infallible| match e {}).boxed())
}

/// Plain text response carrying the canonical reason of the status code.
pub fn make_error_response(status_code: StatusCode) -> Response<Bytes> {
    let message = status_code
        .canonical_reason()
        .unwrap_or("an error occurred");

    let mut response = Response::new(Bytes::from(format!("{message}\n")));
    *response.status_mut() = status_code;
    response
}

pub fn make_boxed_error_response<E: 'static>(
    status_code: StatusCode,
) -> Response<BoxBody<Bytes, E>> {
    into_boxed(make_error_response(status_code))
}

/// Serializes `value` and builds a response with the given status and content type.
pub fn json_response<T: Serialize>(
    status_code: StatusCode,
    content_type: &'static str,
    value: &T,
) -> Response<Bytes> {
    match serde_json::to_vec(value) {
        Ok(bytes) => raw_response(status_code, content_type, Bytes::from(bytes)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize response body");
            make_error_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub fn raw_response(
    status_code: StatusCode,
    content_type: &'static str,
    body: Bytes,
) -> Response<Bytes> {
    let mut response = Response::new(body);
    *response.status_mut() = status_code;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

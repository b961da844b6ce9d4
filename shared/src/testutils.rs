//! In-process upstream used by the relay tests.

use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::HeaderMap;
use hyper::service::{Service, service_fn};
use hyper::{Method, Request, Response, StatusCode, Uri};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// A request as seen by the test upstream.
#[derive(Debug)]
pub struct CapturedRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Canned response returned for every request.
#[derive(Clone, Debug)]
pub struct CannedResponse {
    pub status: StatusCode,
    pub headers: Vec<(&'static str, String)>,
    pub body: Bytes,
}

impl CannedResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }
}

pub struct TestUpstream {
    pub port: u16,
    requests: mpsc::UnboundedReceiver<CapturedRequest>,
}

impl TestUpstream {
    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Next request received by the upstream.
    pub async fn next_request(&mut self) -> CapturedRequest {
        self.requests
            .recv()
            .await
            .expect("test upstream stopped before receiving a request")
    }
}

async fn capture(
    req: Request<Incoming>,
    canned: Arc<CannedResponse>,
    tx: mpsc::UnboundedSender<CapturedRequest>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let body = body
        .collect()
        .await
        .map(|collected| collected.to_bytes())
        .unwrap_or_else(|_| Bytes::new());

    let _ = tx.send(CapturedRequest {
        method: parts.method,
        uri: parts.uri,
        headers: parts.headers,
        body,
    });

    let mut builder = Response::builder().status(canned.status);
    for (name, value) in &canned.headers {
        builder = builder.header(*name, value.as_str());
    }
    Ok(builder
        .body(Full::new(canned.body.clone()))
        .expect("canned response must be valid"))
}

/// Starts an upstream on an ephemeral port that answers every request with `canned`.
pub async fn start_upstream(canned: CannedResponse) -> TestUpstream {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to address");
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = mpsc::unbounded_channel();
    let canned = Arc::new(canned);

    tokio::spawn(async move {
        loop {
            let (stream, _) = listener.accept().await.unwrap();
            let io = TokioIo::new(stream);
            let canned = canned.clone();
            let tx = tx.clone();

            tokio::spawn(async move {
                let svc = service_fn(move |req| capture(req, canned.clone(), tx.clone()));
                if let Err(err) = Builder::new(TokioExecutor::new())
                    .serve_connection(io, svc)
                    .await
                {
                    eprintln!("Error serving connection: {:?}", err);
                }
            });
        }
    });

    TestUpstream {
        port,
        requests: rx,
    }
}

/// Serves `service` on an ephemeral port and returns the port.
pub async fn serve<S, E>(service: S) -> u16
where
    S: Service<Request<Incoming>, Response = Response<BoxBody<Bytes, E>>, Error = E>
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to address");
    let port = listener.local_addr().unwrap().port();
    let service = Arc::new(service);

    tokio::spawn(async move {
        loop {
            let (stream, _) = listener.accept().await.unwrap();
            let io = TokioIo::new(stream);
            let service = service.clone();

            tokio::spawn(async move {
                if let Err(err) = Builder::new(TokioExecutor::new())
                    .serve_connection(io, service)
                    .await
                {
                    eprintln!("Error serving connection: {:?}", err);
                }
            });
        }
    });

    port
}

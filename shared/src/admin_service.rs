use crate::http::{into_boxed, make_boxed_error_response};
use http_body_util::combinators::BoxBody;
use hyper::body::{Bytes, Incoming};
use hyper::service::Service;
use hyper::{Method, Request, Response, StatusCode};
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;

/// Health endpoints served on the admin listener of each relay.
///
/// The relays hold no state that needs warming up, so `/ready` answers the
/// same as `/health` once the listener is bound.
pub struct AdminService<E> {
    name: &'static str,
    _error: PhantomData<fn() -> E>,
}

impl<E> AdminService<E> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            _error: PhantomData,
        }
    }
}

impl<E> Service<Request<Incoming>> for AdminService<E>
where
    E: Send + 'static,
{
    type Response = Response<BoxBody<Bytes, E>>;
    type Error = E;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let name = self.name;
        Box::pin(async move { Ok(admin_response(name, req.method(), req.uri().path())) })
    }
}

fn admin_response<E: 'static>(
    name: &'static str,
    method: &Method,
    path: &str,
) -> Response<BoxBody<Bytes, E>> {
    if method != Method::GET && method != Method::HEAD {
        return make_boxed_error_response(StatusCode::METHOD_NOT_ALLOWED);
    }

    match path {
        "/health" | "/ready" => into_boxed(Response::new(Bytes::from("ok\n"))),
        _ => {
            tracing::debug!(service = name, path, "Unknown admin path");
            make_boxed_error_response(StatusCode::NOT_FOUND)
        }
    }
}

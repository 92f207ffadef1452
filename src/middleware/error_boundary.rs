//! Last line of defense for unhandled faults in the HTTP pipeline.
//!
//! Wraps the whole router and intercepts both fault channels: panics raised
//! anywhere during request handling and errors returned by handlers (as a
//! [`Fault`] attached to the response by [`ApiError`]). Full detail goes to
//! the operator log; the client always receives the same fixed-shape 500.
//!
//! [`ApiError`]: crate::error::ApiError

use std::any::Any;
use std::convert::Infallible;
use std::panic::AssertUnwindSafe;
use std::task::{Context, Poll};

use axum::Json;
use axum::body::Body;
use axum::response::IntoResponse;
use futures::FutureExt;
use futures::future::BoxFuture;
use http::{Method, Request, Response, StatusCode};
use tower::{Layer, Service};
use tracing::error;

use crate::config::Environment;
use crate::error::{ErrorBody, Fault};
use crate::middleware::request_id::RequestId;

/// Tower layer for fault sanitization.
#[derive(Clone, Copy)]
pub struct ErrorBoundaryLayer {
    environment: Environment,
}

impl ErrorBoundaryLayer {
    #[must_use]
    pub const fn new(environment: Environment) -> Self {
        Self { environment }
    }
}

impl<S> Layer<S> for ErrorBoundaryLayer {
    type Service = ErrorBoundaryMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ErrorBoundaryMiddleware {
            inner,
            environment: self.environment,
        }
    }
}

/// Fault sanitization middleware service.
#[derive(Clone)]
pub struct ErrorBoundaryMiddleware<S> {
    inner: S,
    environment: Environment,
}

impl<S> Service<Request<Body>> for ErrorBoundaryMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>, Error = Infallible>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
{
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let environment = self.environment;
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let request_id = req.extensions().get::<RequestId>().cloned();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let outcome = AssertUnwindSafe(inner.call(req)).catch_unwind().await;
            let response = match outcome {
                Ok(Ok(mut response)) => match response.extensions_mut().remove::<Fault>() {
                    Some(fault) => sanitized_response(
                        environment,
                        &method,
                        &path,
                        request_id.as_ref(),
                        &fault.message(),
                    ),
                    None => response,
                },
                Ok(Err(never)) => match never {},
                Err(panic) => sanitized_response(
                    environment,
                    &method,
                    &path,
                    request_id.as_ref(),
                    &panic_message(panic),
                ),
            };
            Ok(response)
        })
    }
}

/// Log the fault on the operator channel and build the client response.
fn sanitized_response(
    environment: Environment,
    method: &Method,
    path: &str,
    request_id: Option<&RequestId>,
    detail: &str,
) -> Response<Body> {
    // A panicking subscriber must not take down the response path.
    let _ = std::panic::catch_unwind(AssertUnwindSafe(|| {
        error!(
            method = %method,
            path = %path,
            request_id = request_id.map_or("-", RequestId::as_str),
            error = %detail,
            "Unhandled fault in request handler"
        );
    }));

    let body = if environment.is_development() {
        ErrorBody::with_detail(detail)
    } else {
        ErrorBody::redacted()
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

/// Render a panic payload. Payloads from `panic!` are `&str` or `String`;
/// anything else is reported without its content.
fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "opaque panic payload".to_string()
    }
}

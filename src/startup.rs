//! Server startup and wiring.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use http::Request;
use http::header::HeaderName;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Level;

use crate::config::Config;
use crate::middleware::{ErrorBoundaryLayer, RequestId, RequestIdLayer, REQUEST_ID_HEADER};
use crate::routes::rest_routes;

/// Build and configure the complete application.
pub fn build_app(config: &Config) -> anyhow::Result<(Router, SocketAddr)> {
    let addr: SocketAddr = config.http_address.parse()?;

    let cors = build_cors(&config.cors_allow_origins);

    // Request flows top-to-bottom; the error boundary is innermost so its
    // sanitized responses still pick up CORS and request-id headers on the
    // way out.
    let middleware = ServiceBuilder::new()
        .layer(RequestIdLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<_>| {
                    tracing::info_span!(
                        "request",
                        method = %req.method(),
                        uri = %req.uri(),
                        request_id = req
                            .extensions()
                            .get::<RequestId>()
                            .map_or("-", RequestId::as_str),
                    )
                })
                .on_response(tower_http::trace::DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(cors)
        .layer(ErrorBoundaryLayer::new(config.environment));

    let app = rest_routes().layer(middleware);

    Ok((app, addr))
}

fn build_cors(origins: &str) -> CorsLayer {
    let cors = if origins.trim() == "*" {
        CorsLayer::permissive()
    } else {
        let origins: Vec<_> = origins.split(',').filter_map(|s| s.trim().parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    cors.allow_headers(Any)
        .allow_methods(Any)
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .max_age(Duration::from_secs(3600))
}

//! REST routes, health check handlers, and the fault-demonstration handlers.

use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;

/// Build version.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Request body for the fault-trigger endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerErrorRequest {
    pub simulated_input: Option<String>,
}

/// Build REST routes.
pub fn rest_routes() -> Router {
    Router::new()
        .route("/", get(|| async { "error-boundary-demo" }))
        .route("/health", get(|| async { "OK" }))
        .route("/health/live", get(|| async { "OK" }))
        .route("/health/ready", get(readiness_handler))
        .route("/api/error/trigger", post(trigger_error_handler))
        .route("/api/error/trigger-io", post(trigger_io_error_handler))
}

async fn readiness_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: VERSION,
    })
}

/// Demonstration handler: logs receipt, then dereferences an empty
/// collection. The resulting panic is intercepted by the error boundary.
async fn trigger_error_handler(
    Json(request): Json<TriggerErrorRequest>,
) -> Json<serde_json::Value> {
    info!(
        simulated_input = ?request.simulated_input,
        "Received error trigger request"
    );

    let values: Vec<String> = Vec::new();
    let first = values[0].clone();

    Json(serde_json::json!({ "echo": first }))
}

/// Demonstration handler for the returned-error channel: propagates a real
/// I/O failure through `?`.
async fn trigger_io_error_handler() -> Result<(), ApiError> {
    tokio::fs::read_to_string("/nonexistent/error-boundary-demo.txt").await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn root_reports_the_service_name() {
        let response = rest_routes()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"error-boundary-demo");
    }

    #[tokio::test]
    async fn health_endpoints_respond_ok() {
        for path in ["/health", "/health/live"] {
            let response = rest_routes()
                .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{path}");
        }
    }

    #[tokio::test]
    async fn readiness_reports_status_and_version() {
        let response = rest_routes()
            .oneshot(
                Request::builder()
                    .uri("/health/ready")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], VERSION);
    }

    #[test]
    fn trigger_request_accepts_camel_case_input() {
        let request: TriggerErrorRequest =
            serde_json::from_str(r#"{"simulatedInput": "abc"}"#).unwrap();
        assert_eq!(request.simulated_input.as_deref(), Some("abc"));

        let request: TriggerErrorRequest = serde_json::from_str("{}").unwrap();
        assert!(request.simulated_input.is_none());
    }
}

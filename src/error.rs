//! Fault capture and client-facing sanitization.
//!
//! Internal fault detail is logged by the error boundary but never exposed
//! to clients; callers observe a fixed status and a fixed message.

use std::fmt;
use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::Serialize;

/// Fixed client-facing message for any unhandled fault.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// Client-facing error body.
///
/// `message` is always the fixed generic string; `detail` is only populated
/// in the development environment.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorBody {
    /// Production shape: the generic message and nothing else.
    #[must_use]
    pub const fn redacted() -> Self {
        Self {
            message: GENERIC_ERROR_MESSAGE,
            detail: None,
        }
    }

    /// Development shape: generic message plus the rendered fault.
    #[must_use]
    pub fn with_detail(detail: impl Into<String>) -> Self {
        Self {
            message: GENERIC_ERROR_MESSAGE,
            detail: Some(detail.into()),
        }
    }
}

/// Fault captured from a handler, attached to the response extensions for
/// the error boundary to log and render.
#[derive(Debug, Clone)]
pub struct Fault(Arc<anyhow::Error>);

impl Fault {
    /// Render the full error chain.
    #[must_use]
    pub fn message(&self) -> String {
        format!("{:#}", self.0)
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#}", self.0)
    }
}

/// [`anyhow::Error`] wrapper that lets handlers use the `?` operator.
///
/// Converting into a response produces a bare 500 with the fault attached to
/// the response extensions; the error boundary consumes it, logs the detail,
/// and writes the sanitized body. Without the boundary in place the client
/// still only sees an empty 500.
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl<E: Into<anyhow::Error>> From<E> for ApiError {
    fn from(error: E) -> Self {
        Self(error.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response.extensions_mut().insert(Fault(Arc::new(self.0)));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_response_is_a_bare_500_with_fault_attached() {
        let error: std::io::Error = std::io::ErrorKind::NotFound.into();
        let response = ApiError::from(error).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let fault = response.extensions().get::<Fault>().expect("fault attached");
        assert!(!fault.message().is_empty());
    }

    #[test]
    fn fault_message_renders_the_full_chain() {
        let error: std::io::Error = std::io::ErrorKind::NotFound.into();
        let error = anyhow::Error::from(error).context("reading demo file");
        let response = ApiError::from(error).into_response();

        let fault = response.extensions().get::<Fault>().expect("fault attached");
        assert!(fault.message().contains("reading demo file"));
    }

    #[test]
    fn redacted_body_serializes_to_the_fixed_shape() {
        let body = serde_json::to_value(ErrorBody::redacted()).expect("serializable");
        assert_eq!(
            body,
            serde_json::json!({ "message": GENERIC_ERROR_MESSAGE })
        );
    }

    #[test]
    fn detail_body_keeps_the_generic_message() {
        let body = serde_json::to_value(ErrorBody::with_detail("boom")).expect("serializable");
        assert_eq!(body["message"], GENERIC_ERROR_MESSAGE);
        assert_eq!(body["detail"], "boom");
    }
}

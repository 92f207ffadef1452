//! Tower middleware for the HTTP pipeline.
//!
//! # Middleware Order
//! Middleware is applied in layers. When using `.layer()` on a router:
//! - Outermost layer is added last
//! - Request flows: outermost → innermost → handler
//! - Response flows: handler → innermost → outermost
//!
//! Recommended order (applied in reverse):
//! 1. RequestIdLayer - Extract/generate request ID first
//! 2. TraceLayer - Request tracing with spans
//! 3. TimeoutLayer - Request timeout
//! 4. CorsLayer - CORS handling
//! 5. ErrorBoundaryLayer - Fault sanitization, innermost so it wraps all
//!    route handling and its responses still traverse the outer layers

pub mod error_boundary;
pub mod request_id;

pub use error_boundary::ErrorBoundaryLayer;
pub use request_id::{RequestId, RequestIdLayer, REQUEST_ID_HEADER};

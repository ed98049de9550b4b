//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (attach request ID)
//!     → security::rate_limit (admission)
//!     → handlers.rs (validate, compute, serialize)
//!     → error.rs (structured JSON on failure)
//! ```

pub mod error;
pub mod handlers;
pub mod request;
pub mod server;

pub use error::ApiError;
pub use request::{RequestId, RequestIdExt, RequestIdLayer, X_REQUEST_ID};
pub use server::HttpServer;

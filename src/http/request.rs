//! Request identity.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) as early as possible
//! - Preserve an ID supplied by the client
//! - Make the ID available to downstream middleware and handlers
//!
//! # Design Decisions
//! - The ID lives in both the header (for propagation) and the request
//!   extensions (for typed access via [`RequestIdExt`])

use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{HeaderValue, Request};
use tower::{Layer, Service};
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Typed request ID stored in the request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Extension trait for reading the request ID off a request.
pub trait RequestIdExt {
    fn request_id(&self) -> Option<&str>;
}

impl RequestIdExt for Request<Body> {
    fn request_id(&self) -> Option<&str> {
        self.extensions()
            .get::<RequestId>()
            .map(|id| id.0.as_str())
    }
}

/// Layer attaching a request ID to every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

/// Service that assigns or preserves the `x-request-id` header.
#[derive(Debug, Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for RequestIdService<S>
where
    S: Service<Request<Body>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let id = match request
            .headers()
            .get(X_REQUEST_ID)
            .and_then(|value| value.to_str().ok())
        {
            Some(existing) => existing.to_string(),
            None => {
                let generated = Uuid::new_v4().to_string();
                if let Ok(value) = HeaderValue::from_str(&generated) {
                    request.headers_mut().insert(X_REQUEST_ID, value);
                }
                generated
            }
        };
        request.extensions_mut().insert(RequestId(id));

        self.inner.call(request)
    }
}

//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (tracing, metrics, request ID, timeout, admission)
//! - Bind the server to a listener and serve until shutdown
//!
//! # Middleware order (outermost first)
//! TraceLayer → metrics → RequestIdLayer → TimeoutLayer → rate limit →
//! handler. Admission runs last so denied requests still get a request ID
//! and show up in the request metrics as 429s.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServiceConfig;
use crate::http::handlers::{fibonacci_handler, health_handler};
use crate::http::request::RequestIdLayer;
use crate::observability::metrics;
use crate::security::policy::PolicyTable;
use crate::security::rate_limit::{now_unix_secs, rate_limit_middleware, RateLimiter};

/// How often idle client counters are swept out.
const EVICTION_INTERVAL_SECS: u64 = 60;

/// HTTP server for the Fibonacci service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    limiter: Arc<RateLimiter>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServiceConfig) -> Self {
        let policy = PolicyTable::from_config(&config.rate_limit);
        let limiter = Arc::new(RateLimiter::new(policy));

        let router = Self::build_router(&config, limiter.clone());
        Self {
            router,
            config,
            limiter,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServiceConfig, limiter: Arc<RateLimiter>) -> Router {
        Router::new()
            .route("/fibonacci", get(fibonacci_handler))
            .route("/health", get(health_handler))
            .layer(middleware::from_fn_with_state(
                limiter,
                rate_limit_middleware,
            ))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(middleware::from_fn(track_metrics))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        // Sweep counters whose windows have all expired so the store does
        // not grow unbounded across clients.
        let limiter = self.limiter.clone();
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(EVICTION_INTERVAL_SECS));
            interval.tick().await;
            loop {
                interval.tick().await;
                limiter.evict_expired(now_unix_secs());
            }
        });

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// Record count and latency for every response, including rejections.
async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    metrics::record_request(&method, response.status().as_u16(), &path, start);
    response
}

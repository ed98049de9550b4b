//! Fibonacci HTTP Service
//!
//! A small HTTP service computing Fibonacci numbers, built with Tokio and
//! Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!         → http/server.rs (middleware stack)
//!         → security/ (admission: per-client fixed-window rate limits)
//!         → http/handlers.rs (validate `n`, serialize response)
//!         → compute/ (pure Fibonacci computation)
//!
//!     Cross-Cutting Concerns
//!         config/         TOML config, semantic validation
//!         observability/  tracing logs, Prometheus metrics
//!         lifecycle/      signals, graceful shutdown
//! ```

// Core subsystems
pub mod compute;
pub mod config;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;

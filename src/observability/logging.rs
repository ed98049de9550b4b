//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Respect `RUST_LOG` over the configured level

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logging subsystem.
///
/// `RUST_LOG` takes precedence; the configured level is the fallback for
/// this crate and the HTTP trace layer.
pub fn init(default_level: &str) {
    let fallback = format!("fibonacci_service={default_level},tower_http={default_level}");
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so a minimal (or absent) config file works.

use serde::{Deserialize, Serialize};

/// Root configuration for the Fibonacci service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Rate limiting configuration.
    pub rate_limit: RateLimitConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Whether a rule's counter is shared across all routes or kept per route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleScope {
    /// One counter per client, shared by every route the rule governs.
    Global,
    /// One counter per (client, route) pair.
    PerRoute,
}

/// A single rate limit rule: at most `max_count` requests per window.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleConfig {
    /// Counter scope.
    pub scope: RuleScope,

    /// Window length in seconds. Windows are fixed and epoch-aligned.
    pub window_secs: u64,

    /// Maximum admitted requests per window.
    pub max_count: u32,
}

/// Route-specific rule set. When present, it replaces the default rules
/// for that route.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteLimitConfig {
    /// Exact request path (e.g., "/fibonacci").
    pub path: String,

    /// Rules applied to this route instead of the defaults.
    pub rules: Vec<RuleConfig>,
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Rules applied to every route without an override.
    pub default_rules: Vec<RuleConfig>,

    /// Per-route overrides.
    pub routes: Vec<RouteLimitConfig>,

    /// Paths that bypass admission entirely.
    pub exempt_paths: Vec<String>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_rules: vec![
                RuleConfig {
                    scope: RuleScope::Global,
                    window_secs: 86_400,
                    max_count: 200,
                },
                RuleConfig {
                    scope: RuleScope::Global,
                    window_secs: 3_600,
                    max_count: 50,
                },
            ],
            routes: vec![RouteLimitConfig {
                path: "/fibonacci".to_string(),
                rules: vec![RuleConfig {
                    scope: RuleScope::PerRoute,
                    window_secs: 60,
                    max_count: 30,
                }],
            }],
            exempt_paths: vec!["/health".to_string()],
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_limits() {
        let config = ServiceConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:5000");

        let rl = &config.rate_limit;
        assert!(rl.enabled);
        assert_eq!(rl.default_rules.len(), 2);
        assert_eq!(rl.default_rules[0].max_count, 200);
        assert_eq!(rl.default_rules[0].window_secs, 86_400);
        assert_eq!(rl.default_rules[1].max_count, 50);
        assert_eq!(rl.default_rules[1].window_secs, 3_600);

        assert_eq!(rl.routes.len(), 1);
        assert_eq!(rl.routes[0].path, "/fibonacci");
        assert_eq!(rl.routes[0].rules[0].max_count, 30);
        assert_eq!(rl.routes[0].rules[0].window_secs, 60);
        assert_eq!(rl.routes[0].rules[0].scope, RuleScope::PerRoute);

        assert_eq!(rl.exempt_paths, vec!["/health".to_string()]);
    }

    #[test]
    fn test_config_from_toml() {
        let raw = r#"
            [listener]
            bind_address = "127.0.0.1:6000"

            [timeouts]
            request_secs = 10

            [rate_limit]
            enabled = true
            exempt_paths = ["/health", "/metrics"]

            [[rate_limit.default_rules]]
            scope = "global"
            window_secs = 3600
            max_count = 50

            [[rate_limit.routes]]
            path = "/fibonacci"

            [[rate_limit.routes.rules]]
            scope = "per_route"
            window_secs = 60
            max_count = 30
        "#;

        let config: ServiceConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:6000");
        assert_eq!(config.timeouts.request_secs, 10);
        assert_eq!(config.rate_limit.default_rules.len(), 1);
        assert_eq!(
            config.rate_limit.routes[0].rules[0].scope,
            RuleScope::PerRoute
        );
        assert_eq!(config.rate_limit.exempt_paths.len(), 2);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: ServiceConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:5000");
        assert_eq!(config.rate_limit.default_rules.len(), 2);
    }
}

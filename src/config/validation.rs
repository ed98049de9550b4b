//! Configuration validation.
//!
//! Serde handles the syntactic layer; this module checks semantics: value
//! ranges, address formats, and internal consistency of the rate limit
//! policy. Validation is a pure function over the config and returns all
//! violations, not just the first.

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{RuleConfig, ServiceConfig};

/// A single semantic violation found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),

    #[error("invalid metrics address '{0}'")]
    InvalidMetricsAddress(String),

    #[error("request timeout must be greater than zero")]
    ZeroRequestTimeout,

    #[error("rate limit rule for {context} has a zero-length window")]
    ZeroWindow { context: String },

    #[error("rate limit rule for {context} has a zero max_count")]
    ZeroMaxCount { context: String },

    #[error("duplicate (scope, window) pair in rules for {context}")]
    DuplicateRule { context: String },

    #[error("route path '{0}' must start with '/'")]
    InvalidRoutePath(String),

    #[error("duplicate rate limit override for route '{0}'")]
    DuplicateRouteOverride(String),

    #[error("route override for '{0}' has no rules")]
    EmptyRouteOverride(String),

    #[error("exempt path '{0}' must start with '/'")]
    InvalidExemptPath(String),
}

/// Validate a full service configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    validate_rule_set(&config.rate_limit.default_rules, "the defaults", &mut errors);

    let mut seen_paths = HashSet::new();
    for route in &config.rate_limit.routes {
        if !route.path.starts_with('/') {
            errors.push(ValidationError::InvalidRoutePath(route.path.clone()));
        }
        if !seen_paths.insert(route.path.as_str()) {
            errors.push(ValidationError::DuplicateRouteOverride(route.path.clone()));
        }
        if route.rules.is_empty() {
            errors.push(ValidationError::EmptyRouteOverride(route.path.clone()));
        }
        let context = format!("route '{}'", route.path);
        validate_rule_set(&route.rules, &context, &mut errors);
    }

    for path in &config.rate_limit.exempt_paths {
        if !path.starts_with('/') {
            errors.push(ValidationError::InvalidExemptPath(path.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_rule_set(rules: &[RuleConfig], context: &str, errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for rule in rules {
        if rule.window_secs == 0 {
            errors.push(ValidationError::ZeroWindow {
                context: context.to_string(),
            });
        }
        if rule.max_count == 0 {
            errors.push(ValidationError::ZeroMaxCount {
                context: context.to_string(),
            });
        }
        // Two rules with the same scope and window would share a counter.
        if !seen.insert((rule.scope, rule.window_secs)) {
            errors.push(ValidationError::DuplicateRule {
                context: context.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{RouteLimitConfig, RuleConfig, RuleScope};

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ServiceConfig::default()).is_ok());
    }

    #[test]
    fn test_bad_bind_address_rejected() {
        let mut config = ServiceConfig::default();
        config.listener.bind_address = "not-an-address".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::InvalidBindAddress(
            "not-an-address".to_string()
        )));
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut config = ServiceConfig::default();
        config.rate_limit.default_rules.push(RuleConfig {
            scope: RuleScope::Global,
            window_secs: 0,
            max_count: 10,
        });
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::ZeroWindow { .. }));
    }

    #[test]
    fn test_duplicate_route_override_rejected() {
        let mut config = ServiceConfig::default();
        let dup = config.rate_limit.routes[0].clone();
        config.rate_limit.routes.push(dup);
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::DuplicateRouteOverride(
            "/fibonacci".to_string()
        )));
    }

    #[test]
    fn test_empty_route_override_rejected() {
        let mut config = ServiceConfig::default();
        config.rate_limit.routes.push(RouteLimitConfig {
            path: "/other".to_string(),
            rules: Vec::new(),
        });
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::EmptyRouteOverride(
            "/other".to_string()
        )));
    }

    #[test]
    fn test_all_violations_reported() {
        let mut config = ServiceConfig::default();
        config.listener.bind_address = "nope".to_string();
        config.timeouts.request_secs = 0;
        config.rate_limit.exempt_paths.push("health".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_metrics_address_ignored_when_disabled() {
        let mut config = ServiceConfig::default();
        config.observability.metrics_enabled = false;
        config.observability.metrics_address = "nope".to_string();
        assert!(validate_config(&config).is_ok());
    }
}

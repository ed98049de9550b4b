//! Per-route admission policy.
//!
//! Resolves the rate limit configuration into an explicit table the
//! admission middleware consults: which rules govern a path, and which
//! paths bypass admission entirely.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::config::schema::{RateLimitConfig, RuleConfig, RuleScope};

/// A resolved rate limit rule: at most `max_count` requests per window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitRule {
    pub scope: RuleScope,
    pub window: Duration,
    pub max_count: u32,
}

impl RateLimitRule {
    fn from_config(rule: &RuleConfig) -> Self {
        Self {
            scope: rule.scope,
            window: Duration::from_secs(rule.window_secs),
            max_count: rule.max_count,
        }
    }

    /// Human-readable form of the limit, e.g. "30 per 1 minute".
    /// Used in deny responses and logs.
    pub fn describe(&self) -> String {
        format!("{} per {}", self.max_count, humanize_window(self.window))
    }
}

fn humanize_window(window: Duration) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = 3_600;
    const DAY: u64 = 86_400;

    let secs = window.as_secs();
    let (value, unit) = if secs >= DAY && secs % DAY == 0 {
        (secs / DAY, "day")
    } else if secs >= HOUR && secs % HOUR == 0 {
        (secs / HOUR, "hour")
    } else if secs >= MINUTE && secs % MINUTE == 0 {
        (secs / MINUTE, "minute")
    } else {
        (secs, "second")
    };

    if value == 1 {
        format!("1 {unit}")
    } else {
        format!("{value} {unit}s")
    }
}

/// Admission policy resolved from configuration.
///
/// A route override replaces the default rule set for that path; a path on
/// the exempt list is never counted at all. Lookups are exact path matches.
#[derive(Debug, Default)]
pub struct PolicyTable {
    default_rules: Vec<RateLimitRule>,
    route_rules: HashMap<String, Vec<RateLimitRule>>,
    exempt: HashSet<String>,
}

impl PolicyTable {
    /// Build the policy table. A disabled config yields an empty table,
    /// which admits everything.
    pub fn from_config(config: &RateLimitConfig) -> Self {
        if !config.enabled {
            return Self::default();
        }

        let default_rules = config
            .default_rules
            .iter()
            .map(RateLimitRule::from_config)
            .collect();

        let route_rules = config
            .routes
            .iter()
            .map(|route| {
                let rules = route.rules.iter().map(RateLimitRule::from_config).collect();
                (route.path.clone(), rules)
            })
            .collect();

        let exempt = config.exempt_paths.iter().cloned().collect();

        Self {
            default_rules,
            route_rules,
            exempt,
        }
    }

    /// Effective rule set for a path: the override if present, the defaults
    /// otherwise.
    pub fn rules_for(&self, path: &str) -> &[RateLimitRule] {
        self.route_rules
            .get(path)
            .map(Vec::as_slice)
            .unwrap_or(&self.default_rules)
    }

    /// Whether a path bypasses admission entirely.
    pub fn is_exempt(&self, path: &str) -> bool {
        self.exempt.contains(path)
    }
}

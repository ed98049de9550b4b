//! Per-client rate limiting with fixed-window counters.
//!
//! # Responsibilities
//! - Track request counts per client over epoch-aligned fixed windows
//! - Enforce every rule the policy table names for a route
//! - Reject over-budget requests with the violated rule
//!
//! # Design Decisions
//! - Fixed windows (count resets entirely at the boundary), aligned to the
//!   UNIX epoch so the reset instant is the same for every client
//! - Check-then-commit under the per-client entry guard: a denied request
//!   consumes no budget, and concurrent requests cannot double-admit
//! - Timestamps are injected (`admit_at`) so window edges are testable

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;

use crate::config::schema::RuleScope;
use crate::http::error::ApiError;
use crate::http::request::RequestIdExt;
use crate::observability::metrics;
use crate::security::policy::{PolicyTable, RateLimitRule};

/// Outcome of an admission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    /// Denied, carrying the first rule found over budget.
    Denied { rule: RateLimitRule },
}

/// Identifies one counter: which scope it belongs to and how long its
/// window is. Rules sharing scope and window share a counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SlotKey {
    scope: String,
    window_secs: u64,
}

impl SlotKey {
    fn new(rule: &RateLimitRule, path: &str) -> Self {
        let scope = match rule.scope {
            RuleScope::Global => "global".to_string(),
            RuleScope::PerRoute => path.to_string(),
        };
        Self {
            scope,
            window_secs: rule.window.as_secs().max(1),
        }
    }
}

/// One fixed window worth of counting. The count only ever increases while
/// `window_index` is current, and starts over when the index moves on.
#[derive(Debug, Clone, Copy)]
struct WindowSlot {
    window_index: u64,
    count: u32,
}

#[derive(Debug, Default)]
struct ClientCounters {
    slots: HashMap<SlotKey, WindowSlot>,
}

/// Per-client request counter store with policy-driven admission.
///
/// Owned explicitly by the server and handed to the middleware as shared
/// state; nothing here is a process-wide singleton.
#[derive(Debug)]
pub struct RateLimiter {
    policy: PolicyTable,
    clients: DashMap<String, ClientCounters>,
}

impl RateLimiter {
    pub fn new(policy: PolicyTable) -> Self {
        Self {
            policy,
            clients: DashMap::new(),
        }
    }

    /// Admission check against the wall clock.
    pub fn admit(&self, client: &str, path: &str) -> Admission {
        self.admit_at(client, path, now_unix_secs())
    }

    /// Admission check at an explicit timestamp (seconds since the UNIX
    /// epoch). Checks every rule governing `path`; only if all pass is the
    /// request counted against each of their windows.
    pub fn admit_at(&self, client: &str, path: &str, now_secs: u64) -> Admission {
        if self.policy.is_exempt(path) {
            return Admission::Allowed;
        }
        let rules = self.policy.rules_for(path);
        if rules.is_empty() {
            return Admission::Allowed;
        }

        // The entry guard holds the map shard lock for this client, making
        // the multi-rule check and commit a single atomic step.
        let mut entry = self.clients.entry(client.to_string()).or_default();

        for rule in rules {
            let key = SlotKey::new(rule, path);
            let index = now_secs / key.window_secs;
            let in_window = entry
                .slots
                .get(&key)
                .filter(|slot| slot.window_index == index)
                .map(|slot| slot.count)
                .unwrap_or(0);
            if in_window >= rule.max_count {
                return Admission::Denied { rule: rule.clone() };
            }
        }

        for rule in rules {
            let key = SlotKey::new(rule, path);
            let index = now_secs / key.window_secs;
            let slot = entry.slots.entry(key).or_insert(WindowSlot {
                window_index: index,
                count: 0,
            });
            if slot.window_index != index {
                slot.window_index = index;
                slot.count = 0;
            }
            slot.count += 1;
        }

        Admission::Allowed
    }

    /// Drop clients whose windows have all expired. Called periodically so
    /// the store does not grow with every client ever seen.
    pub fn evict_expired(&self, now_secs: u64) {
        self.clients.retain(|_, counters| {
            counters
                .slots
                .retain(|key, slot| now_secs / key.window_secs == slot.window_index);
            !counters.slots.is_empty()
        });
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }
}

/// Seconds since the UNIX epoch.
pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

/// Middleware enforcing the admission policy for every request.
pub async fn rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = addr.ip().to_string();
    let path = request.uri().path().to_string();

    match limiter.admit(&client, &path) {
        Admission::Allowed => next.run(request).await,
        Admission::Denied { rule } => {
            let description = rule.describe();
            tracing::warn!(
                request_id = %request.request_id().unwrap_or("unknown"),
                client = %client,
                path = %path,
                rule = %description,
                "Rate limit exceeded"
            );
            metrics::record_rate_limited(&description);
            ApiError::RateLimited { description }.into_response()
        }
    }
}

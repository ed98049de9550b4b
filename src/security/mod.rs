//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → policy.rs (which rules govern this path? exempt?)
//!     → rate_limit.rs (atomic check-and-increment per client)
//!     → Pass to handler, or 429 with the violated rule
//! ```
//!
//! # Design Decisions
//! - Explicit policy table instead of per-route annotations
//! - Fail closed: every governing rule must pass
//! - Client identity is the source IP address

pub mod policy;
pub mod rate_limit;

pub use policy::{PolicyTable, RateLimitRule};
pub use rate_limit::{Admission, RateLimiter};

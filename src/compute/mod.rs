//! Pure computation subsystem.
//!
//! Stateless, no I/O. Handlers call into this module after validation.

pub mod fibonacci;

pub use fibonacci::{fibonacci, MAX_N};

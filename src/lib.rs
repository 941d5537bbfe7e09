//! Autumn Burst (workspace facade crate).
//!
//! Re-exports the crates under `crates/` as `autumn_burst::{core,input,term,types}`
//! and adds the pieces the terminal binary shares with tests: env-driven
//! [`config::Settings`] and the [`observe::EventLog`] observer.

pub mod config;
pub mod observe;

pub use autumn_burst_core as core;
pub use autumn_burst_input as input;
pub use autumn_burst_term as term;
pub use autumn_burst_types as types;

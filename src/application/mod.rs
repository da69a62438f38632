//! Application layer - Use cases and orchestration
//!
//! This layer contains:
//! - Errors: the crate-wide error taxonomy
//! - Messaging: command parsing and per-message dispatch
//! - Reporting: aggregation, summaries and retention pruning

pub mod errors;
pub mod messaging;
pub mod reporting;

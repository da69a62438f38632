//! Message handling - command parsing and per-message dispatch

pub mod parser;
pub mod dispatcher;

pub use dispatcher::{AccessSettings, Dispatcher};

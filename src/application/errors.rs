//! Application layer errors

use thiserror::Error;

/// Rejections of an inbound command line. Always user-visible and
/// non-fatal; no state changes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("❌ Usage: /add <amount> <currency> <remark>")]
    Usage,

    #[error("❌ Invalid amount. Example: /add 50 USD Lunch")]
    InvalidAmount(String),
}

/// Persistence failures. Surfaced to the operator channel; the end user
/// only sees a generic failure message.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("corrupt record: {0}")]
    Data(String),
}

/// Transport (chat platform) failures.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),

    #[error("response parse error: {0}")]
    Parse(String),

    #[error("platform API error: {0}")]
    Api(String),
}

/// Chart rendering failures. Fatal to the one photo only.
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("chart render error: {0}")]
    Render(String),
}

/// Anything a command handler can fail with. Caught at the dispatch
/// boundary and converted into an operator diagnostic, never propagated to
/// the end user raw.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Chart(#[from] ChartError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("parse error: {0}")]
    Parse(String),
}

//! Domain traits - Abstractions for infrastructure implementations

pub mod store;
pub mod transport;
pub mod chart;

pub use store::{LedgerStore, UserDirectory};
pub use transport::Transport;
pub use chart::ChartRenderer;

//! Domain entities - Core business objects with no external dependencies

pub mod user;
pub mod expense;
pub mod command;
pub mod message;

pub use user::User;
pub use expense::Expense;
pub use command::Command;
pub use message::{Inbound, Outgoing};

//! Platform adapters

pub mod telegram;
pub mod console;

pub use console::ConsoleAdapter;
pub use telegram::TelegramAdapter;

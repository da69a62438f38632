//! Console adapter for development/testing

use async_trait::async_trait;

use crate::application::errors::TransportError;
use crate::domain::traits::Transport;

/// Console bot adapter for local development. Text replies go to stdout;
/// photo bytes are written next to the working directory and the path is
/// printed instead.
#[derive(Debug, Default)]
pub struct ConsoleAdapter;

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Read one line from stdin; `None` on EOF.
    pub fn read_line(&self, prompt: &str) -> Option<String> {
        use std::io::Write;

        print!("{}", prompt);
        std::io::stdout().flush().ok()?;
        let mut input = String::new();
        let read = std::io::stdin().read_line(&mut input).ok()?;
        if read == 0 {
            return None;
        }
        Some(input.trim().to_string())
    }
}

#[async_trait]
impl Transport for ConsoleAdapter {
    async fn send_text(&self, _chat_id: i64, text: &str) -> Result<(), TransportError> {
        println!("[BOT] {}", text);
        Ok(())
    }

    async fn send_photo(&self, _chat_id: i64, bytes: &[u8]) -> Result<(), TransportError> {
        let path = std::env::temp_dir().join("riel-bot-chart.svg");
        std::fs::write(&path, bytes)
            .map_err(|e| TransportError::Api(format!("failed to write chart: {}", e)))?;
        println!("[BOT] (chart written to {})", path.display());
        Ok(())
    }
}

use async_trait::async_trait;

use crate::application::errors::TransportError;

/// Transport - abstraction for messaging platform adapters.
///
/// Delivery, retries and platform markup are the adapter's concern; the
/// dispatcher only emits `Outgoing` instructions.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a text message to a chat.
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), TransportError>;

    /// Send an encoded image to a chat.
    async fn send_photo(&self, chat_id: i64, bytes: &[u8]) -> Result<(), TransportError>;
}

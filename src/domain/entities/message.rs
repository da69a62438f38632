//! Inbound messages and outgoing delivery instructions.

/// An incoming chat message, as handed over by a transport adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    /// Chat the message arrived in; doubles as the sender's user id in
    /// one-to-one conversations.
    pub chat_id: i64,
    /// The sender's chat-scoped handle.
    pub username: String,
    /// Whether the chat is a one-to-one (personal) conversation.
    pub is_personal: bool,
    pub text: String,
}

impl Inbound {
    pub fn new(chat_id: i64, username: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            username: username.into(),
            is_personal: true,
            text: text.into(),
        }
    }

    pub fn in_group(mut self) -> Self {
        self.is_personal = false;
        self
    }
}

/// A delivery instruction produced by the dispatcher.
///
/// The dispatcher performs no I/O itself; the transport loop maps these
/// onto the platform API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    Text { chat: i64, body: String },
    Photo { chat: i64, bytes: Vec<u8> },
}

impl Outgoing {
    pub fn text(chat: i64, body: impl Into<String>) -> Self {
        Outgoing::Text {
            chat,
            body: body.into(),
        }
    }

    pub fn photo(chat: i64, bytes: Vec<u8>) -> Self {
        Outgoing::Photo { chat, bytes }
    }

    /// The chat this instruction targets.
    pub fn chat(&self) -> i64 {
        match self {
            Outgoing::Text { chat, .. } | Outgoing::Photo { chat, .. } => *chat,
        }
    }
}

use chrono::NaiveDateTime;
use std::fmt;

/// Represents a user in the system.
///
/// Created once on first contact and immutable afterwards. The id is the
/// platform-assigned chat id of the one-to-one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_on: NaiveDateTime,
}

impl User {
    pub fn new(id: i64, username: impl Into<String>, created_on: NaiveDateTime) -> Self {
        Self {
            id,
            username: username.into(),
            created_on,
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.username)
    }
}

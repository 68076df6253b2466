//! Error types for HeartBot.

use uuid::Uuid;

/// Errors from the chat engine.
///
/// Classification and reply selection never fail; every variant here is a
/// rejected submission or a session lookup miss.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("chat is disabled")]
    Disabled,
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),
    #[error("a reply is still pending in session {0}")]
    TurnPending(Uuid),
    #[error("internal chat error: {0}")]
    Internal(String),
}

impl ChatError {
    /// True for rejections the user fixes by editing the message.
    pub fn is_validation(&self) -> bool {
        matches!(self, ChatError::EmptyMessage | ChatError::MessageTooLong(_))
    }
}

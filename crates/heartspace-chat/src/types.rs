//! Chat data model: topics, messages, transcripts, and session views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pools::WELCOME_MESSAGE;

// =============================================================================
// Topic
// =============================================================================

/// Category a user message is classified into. Each topic owns a reply pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Anxiety,
    Loneliness,
    Sleep,
    Work,
    Relationships,
    SelfCare,
    Gratitude,
    Overwhelmed,
    Positive,
    Relax,
    Difficult,
    Breathing,
    Motivation,
    Default,
}

impl Topic {
    pub const ALL: [Topic; 14] = [
        Topic::Anxiety,
        Topic::Loneliness,
        Topic::Sleep,
        Topic::Work,
        Topic::Relationships,
        Topic::SelfCare,
        Topic::Gratitude,
        Topic::Overwhelmed,
        Topic::Positive,
        Topic::Relax,
        Topic::Difficult,
        Topic::Breathing,
        Topic::Motivation,
        Topic::Default,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Anxiety => "anxiety",
            Topic::Loneliness => "loneliness",
            Topic::Sleep => "sleep",
            Topic::Work => "work",
            Topic::Relationships => "relationships",
            Topic::SelfCare => "self_care",
            Topic::Gratitude => "gratitude",
            Topic::Overwhelmed => "overwhelmed",
            Topic::Positive => "positive",
            Topic::Relax => "relax",
            Topic::Difficult => "difficult",
            Topic::Breathing => "breathing",
            Topic::Motivation => "motivation",
            Topic::Default => "default",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    pub topic: Topic,
    /// The keyword that selected `topic`; `None` for the fallback.
    pub keyword: Option<&'static str>,
}

// =============================================================================
// Messages and transcript
// =============================================================================

/// One line of a conversation. Immutable once created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub content: String,
    pub is_from_bot: bool,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content.into(), false)
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(content.into(), true)
    }

    fn new(content: String, is_from_bot: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            is_from_bot,
            timestamp: Utc::now(),
        }
    }
}

/// Ordered, append-only message history for one session.
///
/// Always starts with the bot's welcome message. Only the turn orchestrator
/// appends to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            messages: vec![Message::bot(WELCOME_MESSAGE)],
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// A transcript is never empty; it holds at least the welcome message.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages the user has sent.
    pub fn user_turns(&self) -> usize {
        self.messages.iter().filter(|m| !m.is_from_bot).count()
    }

    pub(crate) fn push(&mut self, message: Message) {
        self.messages.push(message);
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Session views
// =============================================================================

/// The two messages produced by one accepted submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub user_message: Message,
    pub reply: Message,
    pub topic: Topic,
}

/// Point-in-time copy of a session, safe to hand to callers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
    pub messages: Vec<Message>,
}

/// Lightweight listing entry for a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatSessionSummary {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
    pub message_count: usize,
}

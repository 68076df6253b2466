//! HeartBot: the scripted emotional-support companion.
//!
//! Classifies free text into a fixed set of topics by keyword, picks a
//! canned reply from that topic's pool, and records the exchange in a
//! per-session transcript.

pub mod classifier;
pub mod error;
pub mod orchestrator;
pub mod pools;
pub mod session;
pub mod types;

pub use classifier::IntentClassifier;
pub use error::ChatError;
pub use orchestrator::{HeartBot, TurnOrchestrator, TypingDelay};
pub use pools::{ResponseSelector, SUGGESTED_PROMPTS, WELCOME_MESSAGE};
pub use session::{ChatSession, SessionManager};
pub use types::{
    ChatSessionSummary, Classification, Message, SessionSnapshot, Topic, Transcript, TurnOutcome,
};

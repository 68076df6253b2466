//! Chat session state and idle-expiry bookkeeping.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::types::{ChatSessionSummary, SessionSnapshot, Transcript};

// =============================================================================
// ChatSession
// =============================================================================

/// One conversation: its owner, its transcript, and activity timestamps.
#[derive(Debug, Clone)]
pub struct ChatSession {
    pub id: Uuid,
    pub owner: Uuid,
    pub started_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
    pub transcript: Transcript,
    pub turn_count: u32,
}

impl ChatSession {
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            started_at: self.started_at,
            last_message_at: self.last_message_at,
            messages: self.transcript.messages().to_vec(),
        }
    }

    pub fn summary(&self) -> ChatSessionSummary {
        ChatSessionSummary {
            id: self.id,
            started_at: self.started_at,
            last_message_at: self.last_message_at,
            message_count: self.transcript.len(),
        }
    }
}

// =============================================================================
// SessionManager
// =============================================================================

/// Creates sessions and decides when an idle one has expired.
#[derive(Debug, Clone)]
pub struct SessionManager {
    /// Idle minutes before a session expires. Zero disables expiry.
    pub session_timeout_minutes: u32,
}

impl SessionManager {
    pub fn new(session_timeout_minutes: u32) -> Self {
        Self {
            session_timeout_minutes,
        }
    }

    /// Create a fresh session seeded with the welcome message.
    pub fn create_session(&self, owner: Uuid) -> ChatSession {
        let now = Utc::now();
        ChatSession {
            id: Uuid::new_v4(),
            owner,
            started_at: now,
            last_message_at: now,
            transcript: Transcript::new(),
            turn_count: 0,
        }
    }

    pub fn is_expired(&self, session: &ChatSession) -> bool {
        self.is_expired_at(session, Utc::now())
    }

    pub fn is_expired_at(&self, session: &ChatSession, now: DateTime<Utc>) -> bool {
        if self.session_timeout_minutes == 0 {
            return false;
        }
        let timeout = Duration::minutes(i64::from(self.session_timeout_minutes));
        now - session.last_message_at > timeout
    }

    /// Record a completed turn.
    pub fn touch(&self, session: &mut ChatSession) {
        session.last_message_at = Utc::now();
        session.turn_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_session() {
        let manager = SessionManager::new(30);
        let owner = Uuid::new_v4();
        let session = manager.create_session(owner);
        assert_eq!(session.owner, owner);
        assert_eq!(session.turn_count, 0);
        assert_eq!(session.transcript.len(), 1);
        assert_eq!(session.started_at, session.last_message_at);
    }

    #[test]
    fn test_sessions_get_unique_ids() {
        let manager = SessionManager::new(30);
        let a = manager.create_session(Uuid::nil());
        let b = manager.create_session(Uuid::nil());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_fresh_session_not_expired() {
        let manager = SessionManager::new(30);
        let session = manager.create_session(Uuid::nil());
        assert!(!manager.is_expired(&session));
    }

    #[test]
    fn test_idle_session_expires() {
        let manager = SessionManager::new(30);
        let mut session = manager.create_session(Uuid::nil());
        session.last_message_at = Utc::now() - Duration::minutes(31);
        assert!(manager.is_expired(&session));
    }

    #[test]
    fn test_expiry_boundary() {
        let manager = SessionManager::new(30);
        let session = manager.create_session(Uuid::nil());
        let at_limit = session.last_message_at + Duration::minutes(30);
        assert!(!manager.is_expired_at(&session, at_limit));
        assert!(manager.is_expired_at(&session, at_limit + Duration::seconds(1)));
    }

    #[test]
    fn test_zero_timeout_never_expires() {
        let manager = SessionManager::new(0);
        let mut session = manager.create_session(Uuid::nil());
        session.last_message_at = Utc::now() - Duration::days(365);
        assert!(!manager.is_expired(&session));
    }

    #[test]
    fn test_touch_updates_activity() {
        let manager = SessionManager::new(30);
        let mut session = manager.create_session(Uuid::nil());
        session.last_message_at = Utc::now() - Duration::minutes(10);
        manager.touch(&mut session);
        assert_eq!(session.turn_count, 1);
        assert!(!manager.is_expired(&session));
        assert!(session.last_message_at > session.started_at - Duration::seconds(1));
    }

    #[test]
    fn test_snapshot_and_summary() {
        let manager = SessionManager::new(30);
        let session = manager.create_session(Uuid::nil());
        let snap = session.snapshot();
        assert_eq!(snap.id, session.id);
        assert_eq!(snap.messages.len(), 1);
        let summary = session.summary();
        assert_eq!(summary.message_count, 1);
    }
}

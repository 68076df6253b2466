//! Turn orchestration and the HeartBot session facade.
//!
//! [`TurnOrchestrator`] runs one turn against a transcript: validate, classify,
//! pick a reply, wait out the typing delay, append both messages.
//! [`HeartBot`] owns the per-user session registry on top of it and enforces
//! one pending turn per session for callers that share sessions across tasks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use heartspace_core::config::HeartBotConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use uuid::Uuid;

use crate::classifier::IntentClassifier;
use crate::error::ChatError;
use crate::pools::ResponseSelector;
use crate::session::{ChatSession, SessionManager};
use crate::types::{ChatSessionSummary, Message, SessionSnapshot, Transcript, TurnOutcome};

// =============================================================================
// TypingDelay
// =============================================================================

/// Uniform range the simulated "typing" pause is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingDelay {
    min: Duration,
    max: Duration,
}

impl TypingDelay {
    /// An inverted range collapses to `min`.
    pub fn new(min: Duration, max: Duration) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }

    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn from_config(config: &HeartBotConfig) -> Self {
        let (min, max) = config.typing_delay_range();
        Self::new(min, max)
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let min_ms = self.min.as_millis() as u64;
        let max_ms = self.max.as_millis() as u64;
        Duration::from_millis(rng.random_range(min_ms..=max_ms))
    }
}

// =============================================================================
// TurnOrchestrator
// =============================================================================

/// Runs a single user turn against a transcript.
pub struct TurnOrchestrator<R = StdRng> {
    classifier: IntentClassifier,
    selector: ResponseSelector,
    delay: TypingDelay,
    max_message_length: usize,
    rng: Mutex<R>,
}

impl TurnOrchestrator<StdRng> {
    /// Create an orchestrator seeded from the operating system.
    pub fn new(config: &HeartBotConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }
}

impl<R: Rng + Send> TurnOrchestrator<R> {
    /// Create an orchestrator drawing replies and delays from `rng`.
    pub fn with_rng(config: &HeartBotConfig, rng: R) -> Self {
        Self {
            classifier: IntentClassifier::new(),
            selector: ResponseSelector::new(),
            delay: TypingDelay::from_config(config),
            max_message_length: config.max_message_length,
            rng: Mutex::new(rng),
        }
    }

    pub fn typing_delay(&self) -> TypingDelay {
        self.delay
    }

    /// Reject text that would not produce a turn.
    pub fn validate(&self, text: &str) -> Result<(), ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if text.chars().count() > self.max_message_length {
            return Err(ChatError::MessageTooLong(self.max_message_length));
        }
        Ok(())
    }

    /// Submit one user message and wait for the bot's reply.
    ///
    /// On success the transcript has grown by exactly two messages, the user
    /// message followed by the reply. On a validation failure it is
    /// unchanged. Both messages are appended after the typing delay, so a
    /// future dropped mid-delay leaves the transcript as it was.
    pub async fn submit_user_message(
        &self,
        transcript: &mut Transcript,
        text: &str,
    ) -> Result<TurnOutcome, ChatError> {
        self.validate(text)?;

        let user_message = Message::user(text);
        let classification = self.classifier.explain(text);

        let (reply, delay) = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|e| ChatError::Internal(format!("rng lock poisoned: {}", e)))?;
            let reply = self
                .selector
                .select_reply(classification.topic, &mut *rng);
            (reply, self.delay.sample(&mut *rng))
        };

        debug!(
            topic = %classification.topic,
            keyword = ?classification.keyword,
            delay_ms = delay.as_millis() as u64,
            "Classified user message"
        );

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let bot_message = Message::bot(reply);
        transcript.push(user_message.clone());
        transcript.push(bot_message.clone());

        Ok(TurnOutcome {
            user_message,
            reply: bot_message,
            topic: classification.topic,
        })
    }
}

// =============================================================================
// HeartBot
// =============================================================================

struct SessionSlot {
    owner: Uuid,
    session: Arc<tokio::sync::Mutex<ChatSession>>,
}

/// Session registry plus turn orchestration, shared across request handlers.
///
/// Each session sits behind its own async mutex. A submission that finds the
/// mutex held gets [`ChatError::TurnPending`] instead of queueing. Sessions
/// owned by another user are reported as not found.
pub struct HeartBot<R = StdRng> {
    enabled: bool,
    orchestrator: Arc<TurnOrchestrator<R>>,
    sessions: SessionManager,
    registry: Mutex<HashMap<Uuid, SessionSlot>>,
    chats_started: Mutex<HashMap<Uuid, u64>>,
}

impl HeartBot<StdRng> {
    pub fn new(config: &HeartBotConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }
}

impl<R: Rng + Send + 'static> HeartBot<R> {
    pub fn with_rng(config: &HeartBotConfig, rng: R) -> Self {
        Self {
            enabled: config.enabled,
            orchestrator: Arc::new(TurnOrchestrator::with_rng(config, rng)),
            sessions: SessionManager::new(config.session_timeout_minutes),
            registry: Mutex::new(HashMap::new()),
            chats_started: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn orchestrator(&self) -> &TurnOrchestrator<R> {
        &self.orchestrator
    }

    /// Start a new session for `owner`, seeded with the welcome message.
    pub fn start_session(&self, owner: Uuid) -> Result<SessionSnapshot, ChatError> {
        if !self.enabled {
            return Err(ChatError::Disabled);
        }

        let session = self.sessions.create_session(owner);
        let snapshot = session.snapshot();
        self.registry()?.insert(
            session.id,
            SessionSlot {
                owner,
                session: Arc::new(tokio::sync::Mutex::new(session)),
            },
        );
        *self.counters()?.entry(owner).or_insert(0) += 1;

        info!(session_id = %snapshot.id, user_id = %owner, "HeartBot session started");
        Ok(snapshot)
    }

    /// Current transcript of a session. Waits for a pending turn to finish.
    pub async fn get_session(&self, owner: Uuid, id: Uuid) -> Result<SessionSnapshot, ChatError> {
        let session = self.lookup(owner, id)?;
        let guard = session.lock().await;
        if self.sessions.is_expired(&guard) {
            drop(guard);
            self.expire(id)?;
            return Err(ChatError::SessionNotFound(id));
        }
        Ok(guard.snapshot())
    }

    /// Submit a user message to a session and return the completed turn.
    ///
    /// The turn runs on its own task so it completes even if the caller
    /// stops waiting. If the session is ended before the reply lands, the
    /// reply is discarded and `SessionNotFound` is returned.
    pub async fn send_message(
        &self,
        owner: Uuid,
        id: Uuid,
        text: &str,
    ) -> Result<TurnOutcome, ChatError> {
        if !self.enabled {
            return Err(ChatError::Disabled);
        }
        let session = self.lookup(owner, id)?;
        self.orchestrator.validate(text)?;

        let mut guard = session
            .try_lock_owned()
            .map_err(|_| ChatError::TurnPending(id))?;

        if self.sessions.is_expired(&guard) {
            drop(guard);
            self.expire(id)?;
            return Err(ChatError::SessionNotFound(id));
        }

        let orchestrator = Arc::clone(&self.orchestrator);
        let manager = self.sessions.clone();
        let text = text.to_string();
        let turn = tokio::spawn(async move {
            let outcome = orchestrator
                .submit_user_message(&mut guard.transcript, &text)
                .await?;
            manager.touch(&mut guard);
            Ok::<_, ChatError>(outcome)
        });

        let outcome = turn
            .await
            .map_err(|e| ChatError::Internal(format!("turn task failed: {}", e)))??;

        if !self.registry()?.contains_key(&id) {
            debug!(session_id = %id, "Session ended while reply was pending; reply discarded");
            return Err(ChatError::SessionNotFound(id));
        }

        debug!(session_id = %id, topic = %outcome.topic, "HeartBot turn completed");
        Ok(outcome)
    }

    /// End a session. A reply still pending in it is discarded.
    pub fn end_session(&self, owner: Uuid, id: Uuid) -> Result<(), ChatError> {
        let mut registry = self.registry()?;
        match registry.get(&id) {
            Some(slot) if slot.owner == owner => {
                registry.remove(&id);
                info!(session_id = %id, "HeartBot session ended");
                Ok(())
            }
            _ => Err(ChatError::SessionNotFound(id)),
        }
    }

    /// Summaries of `owner`'s live sessions, most recently active first.
    pub async fn list_sessions(&self, owner: Uuid) -> Result<Vec<ChatSessionSummary>, ChatError> {
        let owned: Vec<_> = self
            .registry()?
            .values()
            .filter(|slot| slot.owner == owner)
            .map(|slot| Arc::clone(&slot.session))
            .collect();

        let mut summaries = Vec::with_capacity(owned.len());
        for session in owned {
            let guard = session.lock().await;
            if !self.sessions.is_expired(&guard) {
                summaries.push(guard.summary());
            }
        }
        summaries.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
        Ok(summaries)
    }

    /// Number of sessions `owner` has ever started in this process.
    pub fn chats_started(&self, owner: Uuid) -> Result<u64, ChatError> {
        Ok(self.counters()?.get(&owner).copied().unwrap_or(0))
    }

    /// Drop idle sessions. Sessions with a pending turn are kept.
    pub fn purge_expired(&self) -> Result<usize, ChatError> {
        let mut registry = self.registry()?;
        let before = registry.len();
        registry.retain(|_, slot| match slot.session.try_lock() {
            Ok(session) => !self.sessions.is_expired(&session),
            Err(_) => true,
        });
        let purged = before - registry.len();
        if purged > 0 {
            info!(purged, "Purged expired HeartBot sessions");
        }
        Ok(purged)
    }

    fn lookup(
        &self,
        owner: Uuid,
        id: Uuid,
    ) -> Result<Arc<tokio::sync::Mutex<ChatSession>>, ChatError> {
        self.registry()?
            .get(&id)
            .filter(|slot| slot.owner == owner)
            .map(|slot| Arc::clone(&slot.session))
            .ok_or(ChatError::SessionNotFound(id))
    }

    fn expire(&self, id: Uuid) -> Result<(), ChatError> {
        if self.registry()?.remove(&id).is_some() {
            info!(session_id = %id, "HeartBot session expired");
        }
        Ok(())
    }

    fn registry(&self) -> Result<MutexGuard<'_, HashMap<Uuid, SessionSlot>>, ChatError> {
        self.registry
            .lock()
            .map_err(|e| ChatError::Internal(format!("session lock poisoned: {}", e)))
    }

    fn counters(&self) -> Result<MutexGuard<'_, HashMap<Uuid, u64>>, ChatError> {
        self.chats_started
            .lock()
            .map_err(|e| ChatError::Internal(format!("counter lock poisoned: {}", e)))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pools::pool;
    use crate::types::Topic;

    fn seeded_orchestrator() -> TurnOrchestrator<StdRng> {
        TurnOrchestrator::with_rng(&HeartBotConfig::instant(), StdRng::seed_from_u64(1))
    }

    fn seeded_bot(config: HeartBotConfig) -> HeartBot<StdRng> {
        HeartBot::with_rng(&config, StdRng::seed_from_u64(2))
    }

    fn delayed_config(min_ms: u64, max_ms: u64) -> HeartBotConfig {
        HeartBotConfig {
            typing_delay_min_ms: min_ms,
            typing_delay_max_ms: max_ms,
            ..HeartBotConfig::instant()
        }
    }

    // ---- TypingDelay ----

    #[test]
    fn test_typing_delay_within_range() {
        let delay = TypingDelay::new(Duration::from_millis(1000), Duration::from_millis(3000));
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let d = delay.sample(&mut rng);
            assert!(d >= delay.min() && d <= delay.max());
        }
    }

    #[test]
    fn test_typing_delay_zero_range() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(TypingDelay::none().sample(&mut rng), Duration::ZERO);
    }

    #[test]
    fn test_typing_delay_inverted_range_collapses() {
        let delay = TypingDelay::new(Duration::from_millis(500), Duration::from_millis(100));
        assert_eq!(delay.max(), Duration::from_millis(500));
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(delay.sample(&mut rng), Duration::from_millis(500));
    }

    // ---- TurnOrchestrator ----

    #[tokio::test]
    async fn test_submit_appends_user_then_bot() {
        let orch = seeded_orchestrator();
        let mut transcript = Transcript::new();

        let outcome = orch
            .submit_user_message(&mut transcript, "I'm having a difficult day")
            .await
            .unwrap();

        assert_eq!(outcome.topic, Topic::Difficult);
        assert!(pool(Topic::Difficult).contains(&outcome.reply.content.as_str()));
        assert_eq!(transcript.len(), 3);
        let messages = transcript.messages();
        assert!(!messages[1].is_from_bot);
        assert_eq!(messages[1].content, "I'm having a difficult day");
        assert!(messages[2].is_from_bot);
        assert_eq!(messages[2], outcome.reply);
        assert_eq!(messages[1], outcome.user_message);
    }

    #[tokio::test]
    async fn test_submit_rejects_empty_and_whitespace() {
        let orch = seeded_orchestrator();
        let mut transcript = Transcript::new();

        for text in ["", "   ", "\n\t"] {
            let err = orch
                .submit_user_message(&mut transcript, text)
                .await
                .unwrap_err();
            assert!(matches!(err, ChatError::EmptyMessage));
        }
        assert_eq!(transcript.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_rejects_too_long() {
        let config = HeartBotConfig {
            max_message_length: 10,
            ..HeartBotConfig::instant()
        };
        let orch = TurnOrchestrator::with_rng(&config, StdRng::seed_from_u64(1));
        let mut transcript = Transcript::new();

        let err = orch
            .submit_user_message(&mut transcript, "this is far too long")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::MessageTooLong(10)));
        assert_eq!(transcript.len(), 1);
    }

    #[tokio::test]
    async fn test_unmatched_text_gets_default_reply() {
        let orch = seeded_orchestrator();
        let mut transcript = Transcript::new();
        let outcome = orch
            .submit_user_message(&mut transcript, "asdkfj random text")
            .await
            .unwrap();
        assert_eq!(outcome.topic, Topic::Default);
        assert!(pool(Topic::Default).contains(&outcome.reply.content.as_str()));
    }

    #[tokio::test]
    async fn test_consecutive_turns_keep_order() {
        let orch = seeded_orchestrator();
        let mut transcript = Transcript::new();

        let first = orch
            .submit_user_message(&mut transcript, "I'm feeling overwhelmed")
            .await
            .unwrap();
        let second = orch
            .submit_user_message(&mut transcript, "I need motivation")
            .await
            .unwrap();

        assert_eq!(first.topic, Topic::Overwhelmed);
        assert_eq!(second.topic, Topic::Motivation);
        assert_eq!(transcript.len(), 5);
        let flags: Vec<bool> = transcript.messages().iter().map(|m| m.is_from_bot).collect();
        assert_eq!(flags, vec![true, false, true, false, true]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_delay_is_observed() {
        let orch = TurnOrchestrator::with_rng(&delayed_config(1000, 3000), StdRng::seed_from_u64(5));
        let mut transcript = Transcript::new();

        let start = tokio::time::Instant::now();
        orch.submit_user_message(&mut transcript, "Help me relax")
            .await
            .unwrap();
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_millis(1000), "{elapsed:?}");
        assert!(elapsed <= Duration::from_millis(3100), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_turn_leaves_transcript_untouched() {
        let orch = TurnOrchestrator::with_rng(&delayed_config(1000, 1000), StdRng::seed_from_u64(5));
        let mut transcript = Transcript::new();

        let result = tokio::time::timeout(
            Duration::from_millis(10),
            orch.submit_user_message(&mut transcript, "Help me relax"),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(transcript.len(), 1);
    }

    // ---- HeartBot sessions ----

    #[tokio::test]
    async fn test_session_lifecycle() {
        let bot = seeded_bot(HeartBotConfig::instant());
        let owner = Uuid::new_v4();

        let snapshot = bot.start_session(owner).unwrap();
        assert_eq!(snapshot.messages.len(), 1);
        assert!(snapshot.messages[0].is_from_bot);

        let outcome = bot
            .send_message(owner, snapshot.id, "Can you guide me through breathing?")
            .await
            .unwrap();
        assert_eq!(outcome.topic, Topic::Breathing);

        let current = bot.get_session(owner, snapshot.id).await.unwrap();
        assert_eq!(current.messages.len(), 3);

        bot.end_session(owner, snapshot.id).unwrap();
        assert!(matches!(
            bot.get_session(owner, snapshot.id).await,
            Err(ChatError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_sessions_do_not_share_state() {
        let bot = seeded_bot(HeartBotConfig::instant());
        let owner = Uuid::new_v4();
        let a = bot.start_session(owner).unwrap();
        let b = bot.start_session(owner).unwrap();

        let in_b = bot.send_message(owner, b.id, "I need motivation").await.unwrap();
        let in_a = bot
            .send_message(owner, a.id, "I'm feeling overwhelmed")
            .await
            .unwrap();

        assert_eq!(in_a.topic, Topic::Overwhelmed);
        assert_eq!(in_b.topic, Topic::Motivation);
        assert_eq!(bot.get_session(owner, a.id).await.unwrap().messages.len(), 3);
        assert_eq!(bot.get_session(owner, b.id).await.unwrap().messages.len(), 3);
    }

    #[tokio::test]
    async fn test_other_users_session_is_not_found() {
        let bot = seeded_bot(HeartBotConfig::instant());
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let session = bot.start_session(alice).unwrap();

        assert!(matches!(
            bot.get_session(bob, session.id).await,
            Err(ChatError::SessionNotFound(_))
        ));
        assert!(matches!(
            bot.send_message(bob, session.id, "hello").await,
            Err(ChatError::SessionNotFound(_))
        ));
        assert!(bot.end_session(bob, session.id).is_err());
        assert!(bot.get_session(alice, session.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_blank_message_to_unknown_session_is_not_found() {
        let bot = seeded_bot(HeartBotConfig::instant());
        let alice = Uuid::new_v4();
        let session = bot.start_session(alice).unwrap();

        assert!(matches!(
            bot.send_message(alice, Uuid::new_v4(), "   ").await,
            Err(ChatError::SessionNotFound(_))
        ));
        assert!(matches!(
            bot.send_message(Uuid::new_v4(), session.id, "").await,
            Err(ChatError::SessionNotFound(_))
        ));
        assert!(matches!(
            bot.send_message(alice, session.id, "").await,
            Err(ChatError::EmptyMessage)
        ));
    }

    #[tokio::test]
    async fn test_empty_message_not_recorded() {
        let bot = seeded_bot(HeartBotConfig::instant());
        let owner = Uuid::new_v4();
        let session = bot.start_session(owner).unwrap();

        let err = bot.send_message(owner, session.id, "   ").await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyMessage));
        assert_eq!(
            bot.get_session(owner, session.id).await.unwrap().messages.len(),
            1
        );
    }

    #[tokio::test]
    async fn test_disabled_bot_rejects() {
        let config = HeartBotConfig {
            enabled: false,
            ..HeartBotConfig::instant()
        };
        let bot = seeded_bot(config);
        assert!(matches!(
            bot.start_session(Uuid::new_v4()),
            Err(ChatError::Disabled)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submission_while_pending_is_rejected() {
        let bot = Arc::new(seeded_bot(delayed_config(2000, 2000)));
        let owner = Uuid::new_v4();
        let session = bot.start_session(owner).unwrap();

        let id = session.id;
        let pending = {
            let bot = Arc::clone(&bot);
            tokio::spawn(async move { bot.send_message(owner, id, "Help me relax").await })
        };
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }

        let err = bot
            .send_message(owner, session.id, "I need motivation")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::TurnPending(id) if id == session.id));

        let first = pending.await.unwrap().unwrap();
        assert_eq!(first.topic, Topic::Relax);
        let snapshot = bot.get_session(owner, session.id).await.unwrap();
        assert_eq!(snapshot.messages.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ending_session_discards_pending_reply() {
        let bot = Arc::new(seeded_bot(delayed_config(2000, 2000)));
        let owner = Uuid::new_v4();
        let session = bot.start_session(owner).unwrap();

        let id = session.id;
        let pending = {
            let bot = Arc::clone(&bot);
            tokio::spawn(async move { bot.send_message(owner, id, "Help me relax").await })
        };
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }

        bot.end_session(owner, session.id).unwrap();
        let result = pending.await.unwrap();
        assert!(matches!(result, Err(ChatError::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn test_expired_session_is_removed() {
        let config = HeartBotConfig {
            session_timeout_minutes: 30,
            ..HeartBotConfig::instant()
        };
        let bot = seeded_bot(config);
        let owner = Uuid::new_v4();
        let session = bot.start_session(owner).unwrap();

        {
            let slot = bot.lookup(owner, session.id).unwrap();
            slot.lock().await.last_message_at = chrono::Utc::now() - chrono::Duration::hours(1);
        }

        assert!(matches!(
            bot.send_message(owner, session.id, "hello").await,
            Err(ChatError::SessionNotFound(_))
        ));
        assert!(bot.list_sessions(owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let bot = seeded_bot(HeartBotConfig::instant());
        let owner = Uuid::new_v4();
        let stale = bot.start_session(owner).unwrap();
        let fresh = bot.start_session(owner).unwrap();

        {
            let slot = bot.lookup(owner, stale.id).unwrap();
            slot.lock().await.last_message_at = chrono::Utc::now() - chrono::Duration::days(1);
        }

        assert_eq!(bot.purge_expired().unwrap(), 1);
        let remaining = bot.list_sessions(owner).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, fresh.id);
    }

    #[tokio::test]
    async fn test_chats_started_counts_per_user() {
        let bot = seeded_bot(HeartBotConfig::instant());
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        bot.start_session(alice).unwrap();
        let s = bot.start_session(alice).unwrap();
        bot.end_session(alice, s.id).unwrap();

        assert_eq!(bot.chats_started(alice).unwrap(), 2);
        assert_eq!(bot.chats_started(bob).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_sessions_only_own() {
        let bot = seeded_bot(HeartBotConfig::instant());
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        bot.start_session(alice).unwrap();
        bot.start_session(alice).unwrap();
        bot.start_session(bob).unwrap();

        assert_eq!(bot.list_sessions(alice).await.unwrap().len(), 2);
        assert_eq!(bot.list_sessions(bob).await.unwrap().len(), 1);
    }
}

//! Application state shared across all route handlers.
//!
//! AppState holds the services behind the API. It is passed to handlers via
//! axum's State extractor and cloned per request.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use heartspace_chat::HeartBot;
use heartspace_core::config::HeartspaceConfig;
use heartspace_storage::{
    AccountService, AffirmationRepository, CommentRepository, Database, GratitudeRepository,
    LikeRepository, LocalMediaStore, MoodRepository, QueryService,
};

use crate::rate_limit::RateLimiter;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks. Chat
/// sessions live inside `heartbot` and are never persisted.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration, fixed for the life of the server.
    pub config: Arc<HeartspaceConfig>,
    pub database: Arc<Database>,
    pub accounts: Arc<AccountService>,
    pub gratitude: Arc<GratitudeRepository>,
    pub moods: Arc<MoodRepository>,
    pub affirmations: Arc<AffirmationRepository>,
    pub likes: Arc<LikeRepository>,
    pub comments: Arc<CommentRepository>,
    pub queries: Arc<QueryService>,
    pub media: Arc<LocalMediaStore>,
    pub heartbot: Arc<HeartBot>,
    /// Throttle for the unauthenticated sign-up and login routes.
    pub auth_limiter: RateLimiter,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Wire every service to `database`, storing uploads under `media_root`.
    pub fn new(config: HeartspaceConfig, database: Database, media_root: PathBuf) -> Self {
        let db = Arc::new(database);
        let max_len = config.community.max_content_length;

        Self {
            accounts: Arc::new(AccountService::new(Arc::clone(&db), config.auth.clone())),
            gratitude: Arc::new(GratitudeRepository::new(Arc::clone(&db), max_len)),
            moods: Arc::new(MoodRepository::new(Arc::clone(&db), max_len)),
            affirmations: Arc::new(AffirmationRepository::new(Arc::clone(&db), max_len)),
            likes: Arc::new(LikeRepository::new(Arc::clone(&db))),
            comments: Arc::new(CommentRepository::new(Arc::clone(&db), max_len)),
            queries: Arc::new(QueryService::new(Arc::clone(&db))),
            media: Arc::new(LocalMediaStore::new(media_root, config.media.clone())),
            heartbot: Arc::new(HeartBot::new(&config.heartbot)),
            auth_limiter: RateLimiter::new(config.auth.rate_limit_per_sec),
            database: db,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }
}

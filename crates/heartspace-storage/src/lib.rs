//! HeartSpace storage: SQLite content store, accounts, and media files.
//!
//! Provides a WAL-mode SQLite database with migrations, repositories for
//! gratitude, mood, affirmation, like, and comment rows, the account
//! service, the local media store, and dashboard queries.

pub mod accounts;
pub mod db;
pub mod media;
pub mod migrations;
pub mod queries;
pub mod repository;

pub use accounts::{AccountService, AuthSession};
pub use db::Database;
pub use media::LocalMediaStore;
pub use queries::QueryService;
pub use repository::{
    AffirmationRepository, CommentRepository, GratitudeRepository, LikeRepository,
    MoodRepository,
};

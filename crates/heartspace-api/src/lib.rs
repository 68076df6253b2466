//! HeartSpace API crate - axum HTTP server, route handlers, auth middleware.
//!
//! Provides the REST API for accounts, HeartBot chat sessions, the gratitude
//! journal, mood tracker, community affirmations, media uploads, and the
//! dashboard.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;

//! Database schema migrations.
//!
//! Version 1 creates the account, token, gratitude, mood, affirmation,
//! like, and comment tables.

use rusqlite::Connection;
use tracing::info;

use heartspace_core::error::HeartspaceError;

/// Run all pending database migrations.
pub fn run_migrations(conn: &Connection) -> Result<(), HeartspaceError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| HeartspaceError::Storage(format!("Failed to create migrations table: {}", e)))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| {
            HeartspaceError::Storage(format!("Failed to query migration version: {}", e))
        })?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: initial_schema");
    }

    Ok(())
}

/// Current schema version recorded in `schema_migrations`.
pub fn schema_version(conn: &Connection) -> Result<i64, HeartspaceError> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )
    .map_err(|e| HeartspaceError::Storage(e.to_string()))
}

/// Version 1: Initial schema. Timestamps are Unix milliseconds.
fn apply_v1(conn: &Connection) -> Result<(), HeartspaceError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id              TEXT PRIMARY KEY NOT NULL,
            email           TEXT NOT NULL UNIQUE COLLATE NOCASE,
            name            TEXT NOT NULL,
            password_hash   TEXT NOT NULL,
            created_at      INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS auth_tokens (
            token           TEXT PRIMARY KEY NOT NULL,
            user_id         TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
            created_at      INTEGER NOT NULL,
            expires_at      INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_auth_tokens_user
            ON auth_tokens (user_id);

        CREATE TABLE IF NOT EXISTS gratitude_entries (
            id              TEXT PRIMARY KEY NOT NULL,
            user_id         TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
            content         TEXT NOT NULL,
            category        TEXT NOT NULL DEFAULT 'Self'
                            CHECK (category IN ('Health', 'Relationships', 'Self', 'Work')),
            emoji           TEXT,
            created_at      INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_gratitude_user_created
            ON gratitude_entries (user_id, created_at DESC);

        CREATE TABLE IF NOT EXISTS mood_entries (
            id              TEXT PRIMARY KEY NOT NULL,
            user_id         TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
            mood            TEXT NOT NULL
                            CHECK (mood IN ('Happy', 'Neutral', 'Sad', 'Anxious', 'Excited')),
            note            TEXT,
            day             TEXT NOT NULL,
            created_at      INTEGER NOT NULL,
            UNIQUE (user_id, day)
        );

        CREATE INDEX IF NOT EXISTS idx_mood_user_created
            ON mood_entries (user_id, created_at DESC);

        CREATE TABLE IF NOT EXISTS affirmations (
            id              TEXT PRIMARY KEY NOT NULL,
            user_id         TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
            content         TEXT NOT NULL,
            author          TEXT,
            is_anonymous    INTEGER NOT NULL DEFAULT 0,
            created_at      INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_affirmations_created
            ON affirmations (created_at DESC);

        CREATE TABLE IF NOT EXISTS affirmation_likes (
            affirmation_id  TEXT NOT NULL REFERENCES affirmations (id) ON DELETE CASCADE,
            user_id         TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
            created_at      INTEGER NOT NULL,
            PRIMARY KEY (affirmation_id, user_id)
        );

        CREATE INDEX IF NOT EXISTS idx_likes_user
            ON affirmation_likes (user_id);

        CREATE TABLE IF NOT EXISTS comments (
            id              TEXT PRIMARY KEY NOT NULL,
            user_id         TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
            post_kind       TEXT NOT NULL
                            CHECK (post_kind IN ('affirmation', 'gratitude')),
            post_id         TEXT NOT NULL,
            content         TEXT NOT NULL,
            author_name     TEXT,
            is_anonymous    INTEGER NOT NULL DEFAULT 0,
            created_at      INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_comments_post
            ON comments (post_kind, post_id, created_at);

        INSERT INTO schema_migrations (version, name) VALUES (1, 'initial_schema');
        ",
    )
    .map_err(|e| HeartspaceError::Storage(format!("Migration v1 failed: {}", e)))?;

    Ok(())
}

//! Repository implementations for SQLite-backed persistence.
//!
//! Provides GratitudeRepository, MoodRepository, AffirmationRepository,
//! LikeRepository, and CommentRepository over the shared Database using
//! raw SQL. Lists are newest-first except comments, which read in
//! conversation order.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, SubsecRound, TimeZone, Utc};
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};
use uuid::Uuid;

use heartspace_core::error::HeartspaceError;
use heartspace_core::types::{
    validate_content, Affirmation, AffirmationView, Comment, GratitudeCategory, GratitudeEntry,
    Mood, MoodEntry, MoodStats, NewGratitudeEntry, PostRef, User,
};

use crate::db::Database;

/// Number of recent mood entries summarized by [`MoodRepository::stats`].
pub const MOOD_STATS_WINDOW: u32 = 7;

// =============================================================================
// Row helpers
// =============================================================================

pub(crate) fn storage_err(e: rusqlite::Error) -> HeartspaceError {
    HeartspaceError::Storage(e.to_string())
}

/// Current time at the millisecond precision rows are stored with.
pub(crate) fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

pub(crate) fn from_millis(ms: i64) -> Result<DateTime<Utc>, HeartspaceError> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| HeartspaceError::Storage(format!("Invalid timestamp: {}", ms)))
}

pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, HeartspaceError> {
    Uuid::parse_str(s).map_err(|e| HeartspaceError::Storage(format!("Invalid UUID '{}': {}", s, e)))
}

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _) if err.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn post_owner(conn: &Connection, post: PostRef) -> Result<Option<Uuid>, HeartspaceError> {
    let sql = match post {
        PostRef::Affirmation(_) => "SELECT user_id FROM affirmations WHERE id = ?1",
        PostRef::Gratitude(_) => "SELECT user_id FROM gratitude_entries WHERE id = ?1",
    };
    let owner: Option<String> = conn
        .query_row(sql, rusqlite::params![post.id().to_string()], |row| row.get(0))
        .optional()
        .map_err(storage_err)?;
    owner.as_deref().map(parse_uuid).transpose()
}

/// Delete a post's comments, then the post row itself, in one transaction.
fn delete_post(conn: &Connection, post: PostRef) -> Result<(), HeartspaceError> {
    let tx = conn.unchecked_transaction().map_err(storage_err)?;
    tx.execute(
        "DELETE FROM comments WHERE post_kind = ?1 AND post_id = ?2",
        rusqlite::params![post.kind(), post.id().to_string()],
    )
    .map_err(storage_err)?;
    let sql = match post {
        PostRef::Affirmation(_) => "DELETE FROM affirmations WHERE id = ?1",
        PostRef::Gratitude(_) => "DELETE FROM gratitude_entries WHERE id = ?1",
    };
    tx.execute(sql, rusqlite::params![post.id().to_string()])
        .map_err(storage_err)?;
    tx.commit().map_err(storage_err)
}

/// Check that `user_id` owns `post`, distinguishing missing from foreign.
fn ensure_owner(conn: &Connection, user_id: Uuid, post: PostRef) -> Result<(), HeartspaceError> {
    match post_owner(conn, post)? {
        None => Err(HeartspaceError::NotFound(format!(
            "{} {}",
            post.kind(),
            post.id()
        ))),
        Some(owner) if owner != user_id => Err(HeartspaceError::Forbidden(format!(
            "{} {} belongs to another user",
            post.kind(),
            post.id()
        ))),
        Some(_) => Ok(()),
    }
}

// =============================================================================
// Gratitude
// =============================================================================

/// Repository for private gratitude journal entries.
pub struct GratitudeRepository {
    db: Arc<Database>,
    max_content_length: usize,
}

impl GratitudeRepository {
    pub fn new(db: Arc<Database>, max_content_length: usize) -> Self {
        Self {
            db,
            max_content_length,
        }
    }

    /// Store a new entry for `user_id`.
    pub fn insert(
        &self,
        user_id: Uuid,
        entry: &NewGratitudeEntry,
    ) -> Result<GratitudeEntry, HeartspaceError> {
        let content = validate_content(&entry.content, self.max_content_length, "Gratitude entry")?;
        let saved = GratitudeEntry {
            id: Uuid::new_v4(),
            user_id,
            content,
            category: entry.category,
            emoji: optional_text(entry.emoji.as_deref()),
            created_at: now_millis(),
        };

        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO gratitude_entries (id, user_id, content, category, emoji, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    saved.id.to_string(),
                    saved.user_id.to_string(),
                    saved.content,
                    saved.category.as_str(),
                    saved.emoji,
                    saved.created_at.timestamp_millis(),
                ],
            )
            .map_err(|e| HeartspaceError::Storage(format!("Failed to save gratitude entry: {}", e)))?;
            Ok(())
        })?;

        debug!(entry_id = %saved.id, category = %saved.category, "Gratitude entry saved");
        Ok(saved)
    }

    /// Entries for a user, newest first, optionally filtered by category.
    pub fn list_for_user(
        &self,
        user_id: Uuid,
        category: Option<GratitudeCategory>,
    ) -> Result<Vec<GratitudeEntry>, HeartspaceError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, user_id, content, category, emoji, created_at
                     FROM gratitude_entries
                     WHERE user_id = ?1 AND (?2 IS NULL OR category = ?2)
                     ORDER BY created_at DESC, rowid DESC",
                )
                .map_err(storage_err)?;

            let rows = stmt
                .query_map(
                    rusqlite::params![user_id.to_string(), category.map(|c| c.as_str())],
                    |row| Ok(row_to_gratitude(row)),
                )
                .map_err(storage_err)?;

            let mut entries = Vec::new();
            for row in rows {
                entries.push(row.map_err(storage_err)??);
            }
            Ok(entries)
        })
    }

    pub fn find_by_id(&self, id: Uuid) -> Result<Option<GratitudeEntry>, HeartspaceError> {
        self.db.with_conn(|conn| {
            let result = conn
                .query_row(
                    "SELECT id, user_id, content, category, emoji, created_at
                     FROM gratitude_entries WHERE id = ?1",
                    rusqlite::params![id.to_string()],
                    |row| Ok(row_to_gratitude(row)),
                )
                .optional()
                .map_err(storage_err)?;
            result.transpose()
        })
    }

    pub fn count_for_user(&self, user_id: Uuid) -> Result<u64, HeartspaceError> {
        self.db.with_conn(|conn| {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM gratitude_entries WHERE user_id = ?1",
                    rusqlite::params![user_id.to_string()],
                    |row| row.get(0),
                )
                .map_err(storage_err)?;
            Ok(count as u64)
        })
    }

    /// Delete an entry and its comments. Only the owner may delete.
    pub fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), HeartspaceError> {
        let post = PostRef::Gratitude(id);
        self.db.with_conn(|conn| {
            ensure_owner(conn, user_id, post)?;
            delete_post(conn, post)
        })?;
        info!(entry_id = %id, "Gratitude entry deleted");
        Ok(())
    }
}

fn row_to_gratitude(row: &rusqlite::Row<'_>) -> Result<GratitudeEntry, HeartspaceError> {
    let id: String = row.get(0).map_err(storage_err)?;
    let user_id: String = row.get(1).map_err(storage_err)?;
    let content: String = row.get(2).map_err(storage_err)?;
    let category: String = row.get(3).map_err(storage_err)?;
    let emoji: Option<String> = row.get(4).map_err(storage_err)?;
    let created_at: i64 = row.get(5).map_err(storage_err)?;

    Ok(GratitudeEntry {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        content,
        category: category.parse()?,
        emoji,
        created_at: from_millis(created_at)?,
    })
}

// =============================================================================
// Mood
// =============================================================================

/// Repository for daily mood check-ins. One entry per user per UTC day.
pub struct MoodRepository {
    db: Arc<Database>,
    max_note_length: usize,
}

impl MoodRepository {
    pub fn new(db: Arc<Database>, max_note_length: usize) -> Self {
        Self {
            db,
            max_note_length,
        }
    }

    /// Record today's mood.
    pub fn record(
        &self,
        user_id: Uuid,
        mood: Mood,
        note: Option<&str>,
    ) -> Result<MoodEntry, HeartspaceError> {
        self.record_at(user_id, mood, note, now_millis())
    }

    /// Record a mood for the UTC day containing `at`.
    pub fn record_at(
        &self,
        user_id: Uuid,
        mood: Mood,
        note: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<MoodEntry, HeartspaceError> {
        let note = optional_text(note);
        if let Some(ref n) = note {
            if n.chars().count() > self.max_note_length {
                return Err(HeartspaceError::Validation(format!(
                    "Mood note exceeds maximum length of {} characters",
                    self.max_note_length
                )));
            }
        }

        let entry = MoodEntry {
            id: Uuid::new_v4(),
            user_id,
            mood,
            note,
            created_at: at.trunc_subsecs(3),
        };
        let day = at.date_naive().to_string();

        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO mood_entries (id, user_id, mood, note, day, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    entry.id.to_string(),
                    entry.user_id.to_string(),
                    entry.mood.as_str(),
                    entry.note,
                    day,
                    entry.created_at.timestamp_millis(),
                ],
            )
            .map_err(|e| {
                if is_constraint_violation(&e) {
                    HeartspaceError::Conflict(format!("mood already tracked for {}", day))
                } else {
                    HeartspaceError::Storage(format!("Failed to save mood: {}", e))
                }
            })?;
            Ok(())
        })?;

        debug!(entry_id = %entry.id, mood = %entry.mood, "Mood recorded");
        Ok(entry)
    }

    /// Entries for a user, newest first.
    pub fn list_for_user(
        &self,
        user_id: Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<MoodEntry>, HeartspaceError> {
        let limit = limit.map(i64::from).unwrap_or(-1);
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, user_id, mood, note, created_at
                     FROM mood_entries
                     WHERE user_id = ?1
                     ORDER BY created_at DESC, rowid DESC
                     LIMIT ?2",
                )
                .map_err(storage_err)?;

            let rows = stmt
                .query_map(rusqlite::params![user_id.to_string(), limit], |row| {
                    Ok(row_to_mood(row))
                })
                .map_err(storage_err)?;

            let mut entries = Vec::new();
            for row in rows {
                entries.push(row.map_err(storage_err)??);
            }
            Ok(entries)
        })
    }

    /// Count and most common mood over the last seven entries.
    pub fn stats(&self, user_id: Uuid) -> Result<MoodStats, HeartspaceError> {
        let recent = self.list_for_user(user_id, Some(MOOD_STATS_WINDOW))?;
        Ok(summarize_moods(&recent))
    }

    /// Number of distinct days with a mood entry.
    pub fn days_tracked(&self, user_id: Uuid) -> Result<u64, HeartspaceError> {
        self.db.with_conn(|conn| {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(DISTINCT day) FROM mood_entries WHERE user_id = ?1",
                    rusqlite::params![user_id.to_string()],
                    |row| row.get(0),
                )
                .map_err(storage_err)?;
            Ok(count as u64)
        })
    }
}

/// Most frequent mood in `recent` (newest first); ties go to the most recent.
fn summarize_moods(recent: &[MoodEntry]) -> MoodStats {
    let mut counts: HashMap<Mood, usize> = HashMap::new();
    for entry in recent {
        *counts.entry(entry.mood).or_insert(0) += 1;
    }

    let mut most_common: Option<(Mood, usize)> = None;
    for entry in recent {
        let count = counts[&entry.mood];
        match most_common {
            Some((_, best)) if count <= best => {}
            _ => most_common = Some((entry.mood, count)),
        }
    }

    MoodStats {
        recent_count: recent.len(),
        most_common: most_common.map(|(mood, _)| mood),
    }
}

fn row_to_mood(row: &rusqlite::Row<'_>) -> Result<MoodEntry, HeartspaceError> {
    let id: String = row.get(0).map_err(storage_err)?;
    let user_id: String = row.get(1).map_err(storage_err)?;
    let mood: String = row.get(2).map_err(storage_err)?;
    let note: Option<String> = row.get(3).map_err(storage_err)?;
    let created_at: i64 = row.get(4).map_err(storage_err)?;

    Ok(MoodEntry {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        mood: mood.parse()?,
        note,
        created_at: from_millis(created_at)?,
    })
}

// =============================================================================
// Affirmations
// =============================================================================

/// Repository for community affirmations.
pub struct AffirmationRepository {
    db: Arc<Database>,
    max_content_length: usize,
}

impl AffirmationRepository {
    pub fn new(db: Arc<Database>, max_content_length: usize) -> Self {
        Self {
            db,
            max_content_length,
        }
    }

    /// Post an affirmation. Anonymous posts carry no author name.
    pub fn create(
        &self,
        author: &User,
        content: &str,
        is_anonymous: bool,
    ) -> Result<Affirmation, HeartspaceError> {
        let content = validate_content(content, self.max_content_length, "Affirmation")?;
        let affirmation = Affirmation {
            id: Uuid::new_v4(),
            user_id: author.id,
            content,
            author: (!is_anonymous).then(|| author.name.clone()),
            is_anonymous,
            created_at: now_millis(),
        };

        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO affirmations (id, user_id, content, author, is_anonymous, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    affirmation.id.to_string(),
                    affirmation.user_id.to_string(),
                    affirmation.content,
                    affirmation.author,
                    affirmation.is_anonymous,
                    affirmation.created_at.timestamp_millis(),
                ],
            )
            .map_err(|e| HeartspaceError::Storage(format!("Failed to save affirmation: {}", e)))?;
            Ok(())
        })?;

        info!(affirmation_id = %affirmation.id, anonymous = is_anonymous, "Affirmation posted");
        Ok(affirmation)
    }

    /// Community feed, newest first, as seen by `viewer`.
    pub fn feed(&self, viewer: Uuid, limit: u32) -> Result<Vec<AffirmationView>, HeartspaceError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT a.id, a.user_id, a.content, a.author, a.is_anonymous, a.created_at,
                            (SELECT COUNT(*) FROM affirmation_likes l
                              WHERE l.affirmation_id = a.id),
                            (SELECT COUNT(*) FROM comments c
                              WHERE c.post_kind = 'affirmation' AND c.post_id = a.id),
                            EXISTS (SELECT 1 FROM affirmation_likes l
                                     WHERE l.affirmation_id = a.id AND l.user_id = ?1)
                     FROM affirmations a
                     ORDER BY a.created_at DESC, a.rowid DESC
                     LIMIT ?2",
                )
                .map_err(storage_err)?;

            let rows = stmt
                .query_map(rusqlite::params![viewer.to_string(), limit], |row| {
                    Ok(row_to_affirmation_view(row))
                })
                .map_err(storage_err)?;

            let mut feed = Vec::new();
            for row in rows {
                feed.push(row.map_err(storage_err)??);
            }
            Ok(feed)
        })
    }

    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Affirmation>, HeartspaceError> {
        self.db.with_conn(|conn| {
            let result = conn
                .query_row(
                    "SELECT id, user_id, content, author, is_anonymous, created_at
                     FROM affirmations WHERE id = ?1",
                    rusqlite::params![id.to_string()],
                    |row| Ok(row_to_affirmation(row)),
                )
                .optional()
                .map_err(storage_err)?;
            result.transpose()
        })
    }

    /// Delete an affirmation with its likes and comments. Owner only.
    pub fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), HeartspaceError> {
        let post = PostRef::Affirmation(id);
        self.db.with_conn(|conn| {
            ensure_owner(conn, user_id, post)?;
            delete_post(conn, post)
        })?;
        info!(affirmation_id = %id, "Affirmation deleted");
        Ok(())
    }
}

fn row_to_affirmation(row: &rusqlite::Row<'_>) -> Result<Affirmation, HeartspaceError> {
    let id: String = row.get(0).map_err(storage_err)?;
    let user_id: String = row.get(1).map_err(storage_err)?;
    let content: String = row.get(2).map_err(storage_err)?;
    let author: Option<String> = row.get(3).map_err(storage_err)?;
    let is_anonymous: bool = row.get(4).map_err(storage_err)?;
    let created_at: i64 = row.get(5).map_err(storage_err)?;

    Ok(Affirmation {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        content,
        author,
        is_anonymous,
        created_at: from_millis(created_at)?,
    })
}

fn row_to_affirmation_view(row: &rusqlite::Row<'_>) -> Result<AffirmationView, HeartspaceError> {
    let affirmation = row_to_affirmation(row)?;
    let likes: i64 = row.get(6).map_err(storage_err)?;
    let comments: i64 = row.get(7).map_err(storage_err)?;
    let liked_by_me: bool = row.get(8).map_err(storage_err)?;

    Ok(AffirmationView {
        affirmation,
        likes: likes as u64,
        comments: comments as u64,
        liked_by_me,
    })
}

// =============================================================================
// Likes
// =============================================================================

/// Repository for the (user, affirmation) like junction.
pub struct LikeRepository {
    db: Arc<Database>,
}

impl LikeRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Like an affirmation. Liking twice is a no-op; returns whether a new
    /// like was recorded.
    pub fn like(&self, user_id: Uuid, affirmation_id: Uuid) -> Result<bool, HeartspaceError> {
        self.db.with_conn(|conn| {
            if post_owner(conn, PostRef::Affirmation(affirmation_id))?.is_none() {
                return Err(HeartspaceError::NotFound(format!(
                    "affirmation {}",
                    affirmation_id
                )));
            }
            let changed = conn
                .execute(
                    "INSERT OR IGNORE INTO affirmation_likes (affirmation_id, user_id, created_at)
                     VALUES (?1, ?2, ?3)",
                    rusqlite::params![
                        affirmation_id.to_string(),
                        user_id.to_string(),
                        Utc::now().timestamp_millis(),
                    ],
                )
                .map_err(|e| HeartspaceError::Storage(format!("Failed to save like: {}", e)))?;
            Ok(changed > 0)
        })
    }

    /// Remove a like. Returns whether one existed.
    pub fn unlike(&self, user_id: Uuid, affirmation_id: Uuid) -> Result<bool, HeartspaceError> {
        self.db.with_conn(|conn| {
            let changed = conn
                .execute(
                    "DELETE FROM affirmation_likes WHERE affirmation_id = ?1 AND user_id = ?2",
                    rusqlite::params![affirmation_id.to_string(), user_id.to_string()],
                )
                .map_err(storage_err)?;
            Ok(changed > 0)
        })
    }

    pub fn is_liked(&self, user_id: Uuid, affirmation_id: Uuid) -> Result<bool, HeartspaceError> {
        self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT EXISTS (SELECT 1 FROM affirmation_likes
                                 WHERE affirmation_id = ?1 AND user_id = ?2)",
                rusqlite::params![affirmation_id.to_string(), user_id.to_string()],
                |row| row.get(0),
            )
            .map_err(storage_err)
        })
    }

    pub fn count_for(&self, affirmation_id: Uuid) -> Result<u64, HeartspaceError> {
        self.db.with_conn(|conn| {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM affirmation_likes WHERE affirmation_id = ?1",
                    rusqlite::params![affirmation_id.to_string()],
                    |row| row.get(0),
                )
                .map_err(storage_err)?;
            Ok(count as u64)
        })
    }

    /// Number of affirmations `user_id` has liked.
    pub fn count_by_user(&self, user_id: Uuid) -> Result<u64, HeartspaceError> {
        self.db.with_conn(|conn| {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM affirmation_likes WHERE user_id = ?1",
                    rusqlite::params![user_id.to_string()],
                    |row| row.get(0),
                )
                .map_err(storage_err)?;
            Ok(count as u64)
        })
    }
}

// =============================================================================
// Comments
// =============================================================================

/// Repository for comments on affirmations and gratitude entries.
///
/// Affirmations are public, so anyone may read and comment on them.
/// Gratitude entries are private; only their owner sees or adds comments,
/// and everyone else gets `NotFound`.
pub struct CommentRepository {
    db: Arc<Database>,
    max_content_length: usize,
}

impl CommentRepository {
    pub fn new(db: Arc<Database>, max_content_length: usize) -> Self {
        Self {
            db,
            max_content_length,
        }
    }

    pub fn add(
        &self,
        author: &User,
        post: PostRef,
        content: &str,
        is_anonymous: bool,
    ) -> Result<Comment, HeartspaceError> {
        let content = validate_content(content, self.max_content_length, "Comment")?;
        let comment = Comment {
            id: Uuid::new_v4(),
            user_id: author.id,
            post,
            content,
            author_name: (!is_anonymous).then(|| author.name.clone()),
            is_anonymous,
            created_at: now_millis(),
        };

        self.db.with_conn(|conn| {
            ensure_visible(conn, author.id, post)?;
            conn.execute(
                "INSERT INTO comments
                    (id, user_id, post_kind, post_id, content, author_name, is_anonymous, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    comment.id.to_string(),
                    comment.user_id.to_string(),
                    post.kind(),
                    post.id().to_string(),
                    comment.content,
                    comment.author_name,
                    comment.is_anonymous,
                    comment.created_at.timestamp_millis(),
                ],
            )
            .map_err(|e| HeartspaceError::Storage(format!("Failed to save comment: {}", e)))?;
            Ok(())
        })?;

        debug!(comment_id = %comment.id, post = post.kind(), "Comment added");
        Ok(comment)
    }

    /// Comments on a post, oldest first.
    pub fn list_for_post(
        &self,
        viewer: Uuid,
        post: PostRef,
    ) -> Result<Vec<Comment>, HeartspaceError> {
        self.db.with_conn(|conn| {
            ensure_visible(conn, viewer, post)?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, user_id, post_kind, post_id, content, author_name, is_anonymous,
                            created_at
                     FROM comments
                     WHERE post_kind = ?1 AND post_id = ?2
                     ORDER BY created_at ASC, rowid ASC",
                )
                .map_err(storage_err)?;

            let rows = stmt
                .query_map(
                    rusqlite::params![post.kind(), post.id().to_string()],
                    |row| Ok(row_to_comment(row)),
                )
                .map_err(storage_err)?;

            let mut comments = Vec::new();
            for row in rows {
                comments.push(row.map_err(storage_err)??);
            }
            Ok(comments)
        })
    }

    pub fn count_for_post(&self, post: PostRef) -> Result<u64, HeartspaceError> {
        self.db.with_conn(|conn| {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM comments WHERE post_kind = ?1 AND post_id = ?2",
                    rusqlite::params![post.kind(), post.id().to_string()],
                    |row| row.get(0),
                )
                .map_err(storage_err)?;
            Ok(count as u64)
        })
    }
}

fn ensure_visible(conn: &Connection, viewer: Uuid, post: PostRef) -> Result<(), HeartspaceError> {
    let visible = match (post, post_owner(conn, post)?) {
        (_, None) => false,
        (PostRef::Affirmation(_), Some(_)) => true,
        (PostRef::Gratitude(_), Some(owner)) => owner == viewer,
    };
    if visible {
        Ok(())
    } else {
        Err(HeartspaceError::NotFound(format!(
            "{} {}",
            post.kind(),
            post.id()
        )))
    }
}

fn row_to_comment(row: &rusqlite::Row<'_>) -> Result<Comment, HeartspaceError> {
    let id: String = row.get(0).map_err(storage_err)?;
    let user_id: String = row.get(1).map_err(storage_err)?;
    let post_kind: String = row.get(2).map_err(storage_err)?;
    let post_id: String = row.get(3).map_err(storage_err)?;
    let content: String = row.get(4).map_err(storage_err)?;
    let author_name: Option<String> = row.get(5).map_err(storage_err)?;
    let is_anonymous: bool = row.get(6).map_err(storage_err)?;
    let created_at: i64 = row.get(7).map_err(storage_err)?;

    let post_id = parse_uuid(&post_id)?;
    let post = match post_kind.as_str() {
        "affirmation" => PostRef::Affirmation(post_id),
        "gratitude" => PostRef::Gratitude(post_id),
        other => {
            return Err(HeartspaceError::Storage(format!(
                "Unknown comment post kind: {}",
                other
            )))
        }
    };

    Ok(Comment {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        post,
        content,
        author_name,
        is_anonymous,
        created_at: from_millis(created_at)?,
    })
}

// =============================================================================
// Tests
// =============================================================================

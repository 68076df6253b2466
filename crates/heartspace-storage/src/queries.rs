//! Cross-table queries for the dashboard.

use std::sync::Arc;

use uuid::Uuid;

use heartspace_core::error::HeartspaceError;
use heartspace_core::types::DashboardStats;

use crate::db::Database;
use crate::repository::storage_err;

/// Read-only queries spanning several tables.
pub struct QueryService {
    db: Arc<Database>,
}

impl QueryService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Dashboard counters for `user_id`. HeartBot sessions are not persisted,
    /// so the caller supplies that count.
    pub fn dashboard_stats(
        &self,
        user_id: Uuid,
        heartbot_chats: u64,
    ) -> Result<DashboardStats, HeartspaceError> {
        self.db.with_conn(|conn| {
            let (gratitude, days, liked): (i64, i64, i64) = conn
                .query_row(
                    "SELECT
                        (SELECT COUNT(*) FROM gratitude_entries WHERE user_id = ?1),
                        (SELECT COUNT(DISTINCT day) FROM mood_entries WHERE user_id = ?1),
                        (SELECT COUNT(*) FROM affirmation_likes WHERE user_id = ?1)",
                    rusqlite::params![user_id.to_string()],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
                )
                .map_err(storage_err)?;

            Ok(DashboardStats {
                gratitude_entries: gratitude as u64,
                days_tracked: days as u64,
                heartbot_chats,
                affirmations_liked: liked as u64,
            })
        })
    }
}

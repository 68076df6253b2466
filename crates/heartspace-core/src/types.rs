use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::HeartspaceError;

// =============================================================================
// Enums
// =============================================================================

/// Category a gratitude entry is filed under.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GratitudeCategory {
    Health,
    Relationships,
    #[default]
    #[serde(rename = "Self")]
    SelfCategory,
    Work,
}

impl GratitudeCategory {
    pub const ALL: [GratitudeCategory; 4] = [
        GratitudeCategory::Health,
        GratitudeCategory::Relationships,
        GratitudeCategory::SelfCategory,
        GratitudeCategory::Work,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GratitudeCategory::Health => "Health",
            GratitudeCategory::Relationships => "Relationships",
            GratitudeCategory::SelfCategory => "Self",
            GratitudeCategory::Work => "Work",
        }
    }
}

impl fmt::Display for GratitudeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GratitudeCategory {
    type Err = HeartspaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GratitudeCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| HeartspaceError::Validation(format!("unknown category: {}", s)))
    }
}

/// Mood a user can record once per day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    Happy,
    Neutral,
    Sad,
    Anxious,
    Excited,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Happy,
        Mood::Neutral,
        Mood::Sad,
        Mood::Anxious,
        Mood::Excited,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Neutral => "Neutral",
            Mood::Sad => "Sad",
            Mood::Anxious => "Anxious",
            Mood::Excited => "Excited",
        }
    }

    /// Short description shown next to the mood picker.
    pub fn description(&self) -> &'static str {
        match self {
            Mood::Happy => "Feeling great and positive",
            Mood::Neutral => "Balanced and calm",
            Mood::Sad => "Feeling down or blue",
            Mood::Anxious => "Worried or stressed",
            Mood::Excited => "Energetic and enthusiastic",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = HeartspaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| HeartspaceError::Validation(format!("unknown mood: {}", s)))
    }
}

/// The post a comment is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum PostRef {
    Affirmation(Uuid),
    Gratitude(Uuid),
}

impl PostRef {
    pub fn id(&self) -> Uuid {
        match self {
            PostRef::Affirmation(id) | PostRef::Gratitude(id) => *id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PostRef::Affirmation(_) => "affirmation",
            PostRef::Gratitude(_) => "gratitude",
        }
    }
}

// =============================================================================
// Records
// =============================================================================

/// A registered account. The password hash never leaves the storage layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// First word of the display name, used in greetings.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

/// A private gratitude journal entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GratitudeEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub category: GratitudeCategory,
    pub emoji: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a gratitude entry.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewGratitudeEntry {
    pub content: String,
    #[serde(default)]
    pub category: GratitudeCategory,
    #[serde(default)]
    pub emoji: Option<String>,
}

/// A daily mood check-in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mood: Mood,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Summary of a user's recent mood check-ins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoodStats {
    /// Number of entries considered (at most seven).
    pub recent_count: usize,
    /// Most frequent mood among them; ties go to the most recent.
    pub most_common: Option<Mood>,
}

/// A community affirmation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Affirmation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    /// `None` when posted anonymously.
    pub author: Option<String>,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
}

/// An affirmation as shown in the community feed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AffirmationView {
    #[serde(flatten)]
    pub affirmation: Affirmation,
    pub likes: u64,
    pub comments: u64,
    pub liked_by_me: bool,
}

/// A comment on an affirmation or gratitude entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post: PostRef,
    pub content: String,
    pub author_name: Option<String>,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
}

/// Per-user counters shown on the dashboard.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub gratitude_entries: u64,
    pub days_tracked: u64,
    pub heartbot_chats: u64,
    pub affirmations_liked: u64,
}

// =============================================================================
// Helpers
// =============================================================================

/// Trim `content` and check it is non-empty and within `max_len` characters.
pub fn validate_content(content: &str, max_len: usize, what: &str) -> crate::Result<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(HeartspaceError::Validation(format!(
            "{} cannot be empty",
            what
        )));
    }
    if trimmed.chars().count() > max_len {
        return Err(HeartspaceError::Validation(format!(
            "{} exceeds maximum length of {} characters",
            what, max_len
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gratitude_category_serializes_self_as_self() {
        let json = serde_json::to_string(&GratitudeCategory::SelfCategory).unwrap();
        assert_eq!(json, "\"Self\"");
        let back: GratitudeCategory = serde_json::from_str("\"Work\"").unwrap();
        assert_eq!(back, GratitudeCategory::Work);
    }

    #[test]
    fn test_gratitude_category_from_str_case_insensitive() {
        assert_eq!(
            "health".parse::<GratitudeCategory>().unwrap(),
            GratitudeCategory::Health
        );
        assert_eq!(
            " Self ".parse::<GratitudeCategory>().unwrap(),
            GratitudeCategory::SelfCategory
        );
        assert!("Hobbies".parse::<GratitudeCategory>().is_err());
    }

    #[test]
    fn test_gratitude_category_default_is_self() {
        assert_eq!(GratitudeCategory::default(), GratitudeCategory::SelfCategory);
    }

    #[test]
    fn test_mood_display_matches_from_str() {
        for mood in Mood::ALL {
            assert_eq!(mood.to_string().parse::<Mood>().unwrap(), mood);
            assert!(!mood.description().is_empty());
        }
        assert!("Furious".parse::<Mood>().is_err());
    }

    #[test]
    fn test_post_ref_serialization() {
        let id = Uuid::nil();
        let json = serde_json::to_value(PostRef::Gratitude(id)).unwrap();
        assert_eq!(json["kind"], "gratitude");
        assert_eq!(json["id"], id.to_string());
        assert_eq!(PostRef::Affirmation(id).kind(), "affirmation");
        assert_eq!(PostRef::Affirmation(id).id(), id);
    }

    #[test]
    fn test_user_first_name() {
        let user = User {
            id: Uuid::new_v4(),
            email: "sam@example.com".into(),
            name: "Sam River Jones".into(),
            created_at: Utc::now(),
        };
        assert_eq!(user.first_name(), "Sam");
    }

    #[test]
    fn test_affirmation_view_flattens() {
        let view = AffirmationView {
            affirmation: Affirmation {
                id: Uuid::nil(),
                user_id: Uuid::nil(),
                content: "You are enough".into(),
                author: None,
                is_anonymous: true,
                created_at: Utc::now(),
            },
            likes: 3,
            comments: 1,
            liked_by_me: false,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["content"], "You are enough");
        assert_eq!(json["likes"], 3);
        assert!(json["author"].is_null());
    }

    #[test]
    fn test_validate_content_trims() {
        assert_eq!(validate_content("  hi  ", 10, "Comment").unwrap(), "hi");
    }

    #[test]
    fn test_validate_content_rejects_whitespace() {
        let err = validate_content(" \n\t ", 10, "Comment").unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: Comment cannot be empty");
    }

    #[test]
    fn test_validate_content_counts_chars_not_bytes() {
        // Four multi-byte characters fit in a four-character limit.
        assert!(validate_content("💖💖💖💖", 4, "Post").is_ok());
        assert!(validate_content("💖💖💖💖💖", 4, "Post").is_err());
    }
}

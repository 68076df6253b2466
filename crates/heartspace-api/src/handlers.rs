//! Route handler functions for all API endpoints.
//!
//! Each handler extracts path, query, and body parameters via axum
//! extractors, calls the AppState services, and returns JSON responses.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use heartspace_chat::{
    ChatSessionSummary, SessionSnapshot, TurnOutcome, SUGGESTED_PROMPTS, WELCOME_MESSAGE,
};
use heartspace_core::types::{
    Affirmation, AffirmationView, Comment, DashboardStats, GratitudeCategory, GratitudeEntry,
    Mood, MoodEntry, MoodStats, NewGratitudeEntry, PostRef, User,
};
use heartspace_storage::AuthSession;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Default and maximum page size for the community feed.
const FEED_DEFAULT_LIMIT: u32 = 50;
const FEED_MAX_LIMIT: u32 = 200;

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid id '{}'", raw)))
}

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct GratitudeParams {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewCommentRequest {
    pub content: String,
    #[serde(default)]
    pub is_anonymous: bool,
}

#[derive(Debug, Deserialize)]
pub struct NewMoodRequest {
    pub mood: Mood,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct NewAffirmationRequest {
    pub content: String,
    #[serde(default)]
    pub is_anonymous: bool,
}

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub path: Option<String>,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub heartbot_enabled: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PromptsResponse {
    pub welcome: String,
    pub prompts: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionsResponse {
    pub sessions: Vec<ChatSessionSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GratitudeListResponse {
    pub entries: Vec<GratitudeEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentsResponse {
    pub comments: Vec<Comment>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MoodListResponse {
    pub entries: Vec<MoodEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedResponse {
    pub affirmations: Vec<AffirmationView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikeResponse {
    pub liked: bool,
    pub likes: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

// =============================================================================
// Health
// =============================================================================

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        heartbot_enabled: state.heartbot.is_enabled(),
    })
}

// =============================================================================
// Accounts
// =============================================================================

/// POST /auth/signup - create an account and sign straight in.
pub async fn sign_up(
    State(state): State<AppState>,
    Json(body): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<AuthSession>), ApiError> {
    let accounts = Arc::clone(&state.accounts);
    // Password hashing is CPU-bound; keep it off the async workers.
    let session = tokio::task::spawn_blocking(move || {
        accounts.sign_up(&body.name, &body.email, &body.password)?;
        accounts.sign_in(&body.email, &body.password)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Sign-up task failed: {}", e)))??;

    Ok((StatusCode::CREATED, Json(session)))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthSession>, ApiError> {
    let accounts = Arc::clone(&state.accounts);
    let session = tokio::task::spawn_blocking(move || accounts.sign_in(&body.email, &body.password))
        .await
        .map_err(|e| ApiError::Internal(format!("Login task failed: {}", e)))??;
    Ok(Json(session))
}

/// POST /auth/logout - revoke the token used for this request.
pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<StatusCode, ApiError> {
    state.accounts.sign_out(&current.token)?;
    info!(user_id = %current.user.id, "User signed out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me
pub async fn me(Extension(current): Extension<CurrentUser>) -> Json<User> {
    Json(current.user)
}

// =============================================================================
// HeartBot
// =============================================================================

/// GET /heartbot/prompts - welcome line and suggested openers.
pub async fn heartbot_prompts() -> Json<PromptsResponse> {
    Json(PromptsResponse {
        welcome: WELCOME_MESSAGE.to_string(),
        prompts: SUGGESTED_PROMPTS.iter().map(|p| p.to_string()).collect(),
    })
}

/// POST /heartbot/sessions
pub async fn start_chat(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<(StatusCode, Json<SessionSnapshot>), ApiError> {
    let snapshot = state.heartbot.start_session(current.user.id)?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// GET /heartbot/sessions
pub async fn list_chats(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<SessionsResponse>, ApiError> {
    let sessions = state.heartbot.list_sessions(current.user.id).await?;
    Ok(Json(SessionsResponse { sessions }))
}

/// GET /heartbot/sessions/{id}
pub async fn get_chat(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let id = parse_id(&id)?;
    let snapshot = state.heartbot.get_session(current.user.id, id).await?;
    Ok(Json(snapshot))
}

/// DELETE /heartbot/sessions/{id}
pub async fn end_chat(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.heartbot.end_session(current.user.id, id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /heartbot/sessions/{id}/messages - one user turn and its reply.
///
/// Responds once the simulated typing delay has elapsed. A second message
/// to the same session while this one is pending answers 409.
pub async fn send_chat_message(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<TurnOutcome>, ApiError> {
    let id = parse_id(&id)?;
    let outcome = state
        .heartbot
        .send_message(current.user.id, id, &body.content)
        .await?;
    Ok(Json(outcome))
}

// =============================================================================
// Gratitude journal
// =============================================================================

/// GET /gratitude?category=Work
pub async fn list_gratitude(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<GratitudeParams>,
) -> Result<Json<GratitudeListResponse>, ApiError> {
    let category = params
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(|c| {
            c.parse::<GratitudeCategory>().map_err(|_| {
                ApiError::BadRequest(format!(
                    "Invalid category '{}'. Must be one of: Health, Relationships, Self, Work",
                    c
                ))
            })
        })
        .transpose()?;

    let entries = state.gratitude.list_for_user(current.user.id, category)?;
    Ok(Json(GratitudeListResponse { entries }))
}

/// POST /gratitude
pub async fn create_gratitude(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(body): Json<NewGratitudeEntry>,
) -> Result<(StatusCode, Json<GratitudeEntry>), ApiError> {
    let entry = state.gratitude.insert(current.user.id, &body)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /gratitude/{id}
pub async fn delete_gratitude(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.gratitude.delete(current.user.id, id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /gratitude/{id}/comments
pub async fn list_gratitude_comments(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<CommentsResponse>, ApiError> {
    let post = PostRef::Gratitude(parse_id(&id)?);
    list_comments(&state, &current, post)
}

/// POST /gratitude/{id}/comments
pub async fn add_gratitude_comment(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<NewCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let post = PostRef::Gratitude(parse_id(&id)?);
    add_comment(&state, &current, post, body)
}

// =============================================================================
// Mood tracker
// =============================================================================

/// GET /moods?limit=30
pub async fn list_moods(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<LimitParams>,
) -> Result<Json<MoodListResponse>, ApiError> {
    let entries = state.moods.list_for_user(current.user.id, params.limit)?;
    Ok(Json(MoodListResponse { entries }))
}

/// POST /moods - today's check-in. A second one on the same day answers 409.
pub async fn record_mood(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(body): Json<NewMoodRequest>,
) -> Result<(StatusCode, Json<MoodEntry>), ApiError> {
    let entry = state
        .moods
        .record(current.user.id, body.mood, body.note.as_deref())?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /moods/stats
pub async fn mood_stats(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<MoodStats>, ApiError> {
    Ok(Json(state.moods.stats(current.user.id)?))
}

// =============================================================================
// Community affirmations
// =============================================================================

/// GET /affirmations?limit=50
pub async fn affirmation_feed(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<LimitParams>,
) -> Result<Json<FeedResponse>, ApiError> {
    let limit = params
        .limit
        .unwrap_or(FEED_DEFAULT_LIMIT)
        .clamp(1, FEED_MAX_LIMIT);
    let affirmations = state.affirmations.feed(current.user.id, limit)?;
    Ok(Json(FeedResponse { affirmations }))
}

/// POST /affirmations
pub async fn create_affirmation(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(body): Json<NewAffirmationRequest>,
) -> Result<(StatusCode, Json<Affirmation>), ApiError> {
    let affirmation = state
        .affirmations
        .create(&current.user, &body.content, body.is_anonymous)?;
    Ok((StatusCode::CREATED, Json(affirmation)))
}

/// DELETE /affirmations/{id}
pub async fn delete_affirmation(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.affirmations.delete(current.user.id, id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /affirmations/{id}/like - idempotent.
pub async fn like_affirmation(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>, ApiError> {
    let id = parse_id(&id)?;
    state.likes.like(current.user.id, id)?;
    Ok(Json(LikeResponse {
        liked: true,
        likes: state.likes.count_for(id)?,
    }))
}

/// DELETE /affirmations/{id}/like
pub async fn unlike_affirmation(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>, ApiError> {
    let id = parse_id(&id)?;
    if state.affirmations.find_by_id(id)?.is_none() {
        return Err(ApiError::NotFound(format!("affirmation {}", id)));
    }
    state.likes.unlike(current.user.id, id)?;
    Ok(Json(LikeResponse {
        liked: false,
        likes: state.likes.count_for(id)?,
    }))
}

/// GET /affirmations/{id}/comments
pub async fn list_affirmation_comments(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<CommentsResponse>, ApiError> {
    let post = PostRef::Affirmation(parse_id(&id)?);
    list_comments(&state, &current, post)
}

/// POST /affirmations/{id}/comments
pub async fn add_affirmation_comment(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<NewCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let post = PostRef::Affirmation(parse_id(&id)?);
    add_comment(&state, &current, post, body)
}

fn list_comments(
    state: &AppState,
    current: &CurrentUser,
    post: PostRef,
) -> Result<Json<CommentsResponse>, ApiError> {
    let comments = state.comments.list_for_post(current.user.id, post)?;
    Ok(Json(CommentsResponse { comments }))
}

fn add_comment(
    state: &AppState,
    current: &CurrentUser,
    post: PostRef,
    body: NewCommentRequest,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let comment = state
        .comments
        .add(&current.user, post, &body.content, body.is_anonymous)?;
    Ok((StatusCode::CREATED, Json(comment)))
}

// =============================================================================
// Media and dashboard
// =============================================================================

/// POST /uploads?path=avatars/me.png - raw image bytes in the body.
///
/// The stored file is served back under the returned `/media/...` URL.
pub async fn upload_media(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<UploadParams>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(format!(
                "Upload exceeds the limit of {} bytes",
                state.media.max_upload_bytes()
            ))
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    })?;
    let path = params
        .path
        .ok_or_else(|| ApiError::BadRequest("Parameter 'path' is required".to_string()))?;
    let url = state.media.upload(&body, &path)?;
    info!(user_id = %current.user.id, url = %url, "Media stored");
    Ok((StatusCode::CREATED, Json(UploadResponse { url })))
}

/// GET /dashboard/stats
pub async fn dashboard_stats(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<DashboardStats>, ApiError> {
    let chats = state.heartbot.chats_started(current.user.id)?;
    let stats = state.queries.dashboard_stats(current.user.id, chats)?;
    Ok(Json(stats))
}

//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, tracing, compression, bearer
//! authentication, and the static media file service.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use heartspace_core::config::HeartspaceConfig;
use heartspace_core::error::HeartspaceError;

use crate::handlers;
use crate::state::AppState;

/// Body limit for JSON routes.
const JSON_BODY_LIMIT: usize = 64 * 1024;

fn cors_layer(port: u16) -> CorsLayer {
    let dev_port = port.saturating_add(1);
    let origins: Vec<HeaderValue> = [port, dev_port]
        .iter()
        .flat_map(|p| {
            [
                format!("http://127.0.0.1:{}", p),
                format!("http://localhost:{}", p),
            ]
        })
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
}

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(state.config.general.port);
    let upload_limit = state.media.max_upload_bytes();

    let account_routes = Router::new()
        .route("/auth/signup", post(handlers::sign_up))
        .route("/auth/login", post(handlers::login))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::rate_limit::limit_auth_requests,
        ));

    let public_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/heartbot/prompts", get(handlers::heartbot_prompts))
        .merge(account_routes)
        .nest_service("/media", ServeDir::new(state.media.root()));

    let protected_routes = Router::new()
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/me", get(handlers::me))
        .route(
            "/heartbot/sessions",
            get(handlers::list_chats).post(handlers::start_chat),
        )
        .route(
            "/heartbot/sessions/{id}",
            get(handlers::get_chat).delete(handlers::end_chat),
        )
        .route(
            "/heartbot/sessions/{id}/messages",
            post(handlers::send_chat_message),
        )
        .route(
            "/gratitude",
            get(handlers::list_gratitude).post(handlers::create_gratitude),
        )
        .route("/gratitude/{id}", delete(handlers::delete_gratitude))
        .route(
            "/gratitude/{id}/comments",
            get(handlers::list_gratitude_comments).post(handlers::add_gratitude_comment),
        )
        .route("/moods", get(handlers::list_moods).post(handlers::record_mood))
        .route("/moods/stats", get(handlers::mood_stats))
        .route(
            "/affirmations",
            get(handlers::affirmation_feed).post(handlers::create_affirmation),
        )
        .route("/affirmations/{id}", delete(handlers::delete_affirmation))
        .route(
            "/affirmations/{id}/like",
            post(handlers::like_affirmation).delete(handlers::unlike_affirmation),
        )
        .route(
            "/affirmations/{id}/comments",
            get(handlers::list_affirmation_comments).post(handlers::add_affirmation_comment),
        )
        .route(
            "/uploads",
            post(handlers::upload_media).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/dashboard/stats", get(handlers::dashboard_stats))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ));

    public_routes
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on the configured port.
///
/// Binds to 127.0.0.1 (localhost only) and serves until `shutdown`
/// resolves.
pub async fn start_server<F>(
    config: &HeartspaceConfig,
    state: AppState,
    shutdown: F,
) -> Result<(), HeartspaceError>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr = format!("127.0.0.1:{}", config.general.port);
    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

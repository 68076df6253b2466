//! Bearer-token authentication middleware.
//!
//! Resolves `Authorization: Bearer <token>` through the account service and
//! attaches the signed-in user to the request as a [`CurrentUser`]
//! extension. Missing, unknown, and expired tokens all answer 401.

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::debug;

use heartspace_core::types::User;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller of a protected route.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

/// Extract the bearer token from request headers.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;
    let value = value.to_str().map_err(|_| {
        ApiError::Unauthorized("Invalid Authorization header encoding".to_string())
    })?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Expected a Bearer token".to_string()))
}

/// Middleware guarding every route that acts on a user's data.
pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let token = match bearer_token(req.headers()) {
        Ok(token) => token.to_string(),
        Err(e) => return e.into_response(),
    };

    match state.accounts.current_user(&token) {
        Ok(Some(user)) => {
            req.extensions_mut().insert(CurrentUser { user, token });
            next.run(req).await
        }
        Ok(None) => {
            debug!("Rejected unknown or expired bearer token");
            ApiError::Unauthorized("Invalid or expired token".to_string()).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

//! Account service: sign-up, sign-in, bearer tokens.
//!
//! Passwords are stored as argon2 PHC strings. Sign-in issues a random
//! 32-character hex token with an expiry; `current_user` resolves it.

use std::sync::{Arc, LazyLock};

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use regex::Regex;
use rusqlite::OptionalExtension;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use heartspace_core::config::AuthConfig;
use heartspace_core::error::HeartspaceError;
use heartspace_core::types::User;

use crate::db::Database;
use crate::repository::{from_millis, now_millis, parse_uuid, storage_err};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex"));

/// A signed-in user and the bearer token that identifies them.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

/// Generate a random 32-character hex token.
pub fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    hex::encode(bytes)
}

fn hash_password(password: &str) -> Result<String, HeartspaceError> {
    let salt_bytes: [u8; 16] = rand::rng().random();
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| HeartspaceError::Storage(format!("Failed to encode salt: {}", e)))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| HeartspaceError::Storage(format!("Failed to hash password: {}", e)))
}

fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Account storage and credential checks.
pub struct AccountService {
    db: Arc<Database>,
    config: AuthConfig,
}

impl AccountService {
    pub fn new(db: Arc<Database>, config: AuthConfig) -> Self {
        Self { db, config }
    }

    /// Register a new account. Emails are unique regardless of case.
    pub fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<User, HeartspaceError> {
        let name = name.trim();
        let email = email.trim().to_lowercase();

        if name.is_empty() {
            return Err(HeartspaceError::Validation("name is required".to_string()));
        }
        if !EMAIL_RE.is_match(&email) {
            return Err(HeartspaceError::Validation(format!(
                "invalid email address: {}",
                email
            )));
        }
        if password.chars().count() < self.config.min_password_length {
            return Err(HeartspaceError::Validation(format!(
                "password must be at least {} characters",
                self.config.min_password_length
            )));
        }

        let password_hash = hash_password(password)?;
        let user = User {
            id: Uuid::new_v4(),
            email,
            name: name.to_string(),
            created_at: now_millis(),
        };

        self.db.with_conn(|conn| {
            let taken: bool = conn
                .query_row(
                    "SELECT EXISTS (SELECT 1 FROM users WHERE email = ?1)",
                    rusqlite::params![user.email],
                    |row| row.get(0),
                )
                .map_err(storage_err)?;
            if taken {
                return Err(HeartspaceError::Conflict(format!(
                    "an account already exists for {}",
                    user.email
                )));
            }

            conn.execute(
                "INSERT INTO users (id, email, name, password_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    user.id.to_string(),
                    user.email,
                    user.name,
                    password_hash,
                    user.created_at.timestamp_millis(),
                ],
            )
            .map_err(|e| HeartspaceError::Storage(format!("Failed to create user: {}", e)))?;
            Ok(())
        })?;

        info!(user_id = %user.id, "Account created");
        Ok(user)
    }

    /// Check credentials and issue a bearer token.
    pub fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, HeartspaceError> {
        let email = email.trim().to_lowercase();
        let found = self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT id, email, name, created_at, password_hash FROM users WHERE email = ?1",
                rusqlite::params![email],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()
            .map_err(storage_err)
        })?;

        let invalid = || HeartspaceError::Unauthorized("invalid email or password".to_string());
        let (id, email, name, created_at, password_hash) = found.ok_or_else(invalid)?;
        if !verify_password(password, &password_hash) {
            debug!("Sign-in rejected: bad password");
            return Err(invalid());
        }

        let user = User {
            id: parse_uuid(&id)?,
            email,
            name,
            created_at: from_millis(created_at)?,
        };

        let token = generate_token();
        let now = now_millis();
        let expires_at = now + Duration::hours(i64::from(self.config.token_ttl_hours));
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO auth_tokens (token, user_id, created_at, expires_at)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    token,
                    user.id.to_string(),
                    now.timestamp_millis(),
                    expires_at.timestamp_millis(),
                ],
            )
            .map_err(|e| HeartspaceError::Storage(format!("Failed to store token: {}", e)))?;
            Ok(())
        })?;

        info!(user_id = %user.id, "User signed in");
        Ok(AuthSession {
            token,
            user,
            expires_at,
        })
    }

    /// Revoke a token. Unknown tokens are ignored.
    pub fn sign_out(&self, token: &str) -> Result<(), HeartspaceError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "DELETE FROM auth_tokens WHERE token = ?1",
                rusqlite::params![token],
            )
            .map_err(storage_err)?;
            Ok(())
        })
    }

    /// The user a token belongs to, or `None` if it is unknown or expired.
    pub fn current_user(&self, token: &str) -> Result<Option<User>, HeartspaceError> {
        let now = Utc::now().timestamp_millis();
        let row = self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT u.id, u.email, u.name, u.created_at
                 FROM auth_tokens t JOIN users u ON u.id = t.user_id
                 WHERE t.token = ?1 AND t.expires_at > ?2",
                rusqlite::params![token, now],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                },
            )
            .optional()
            .map_err(storage_err)
        })?;

        match row {
            Some((id, email, name, created_at)) => Ok(Some(User {
                id: parse_uuid(&id)?,
                email,
                name,
                created_at: from_millis(created_at)?,
            })),
            None => Ok(None),
        }
    }

    /// Delete expired tokens. Returns how many were removed.
    pub fn purge_expired_tokens(&self) -> Result<usize, HeartspaceError> {
        let now = Utc::now().timestamp_millis();
        let removed = self.db.with_conn(|conn| {
            conn.execute(
                "DELETE FROM auth_tokens WHERE expires_at <= ?1",
                rusqlite::params![now],
            )
            .map_err(storage_err)
        })?;
        if removed > 0 {
            info!(removed, "Purged expired auth tokens");
        }
        Ok(removed)
    }
}

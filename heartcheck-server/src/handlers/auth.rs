//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::middleware::auth::UserContext;
use crate::sessions::OpenedSession;
use crate::models::{AccountInfo, LoginRequest, LoginResponse, RegisterRequest};
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,      // Username
    pub sid: String,      // Session ID
    pub exp: usize,       // Expiration timestamp
    pub iat: usize,       // Issued at
}

/// Sign-up endpoint
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AccountInfo>)> {
    req.validate()?;

    // File I/O and hashing stay off the async workers
    let store = state.credentials.clone();
    let account = tokio::task::spawn_blocking(move || {
        store.register(&req.username, &req.password, &req.email)
    })
    .await??;

    tracing::info!("New account registered: {}", account.username);

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// Login endpoint: opens a fresh session bound to the issued token
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    req.validate()?;

    let store = state.credentials.clone();
    let attempted = req.username.clone();
    let account = tokio::task::spawn_blocking(move || {
        store.authenticate(&req.username, &req.password)
    })
    .await??
    .ok_or_else(|| {
        tracing::warn!("Failed login attempt for {}", attempted);
        AppError::InvalidCredentials
    })?;

    // Session and token share one expiry
    let session = state.sessions.open(&account.username);
    let token = generate_jwt(&account.username, &session, &state.config.jwt_secret)?;

    tracing::info!("User {} logged in (session {})", account.username, session.id);

    Ok(Json(LoginResponse {
        token,
        username: account.username,
        email: account.email,
    }))
}

/// Logout endpoint: drops the session and everything recorded in it
pub async fn logout(
    State(state): State<AppState>,
    user: UserContext,
) -> StatusCode {
    state.sessions.close(user.session_id);
    tracing::info!("User {} logged out (session {})", user.username, user.session_id);
    StatusCode::NO_CONTENT
}

/// Generate JWT token
fn generate_jwt(username: &str, session: &OpenedSession, secret: &str) -> AppResult<String> {
    let claims = Claims {
        sub: username.to_string(),
        sid: session.id.to_string(),
        exp: session.expires_at.timestamp() as usize,
        iat: session.issued_at.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes())
    ).map_err(|e| AppError::InternalError(e.to_string()))
}

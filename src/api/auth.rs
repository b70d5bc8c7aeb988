//! Authentication endpoints: login, logout, current user, password reset.

use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{request::Parts, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::{
    generate_reset_code, hash_password, needs_rehash, verify_password, RESET_CODE_TTL_MS,
};
use crate::db::{
    self, LoginRequest, LoginResponse, User, UserResponse,
};
use crate::AppState;

use super::error::{ApiError, ApiJson};
use super::Ack;

/// Pull the bearer token out of the Authorization header.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let auth = headers.get("Authorization")?.to_str().ok()?;
    let token = auth.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Extractor for the current authenticated user.
#[async_trait]
impl FromRequestParts<Arc<AppState>> for User {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;
        let user_id = state
            .sessions
            .resolve(&token)
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;
        db::find_user_by_id(&state.db, user_id)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))
    }
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = request.email.trim().to_lowercase();

    let user = db::find_user_by_email(&state.db, &email)
        .await?
        .filter(|user| verify_password(&request.password, &user.password))
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    // Upgrade on login: successful legacy or plaintext verification rewrites
    // the stored value with a fresh modern hash.
    if needs_rehash(&user.password) {
        let upgraded = hash_password(&request.password)?;
        db::update_user_password(&state.db, user.id, &upgraded).await?;
        tracing::info!(user_id = user.id, "Upgraded legacy password hash");
    }

    let token = state.sessions.create(user.id);

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from(user),
    }))
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Json<Ack> {
    if let Some(token) = extract_token(&headers) {
        state.sessions.revoke(&token);
    }
    Json(Ack::ok())
}

/// GET /api/auth/me
pub async fn me(user: User) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

#[derive(Debug, Deserialize)]
pub struct ResetRequestBody {
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetRequestResponse {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

/// POST /api/auth/request-reset
///
/// Demo-mode email bypass: the code is returned in the response body instead
/// of being mailed. Unknown emails get the same 200 to avoid account probing.
pub async fn request_reset(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<ResetRequestBody>,
) -> Result<Json<ResetRequestResponse>, ApiError> {
    let email = request.email.trim().to_lowercase();

    let Some(user) = db::find_user_by_email(&state.db, &email).await? else {
        return Ok(Json(ResetRequestResponse {
            ok: true,
            message: "If the email exists, instructions were sent.".to_string(),
            reset_code: None,
            expires_at: None,
        }));
    };

    let code = generate_reset_code();
    let expires_at = chrono::Utc::now().timestamp_millis() + RESET_CODE_TTL_MS;

    // A new request invalidates any prior live code for the user.
    db::invalidate_unused_reset_codes(&state.db, user.id).await?;
    db::insert_reset_code(&state.db, user.id, &code, expires_at).await?;

    Ok(Json(ResetRequestResponse {
        ok: true,
        message: "Code generated. In production it would be emailed.".to_string(),
        reset_code: Some(code),
        expires_at: Some(expires_at),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordBody {
    pub email: String,
    pub reset_code: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct ResetPasswordResponse {
    pub ok: bool,
    pub message: String,
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<ResetPasswordBody>,
) -> Result<Json<ResetPasswordResponse>, ApiError> {
    if request.new_password.len() < 6 {
        return Err(ApiError::bad_request(
            "New password must be at least 6 characters",
        ));
    }

    let email = request.email.trim().to_lowercase();
    let user = db::find_user_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::bad_request("Invalid recovery data"))?;

    let token = db::find_latest_reset_code(&state.db, user.id, request.reset_code.trim())
        .await?
        .filter(|token| !token.used && chrono::Utc::now().timestamp_millis() <= token.expires_at)
        .ok_or_else(|| ApiError::bad_request("Invalid or expired code"))?;

    let hashed = hash_password(&request.new_password)?;
    db::update_user_password(&state.db, user.id, &hashed).await?;
    db::mark_reset_code_used(&state.db, token.id).await?;

    Ok(Json(ResetPasswordResponse {
        ok: true,
        message: "Password updated".to_string(),
    }))
}

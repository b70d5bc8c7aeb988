//! Favorites: a per-user set of dish ids.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::db::{self, User};
use crate::AppState;

use super::error::{ApiError, ApiJson};
use super::Ack;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    pub dish_id: i64,
}

/// GET /api/favorites
pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    user: User,
) -> Result<Json<Vec<i64>>, ApiError> {
    Ok(Json(db::fetch_favorites(&state.db, user.id).await?))
}

/// POST /api/favorites
pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    user: User,
    ApiJson(request): ApiJson<FavoriteRequest>,
) -> Result<(StatusCode, Json<Ack>), ApiError> {
    if request.dish_id <= 0 {
        return Err(ApiError::bad_request("dishId is required"));
    }

    db::add_favorite(&state.db, user.id, request.dish_id).await?;

    Ok((StatusCode::CREATED, Json(Ack::ok())))
}

/// DELETE /api/favorites/:dish_id
pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(dish_id): Path<i64>,
) -> Result<Json<Ack>, ApiError> {
    db::remove_favorite(&state.db, user.id, dish_id).await?;
    Ok(Json(Ack::ok()))
}

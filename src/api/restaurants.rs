//! Restaurant CRUD. Creation and mutation are admin-only.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::db::{self, CreateRestaurantRequest, Restaurant, RestaurantPatch, User};
use crate::AppState;

use super::error::{ApiError, ApiJson};
use super::{require_admin, Ack, Created};

/// GET /api/restaurants
pub async fn list_restaurants(
    State(state): State<Arc<AppState>>,
    _user: User,
) -> Result<Json<Vec<Restaurant>>, ApiError> {
    Ok(Json(db::fetch_restaurants(&state.db).await?))
}

/// POST /api/restaurants
pub async fn create_restaurant(
    State(state): State<Arc<AppState>>,
    user: User,
    ApiJson(request): ApiJson<CreateRestaurantRequest>,
) -> Result<(StatusCode, Json<Created>), ApiError> {
    require_admin(&user)?;

    let name = request.name.trim();
    let location = request.location.trim();
    if name.is_empty() || location.is_empty() {
        return Err(ApiError::bad_request("name and location are required"));
    }

    let id = db::insert_restaurant(&state.db, name, location).await?;
    info!(restaurant_id = id, name, "Restaurant created");

    Ok((StatusCode::CREATED, Json(Created { id })))
}

/// PATCH /api/restaurants/:id
pub async fn update_restaurant(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<i64>,
    ApiJson(patch): ApiJson<RestaurantPatch>,
) -> Result<Json<Ack>, ApiError> {
    require_admin(&user)?;

    if patch.is_empty() {
        return Err(ApiError::bad_request("No fields to update"));
    }

    let affected = db::update_restaurant(&state.db, id, &patch).await?;
    if affected == 0 {
        return Err(ApiError::not_found("Restaurant not found"));
    }

    Ok(Json(Ack::ok()))
}

/// DELETE /api/restaurants/:id
pub async fn delete_restaurant(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<i64>,
) -> Result<Json<Ack>, ApiError> {
    require_admin(&user)?;

    let affected = db::delete_restaurant(&state.db, id).await?;
    if affected == 0 {
        return Err(ApiError::not_found("Restaurant not found"));
    }
    info!(restaurant_id = id, "Restaurant deleted");

    Ok(Json(Ack::ok()))
}

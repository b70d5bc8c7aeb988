//! Craving CRUD.
//!
//! Every craving is created together with a backing dish so it can be
//! ordered and favorited; edits propagate to the paired dish, and deleting
//! a craving removes the dish (and with it, favorites and reviews).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::db::{self, CreateDishRequest, Craving, DishPatch, User};
use crate::AppState;

use super::dishes::{validate_new_dish, validate_patch};
use super::error::{ApiError, ApiJson};
use super::{require_staff, Ack, Created};

/// GET /api/cravings
pub async fn list_cravings(
    State(state): State<Arc<AppState>>,
    _user: User,
) -> Result<Json<Vec<Craving>>, ApiError> {
    Ok(Json(db::fetch_cravings(&state.db).await?))
}

/// POST /api/cravings
pub async fn create_craving(
    State(state): State<Arc<AppState>>,
    user: User,
    ApiJson(request): ApiJson<CreateDishRequest>,
) -> Result<(StatusCode, Json<Created>), ApiError> {
    require_staff(&user)?;
    validate_new_dish(&request)?;

    if !user.can_manage_restaurant(request.restaurant_id) {
        return Err(ApiError::forbidden(
            "You can only create cravings for your own restaurant",
        ));
    }

    // Backing dish first, then the craving pointing at it.
    let dish_id = db::insert_dish(&state.db, &request).await?;
    let id = db::insert_craving(&state.db, dish_id, &request).await?;
    info!(craving_id = id, dish_id, "Craving created with backing dish");

    Ok((StatusCode::CREATED, Json(Created { id })))
}

async fn managed_craving(state: &AppState, user: &User, id: i64) -> Result<Craving, ApiError> {
    let craving = db::find_craving(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Craving not found"))?;
    if !user.can_manage_restaurant(craving.restaurant_id) {
        return Err(ApiError::forbidden("You cannot modify this craving"));
    }
    Ok(craving)
}

/// PATCH /api/cravings/:id
pub async fn update_craving(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<i64>,
    ApiJson(patch): ApiJson<DishPatch>,
) -> Result<Json<Ack>, ApiError> {
    require_staff(&user)?;
    let craving = managed_craving(&state, &user, id).await?;
    validate_patch(&patch)?;

    db::update_craving(&state.db, craving.id, &patch).await?;
    // Keep the backing dish in sync so carts and favorites see the edit.
    db::update_dish(&state.db, craving.dish_id, &patch).await?;

    Ok(Json(Ack::ok()))
}

/// DELETE /api/cravings/:id
pub async fn delete_craving(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<i64>,
) -> Result<Json<Ack>, ApiError> {
    require_staff(&user)?;
    let craving = managed_craving(&state, &user, id).await?;

    // Deleting the backing dish cascades to the craving row itself, plus any
    // favorites and reviews hanging off the dish.
    db::delete_dish(&state.db, craving.dish_id).await?;
    info!(craving_id = id, dish_id = craving.dish_id, "Craving deleted");

    Ok(Json(Ack::ok()))
}

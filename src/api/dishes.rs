//! Dish CRUD. Admins manage any menu; a restaurant operator only their own.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::db::{self, CreateDishRequest, Dish, DishPatch, User};
use crate::AppState;

use super::error::{ApiError, ApiJson};
use super::{require_staff, Ack, Created};

pub(super) fn validate_new_dish(request: &CreateDishRequest) -> Result<(), ApiError> {
    if request.title.trim().is_empty() {
        return Err(ApiError::bad_request(
            "restaurantId, title and price are required",
        ));
    }
    if request.price < 0 {
        return Err(ApiError::bad_request("price must not be negative"));
    }
    Ok(())
}

pub(super) fn validate_patch(patch: &DishPatch) -> Result<(), ApiError> {
    if patch.is_empty() {
        return Err(ApiError::bad_request("No fields to update"));
    }
    if matches!(patch.price, Some(price) if price < 0) {
        return Err(ApiError::bad_request("price must not be negative"));
    }
    Ok(())
}

/// GET /api/dishes
pub async fn list_dishes(
    State(state): State<Arc<AppState>>,
    user: User,
) -> Result<Json<Vec<Dish>>, ApiError> {
    Ok(Json(
        db::fetch_dishes(&state.db, user.restaurant_scope()).await?,
    ))
}

/// POST /api/dishes
pub async fn create_dish(
    State(state): State<Arc<AppState>>,
    user: User,
    ApiJson(request): ApiJson<CreateDishRequest>,
) -> Result<(StatusCode, Json<Created>), ApiError> {
    require_staff(&user)?;
    validate_new_dish(&request)?;

    if !user.can_manage_restaurant(request.restaurant_id) {
        return Err(ApiError::forbidden(
            "You can only create dishes for your own restaurant",
        ));
    }

    let id = db::insert_dish(&state.db, &request).await?;
    info!(dish_id = id, restaurant_id = request.restaurant_id, "Dish created");

    Ok((StatusCode::CREATED, Json(Created { id })))
}

/// Load a dish and check the caller may mutate it. A missing dish is a 404
/// for everyone; a dish of another restaurant is a 403, not a 404.
async fn managed_dish(state: &AppState, user: &User, id: i64) -> Result<Dish, ApiError> {
    let dish = db::find_dish(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Dish not found"))?;
    if !user.can_manage_restaurant(dish.restaurant_id) {
        return Err(ApiError::forbidden("You cannot modify this dish"));
    }
    Ok(dish)
}

/// PATCH /api/dishes/:id
pub async fn update_dish(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<i64>,
    ApiJson(patch): ApiJson<DishPatch>,
) -> Result<Json<Ack>, ApiError> {
    require_staff(&user)?;
    let dish = managed_dish(&state, &user, id).await?;
    validate_patch(&patch)?;

    db::update_dish(&state.db, dish.id, &patch).await?;

    Ok(Json(Ack::ok()))
}

/// DELETE /api/dishes/:id
pub async fn delete_dish(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<i64>,
) -> Result<Json<Ack>, ApiError> {
    require_staff(&user)?;
    let dish = managed_dish(&state, &user, id).await?;

    db::delete_dish(&state.db, dish.id).await?;
    info!(dish_id = id, "Dish deleted");

    Ok(Json(Ack::ok()))
}

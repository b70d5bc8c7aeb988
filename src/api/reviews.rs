//! Dish reviews.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::{self, CreateReviewRequest, Review, User};
use crate::AppState;

use super::error::{ApiError, ApiJson};
use super::Created;

/// GET /api/dishes/:id/reviews
pub async fn list_dish_reviews(
    State(state): State<Arc<AppState>>,
    _user: User,
    Path(dish_id): Path<i64>,
) -> Result<Json<Vec<Review>>, ApiError> {
    Ok(Json(db::fetch_reviews_for_dish(&state.db, dish_id).await?))
}

/// POST /api/dishes/:id/reviews
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(dish_id): Path<i64>,
    ApiJson(request): ApiJson<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Created>), ApiError> {
    let comment = request.comment.trim();
    if comment.is_empty() || !(1..=5).contains(&request.rating) {
        return Err(ApiError::bad_request("rating (1-5) and comment are required"));
    }

    if db::find_dish(&state.db, dish_id).await?.is_none() {
        return Err(ApiError::not_found("Dish not found"));
    }

    // Author name captured at post time; a later display-name change does
    // not rewrite old reviews.
    let id = db::insert_review(
        &state.db,
        dish_id,
        user.id,
        &user.display_name,
        request.rating,
        comment,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(Created { id })))
}

//! Single aggregate fetch the browser client reloads after every state
//! change.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::db::{
    self, Craving, Dish, OrderWithItems, Restaurant, Review, SubscriptionWithItems, User,
    UserResponse,
};
use crate::AppState;

use super::error::ApiError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapResponse {
    pub user: UserResponse,
    pub restaurants: Vec<Restaurant>,
    pub dishes: Vec<Dish>,
    pub cravings: Vec<Craving>,
    pub favorites: Vec<i64>,
    pub reviews: Vec<Review>,
    pub subscriptions: Vec<SubscriptionWithItems>,
    pub latest_order: Option<OrderWithItems>,
}

/// GET /api/bootstrap
pub async fn bootstrap(
    State(state): State<Arc<AppState>>,
    user: User,
) -> Result<Json<BootstrapResponse>, ApiError> {
    let scope = user.restaurant_scope();

    let restaurants = db::fetch_restaurants(&state.db).await?;
    let dishes = db::fetch_dishes(&state.db, scope).await?;
    let cravings = db::fetch_cravings(&state.db).await?;
    let favorites = db::fetch_favorites(&state.db, user.id).await?;
    let reviews = db::fetch_reviews(&state.db, scope).await?;
    let subscriptions = db::fetch_subscriptions(&state.db, user.id).await?;
    let latest_order = db::fetch_latest_order(&state.db, user.id).await?;

    Ok(Json(BootstrapResponse {
        user: UserResponse::from(user),
        restaurants,
        dishes,
        cravings,
        favorites,
        reviews,
        subscriptions,
        latest_order,
    }))
}

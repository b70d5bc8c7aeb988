pub mod auth;
mod bootstrap;
mod cravings;
mod dishes;
pub mod error;
mod favorites;
mod orders;
mod restaurants;
mod reviews;
mod subscriptions;

pub use error::{ApiError, ApiJson};

use axum::{
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

/// Plain acknowledgement body for mutations that return no entity.
#[derive(Debug, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// Body for creations that only hand back the new row id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
    pub id: i64,
}

pub(crate) fn require_admin(user: &crate::db::User) -> Result<(), ApiError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(ApiError::forbidden("Not authorized for this action"))
    }
}

/// Admin or restaurant operator; operators are additionally constrained to
/// their own restaurant at the call sites.
pub(crate) fn require_staff(user: &crate::db::User) -> Result<(), ApiError> {
    if user.is_admin() || user.is_restaurant() {
        Ok(())
    } else {
        Err(ApiError::forbidden("Not authorized for this action"))
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/request-reset", post(auth::request_reset))
        .route("/reset-password", post(auth::reset_password))
        .route("/me", get(auth::me));

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .nest("/auth", auth_routes)
        .route("/bootstrap", get(bootstrap::bootstrap))
        // Restaurants
        .route("/restaurants", get(restaurants::list_restaurants))
        .route("/restaurants", post(restaurants::create_restaurant))
        .route("/restaurants/:id", patch(restaurants::update_restaurant))
        .route("/restaurants/:id", delete(restaurants::delete_restaurant))
        // Dishes
        .route("/dishes", get(dishes::list_dishes))
        .route("/dishes", post(dishes::create_dish))
        .route("/dishes/:id", patch(dishes::update_dish))
        .route("/dishes/:id", delete(dishes::delete_dish))
        .route("/dishes/:id/reviews", get(reviews::list_dish_reviews))
        .route("/dishes/:id/reviews", post(reviews::create_review))
        // Cravings
        .route("/cravings", get(cravings::list_cravings))
        .route("/cravings", post(cravings::create_craving))
        .route("/cravings/:id", patch(cravings::update_craving))
        .route("/cravings/:id", delete(cravings::delete_craving))
        // Favorites
        .route("/favorites", get(favorites::list_favorites))
        .route("/favorites", post(favorites::add_favorite))
        .route("/favorites/:dish_id", delete(favorites::remove_favorite))
        // Orders
        .route("/orders", post(orders::create_order))
        .route("/orders/:id/status", patch(orders::update_order_status))
        // Subscriptions
        .route("/subscriptions", get(subscriptions::list_subscriptions))
        .route("/subscriptions", post(subscriptions::create_subscription))
        .route("/subscriptions/:id", delete(subscriptions::delete_subscription));

    Router::new()
        .nest("/api", api_routes)
        .fallback(unknown_route)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    ok: bool,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn unknown_route() -> ApiError {
    ApiError::not_found("Route not found")
}

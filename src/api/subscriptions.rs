//! Recurring-delivery subscriptions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::db::{
    self, plan_fee_for, CreateSubscriptionRequest, SubscriptionWithItems, User,
};
use crate::AppState;

use super::error::{ApiError, ApiJson};
use super::{Ack, Created};

/// GET /api/subscriptions
pub async fn list_subscriptions(
    State(state): State<Arc<AppState>>,
    user: User,
) -> Result<Json<Vec<SubscriptionWithItems>>, ApiError> {
    Ok(Json(db::fetch_subscriptions(&state.db, user.id).await?))
}

/// POST /api/subscriptions
///
/// Items referencing a missing dish are skipped; the fee comes from the
/// fixed frequency tier, never from the client.
pub async fn create_subscription(
    State(state): State<Arc<AppState>>,
    user: User,
    ApiJson(request): ApiJson<CreateSubscriptionRequest>,
) -> Result<(StatusCode, Json<Created>), ApiError> {
    if request.name.trim().is_empty()
        || request.frequency.trim().is_empty()
        || request.pickup_time.trim().is_empty()
        || request.payment_method.trim().is_empty()
        || request.items.is_empty()
    {
        return Err(ApiError::bad_request(
            "name, frequency, pickupTime, paymentMethod and items are required",
        ));
    }

    let plan_fee = plan_fee_for(&request.frequency);
    if plan_fee == 0 {
        return Err(ApiError::bad_request("Invalid frequency"));
    }

    let id = db::insert_subscription(
        &state.db,
        user.id,
        request.name.trim(),
        &request.frequency,
        plan_fee,
        request.pickup_time.trim(),
        request.payment_method.trim(),
    )
    .await?;

    for item in &request.items {
        if db::find_dish(&state.db, item.dish_id).await?.is_none() {
            continue;
        }
        let quantity = item.quantity.unwrap_or(1).max(1);
        db::insert_subscription_item(&state.db, id, item.dish_id, quantity).await?;
    }

    info!(subscription_id = id, user_id = user.id, plan_fee, "Subscription created");

    Ok((StatusCode::CREATED, Json(Created { id })))
}

/// DELETE /api/subscriptions/:id
pub async fn delete_subscription(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<i64>,
) -> Result<Json<Ack>, ApiError> {
    let affected = db::delete_subscription(&state.db, id, user.id).await?;
    if affected == 0 {
        return Err(ApiError::not_found("Subscription not found"));
    }
    Ok(Json(Ack::ok()))
}

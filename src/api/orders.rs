//! Order placement and status updates.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::db::{
    self, plan_fee_for, CreateOrderRequest, OrderReceipt, OrderStatusRequest, User,
};
use crate::AppState;

use super::error::{ApiError, ApiJson};
use super::{require_staff, Ack};

/// Round-half-up percentage discount on an integer subtotal. None when the
/// intermediate product overflows.
fn discount_for(subtotal: i64, promo_percent: i64) -> Option<i64> {
    Some(subtotal.checked_mul(promo_percent)?.checked_add(50)? / 100)
}

/// POST /api/orders
///
/// Cart lines whose dish is gone or sold out are silently dropped; the order
/// only fails when nothing valid remains.
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    user: User,
    ApiJson(request): ApiJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderReceipt>), ApiError> {
    if request.pickup_time.trim().is_empty()
        || request.payment_method.trim().is_empty()
        || request.items.is_empty()
    {
        return Err(ApiError::bad_request(
            "pickupTime, paymentMethod and items are required",
        ));
    }

    let mut subtotal = 0i64;
    let mut valid_items = Vec::new();
    for item in &request.items {
        let Some(dish) = db::find_dish(&state.db, item.dish_id).await? else {
            continue;
        };
        if dish.sold_out {
            continue;
        }
        let quantity = item.quantity.unwrap_or(1).max(1);
        // Quantities come from the client; overflow is a bad request, not a
        // wrapped subtotal.
        subtotal = dish
            .price
            .checked_mul(quantity)
            .and_then(|line_total| subtotal.checked_add(line_total))
            .ok_or_else(|| ApiError::bad_request("Order quantity is too large"))?;
        // Price frozen at submission time.
        valid_items.push((dish.id, quantity, dish.price));
    }

    if valid_items.is_empty() {
        return Err(ApiError::bad_request("No valid items in the order"));
    }

    let discount_amount = discount_for(subtotal, user.promo_percent)
        .ok_or_else(|| ApiError::bad_request("Order total is too large"))?;

    let subscription_frequency = request
        .subscription
        .as_ref()
        .filter(|sub| sub.enabled)
        .map(|sub| sub.frequency.clone().unwrap_or_default());
    let subscription_fee = match subscription_frequency.as_deref() {
        Some(frequency) => {
            let fee = plan_fee_for(frequency);
            if fee == 0 {
                return Err(ApiError::bad_request("Invalid subscription frequency"));
            }
            fee
        }
        None => 0,
    };

    let total_amount = (subtotal - discount_amount)
        .saturating_add(subscription_fee)
        .max(0);

    let order_id = db::insert_order(
        &state.db,
        user.id,
        request.pickup_time.trim(),
        request.payment_method.trim(),
        subtotal,
        discount_amount,
        subscription_frequency.as_deref(),
        subscription_fee,
        total_amount,
    )
    .await?;

    for (dish_id, quantity, price) in &valid_items {
        db::insert_order_item(&state.db, order_id, *dish_id, *quantity, *price).await?;
    }

    info!(
        order_id,
        user_id = user.id,
        subtotal,
        total_amount,
        "Order placed"
    );

    Ok((
        StatusCode::CREATED,
        Json(OrderReceipt {
            id: order_id,
            subtotal,
            discount_amount,
            subscription_fee,
            total_amount,
        }),
    ))
}

/// PATCH /api/orders/:id/status
///
/// Free-form status code and label; transitions are not validated.
pub async fn update_order_status(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<OrderStatusRequest>,
) -> Result<Json<Ack>, ApiError> {
    require_staff(&user)?;

    if request.status.trim().is_empty() || request.status_label.trim().is_empty() {
        return Err(ApiError::bad_request("status and statusLabel are required"));
    }

    let affected = db::update_order_status(
        &state.db,
        id,
        request.status.trim(),
        request.status_label.trim(),
    )
    .await?;
    if affected == 0 {
        return Err(ApiError::not_found("Order not found"));
    }

    Ok(Json(Ack::ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discount_rounds_half_up() {
        assert_eq!(discount_for(20000, 10), Some(2000));
        assert_eq!(discount_for(999, 10), Some(100)); // 99.9 rounds up
        assert_eq!(discount_for(994, 10), Some(99)); // 99.4 rounds down
        assert_eq!(discount_for(12345, 0), Some(0));
    }

    #[test]
    fn discount_refuses_to_overflow() {
        assert_eq!(discount_for(i64::MAX, 10), None);
    }
}

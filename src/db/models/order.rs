//! Order models and accessors.
//!
//! Order items snapshot the dish price at submission time so later menu
//! edits never alter historical totals.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

pub mod statuses {
    pub const PREPARING: &str = "preparing";
    pub const PREPARING_LABEL: &str = "En preparación";
}

pub const QUEUE_EXCLUSIVE: &str = "exclusive";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub pickup_time: String,
    pub payment_method: String,
    pub subtotal: i64,
    pub discount_amount: i64,
    pub subscription_frequency: Option<String>,
    pub subscription_fee: i64,
    pub total_amount: i64,
    pub status: String,
    pub status_label: String,
    pub queue_type: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub dish_id: i64,
    pub quantity: i64,
    pub price_snapshot: i64,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub pickup_time: String,
    pub payment_method: String,
    #[serde(default)]
    pub items: Vec<CartItemRequest>,
    #[serde(default)]
    pub subscription: Option<InlineSubscriptionRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest {
    pub dish_id: i64,
    pub quantity: Option<i64>,
}

/// Optional recurring-delivery opt-in placed together with an order.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineSubscriptionRequest {
    #[serde(default)]
    pub enabled: bool,
    pub frequency: Option<String>,
}

/// Totals returned to the client on creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub id: i64,
    pub subtotal: i64,
    pub discount_amount: i64,
    pub subscription_fee: i64,
    pub total_amount: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusRequest {
    pub status: String,
    pub status_label: String,
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_order(
    pool: &SqlitePool,
    user_id: i64,
    pickup_time: &str,
    payment_method: &str,
    subtotal: i64,
    discount_amount: i64,
    subscription_frequency: Option<&str>,
    subscription_fee: i64,
    total_amount: i64,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO orders (user_id, pickup_time, payment_method, subtotal, discount_amount, \
             subscription_frequency, subscription_fee, total_amount, status, status_label, queue_type) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(pickup_time)
    .bind(payment_method)
    .bind(subtotal)
    .bind(discount_amount)
    .bind(subscription_frequency)
    .bind(subscription_fee)
    .bind(total_amount)
    .bind(statuses::PREPARING)
    .bind(statuses::PREPARING_LABEL)
    .bind(QUEUE_EXCLUSIVE)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn insert_order_item(
    pool: &SqlitePool,
    order_id: i64,
    dish_id: i64,
    quantity: i64,
    price_snapshot: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO order_items (order_id, dish_id, quantity, price_snapshot) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(order_id)
    .bind(dish_id)
    .bind(quantity)
    .bind(price_snapshot)
    .execute(pool)
    .await?;
    Ok(())
}

/// Most recent order for the user, with its line items, or None.
pub async fn fetch_latest_order(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Option<OrderWithItems>, sqlx::Error> {
    let order: Option<Order> = sqlx::query_as(
        "SELECT id, pickup_time, payment_method, subtotal, discount_amount, \
             subscription_frequency, subscription_fee, total_amount, status, status_label, \
             queue_type, created_at \
         FROM orders WHERE user_id = ? ORDER BY id DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    let Some(order) = order else {
        return Ok(None);
    };

    let items: Vec<OrderItem> = sqlx::query_as(
        "SELECT oi.dish_id, oi.quantity, oi.price_snapshot, d.title \
         FROM order_items oi JOIN dishes d ON d.id = oi.dish_id \
         WHERE oi.order_id = ?",
    )
    .bind(order.id)
    .fetch_all(pool)
    .await?;

    Ok(Some(OrderWithItems { order, items }))
}

/// Free-form status transition; any label may follow any other.
pub async fn update_order_status(
    pool: &SqlitePool,
    order_id: i64,
    status: &str,
    status_label: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE orders SET status = ?, status_label = ? WHERE id = ?")
        .bind(status)
        .bind(status_label)
        .bind(order_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

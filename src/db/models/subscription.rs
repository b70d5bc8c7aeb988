//! Subscription models, plan-fee table, and accessors.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

pub const DAILY_FEE: i64 = 5000;
pub const WEEKLY_FEE: i64 = 12000;
pub const MONTHLY_FEE: i64 = 30000;

/// Fixed plan fee for a frequency tier; 0 means the frequency is not
/// recognized. Spanish tier names from the legacy client are accepted.
pub fn plan_fee_for(frequency: &str) -> i64 {
    match frequency.trim().to_uppercase().as_str() {
        "DAILY" | "DIARIA" => DAILY_FEE,
        "WEEKLY" | "SEMANAL" => WEEKLY_FEE,
        "MONTHLY" | "MENSUAL" => MONTHLY_FEE,
        _ => 0,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: i64,
    pub name: String,
    pub frequency: String,
    pub plan_fee: i64,
    pub pickup_time: String,
    pub payment_method: String,
    pub active: bool,
    pub created_at: String,
}

/// Subscription items carry no price snapshot; the current dish title and
/// price are resolved at read time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionItem {
    pub dish_id: i64,
    pub quantity: i64,
    pub title: String,
    pub price: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionWithItems {
    #[serde(flatten)]
    pub subscription: Subscription,
    pub items: Vec<SubscriptionItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    pub name: String,
    pub frequency: String,
    pub pickup_time: String,
    pub payment_method: String,
    #[serde(default)]
    pub items: Vec<SubscriptionItemRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionItemRequest {
    pub dish_id: i64,
    pub quantity: Option<i64>,
}

pub async fn fetch_subscriptions(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<SubscriptionWithItems>, sqlx::Error> {
    let subscriptions: Vec<Subscription> = sqlx::query_as(
        "SELECT id, name, frequency, plan_fee, pickup_time, payment_method, active, created_at \
         FROM subscriptions WHERE user_id = ? ORDER BY id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut results = Vec::with_capacity(subscriptions.len());
    for mut subscription in subscriptions {
        // Rows that predate fee tracking fall back to the tier table.
        if subscription.plan_fee == 0 {
            subscription.plan_fee = plan_fee_for(&subscription.frequency);
        }
        let items = fetch_subscription_items(pool, subscription.id).await?;
        results.push(SubscriptionWithItems {
            subscription,
            items,
        });
    }
    Ok(results)
}

async fn fetch_subscription_items(
    pool: &SqlitePool,
    subscription_id: i64,
) -> Result<Vec<SubscriptionItem>, sqlx::Error> {
    sqlx::query_as(
        "SELECT si.dish_id, si.quantity, d.title, d.price \
         FROM subscription_items si JOIN dishes d ON d.id = si.dish_id \
         WHERE si.subscription_id = ?",
    )
    .bind(subscription_id)
    .fetch_all(pool)
    .await
}

pub async fn insert_subscription(
    pool: &SqlitePool,
    user_id: i64,
    name: &str,
    frequency: &str,
    plan_fee: i64,
    pickup_time: &str,
    payment_method: &str,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO subscriptions (user_id, name, frequency, plan_fee, pickup_time, payment_method, active) \
         VALUES (?, ?, ?, ?, ?, ?, 1)",
    )
    .bind(user_id)
    .bind(name)
    .bind(frequency)
    .bind(plan_fee)
    .bind(pickup_time)
    .bind(payment_method)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn insert_subscription_item(
    pool: &SqlitePool,
    subscription_id: i64,
    dish_id: i64,
    quantity: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO subscription_items (subscription_id, dish_id, quantity) VALUES (?, ?, ?)",
    )
    .bind(subscription_id)
    .bind(dish_id)
    .bind(quantity)
    .execute(pool)
    .await?;
    Ok(())
}

/// Scoped to the owner: a user can only cancel their own subscription.
pub async fn delete_subscription(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM subscriptions WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_frequencies_map_to_fixed_fees() {
        assert_eq!(plan_fee_for("DAILY"), 5000);
        assert_eq!(plan_fee_for("WEEKLY"), 12000);
        assert_eq!(plan_fee_for("MONTHLY"), 30000);
    }

    #[test]
    fn legacy_spanish_tiers_are_accepted() {
        assert_eq!(plan_fee_for("diaria"), 5000);
        assert_eq!(plan_fee_for(" Semanal "), 12000);
        assert_eq!(plan_fee_for("MENSUAL"), 30000);
    }

    #[test]
    fn unknown_frequency_has_no_fee() {
        assert_eq!(plan_fee_for("YEARLY"), 0);
        assert_eq!(plan_fee_for(""), 0);
    }
}

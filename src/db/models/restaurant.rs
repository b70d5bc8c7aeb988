//! Restaurant model and accessors.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateRestaurantRequest {
    pub name: String,
    pub location: String,
}

/// Partial update; every field independently optional. An all-empty patch is
/// a client error, checked by the handler.
#[derive(Debug, Default, Deserialize)]
pub struct RestaurantPatch {
    pub name: Option<String>,
    pub location: Option<String>,
}

impl RestaurantPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.location.is_none()
    }
}

pub async fn fetch_restaurants(pool: &SqlitePool) -> Result<Vec<Restaurant>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, name, location, created_at FROM restaurants ORDER BY id DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn find_restaurant(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<Restaurant>, sqlx::Error> {
    sqlx::query_as("SELECT id, name, location, created_at FROM restaurants WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert_restaurant(
    pool: &SqlitePool,
    name: &str,
    location: &str,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query("INSERT INTO restaurants (name, location) VALUES (?, ?)")
        .bind(name)
        .bind(location)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn update_restaurant(
    pool: &SqlitePool,
    id: i64,
    patch: &RestaurantPatch,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE restaurants SET name = COALESCE(?, name), location = COALESCE(?, location) \
         WHERE id = ?",
    )
    .bind(patch.name.as_deref().map(str::trim))
    .bind(patch.location.as_deref().map(str::trim))
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Cascades to dishes and cravings; operator users keep their account with
/// restaurant_id set to NULL.
pub async fn delete_restaurant(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM restaurants WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

//! Craving model and accessors.
//!
//! A craving is a promotional snack listing paired 1:1 with a backing dish,
//! created together so cravings can be ordered and favorited through the
//! regular cart machinery. Craving edits propagate to the paired dish.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use super::dish::{CreateDishRequest, DishPatch};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Craving {
    pub id: i64,
    pub restaurant_id: i64,
    pub dish_id: i64,
    pub title: String,
    pub description: String,
    pub price: i64,
    pub calories: i64,
    pub ingredients: Option<String>,
    pub photo: Option<String>,
    pub sold_out: bool,
    pub created_at: String,
    pub restaurant_name: String,
    pub restaurant_location: String,
}

const CRAVING_SELECT: &str = "SELECT c.id, c.restaurant_id, c.dish_id, c.title, c.description, \
     c.price, c.calories, c.ingredients, c.photo, c.sold_out, c.created_at, \
     r.name AS restaurant_name, r.location AS restaurant_location \
     FROM cravings c JOIN restaurants r ON r.id = c.restaurant_id";

/// Cravings are campus-wide promotions; every role sees the full list.
pub async fn fetch_cravings(pool: &SqlitePool) -> Result<Vec<Craving>, sqlx::Error> {
    sqlx::query_as(&format!("{CRAVING_SELECT} ORDER BY c.id DESC"))
        .fetch_all(pool)
        .await
}

pub async fn find_craving(pool: &SqlitePool, id: i64) -> Result<Option<Craving>, sqlx::Error> {
    sqlx::query_as(&format!("{CRAVING_SELECT} WHERE c.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Insert the craving row pointing at an already-created backing dish.
pub async fn insert_craving(
    pool: &SqlitePool,
    dish_id: i64,
    req: &CreateDishRequest,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO cravings (restaurant_id, dish_id, title, description, price, calories, ingredients, photo, sold_out) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(req.restaurant_id)
    .bind(dish_id)
    .bind(req.title.trim())
    .bind(req.description.trim())
    .bind(req.price)
    .bind(req.calories)
    .bind(req.ingredients.trim())
    .bind(req.photo.trim())
    .bind(req.sold_out)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn update_craving(
    pool: &SqlitePool,
    id: i64,
    patch: &DishPatch,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE cravings SET \
            title = COALESCE(?, title), \
            description = COALESCE(?, description), \
            price = COALESCE(?, price), \
            calories = COALESCE(?, calories), \
            ingredients = COALESCE(?, ingredients), \
            photo = COALESCE(?, photo), \
            sold_out = COALESCE(?, sold_out) \
         WHERE id = ?",
    )
    .bind(patch.title.as_deref().map(str::trim))
    .bind(patch.description.as_deref().map(str::trim))
    .bind(patch.price)
    .bind(patch.calories)
    .bind(patch.ingredients.as_deref().map(str::trim))
    .bind(patch.photo.as_deref().map(str::trim))
    .bind(patch.sold_out)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

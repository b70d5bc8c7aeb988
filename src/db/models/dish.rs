//! Dish model and accessors.
//!
//! Dishes always render with their restaurant's name and location attached,
//! so reads join against restaurants.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub id: i64,
    pub restaurant_id: i64,
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

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDishRequest {
    pub restaurant_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: i64,
    #[serde(default)]
    pub calories: i64,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub sold_out: bool,
}

/// Partial update for a dish; shared with cravings, whose edits propagate to
/// the paired dish with the same field set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub calories: Option<i64>,
    pub ingredients: Option<String>,
    pub photo: Option<String>,
    pub sold_out: Option<bool>,
}

impl DishPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.calories.is_none()
            && self.ingredients.is_none()
            && self.photo.is_none()
            && self.sold_out.is_none()
    }
}

const DISH_SELECT: &str = "SELECT d.id, d.restaurant_id, d.title, d.description, d.price, \
     d.calories, d.ingredients, d.photo, d.sold_out, d.created_at, \
     r.name AS restaurant_name, r.location AS restaurant_location \
     FROM dishes d JOIN restaurants r ON r.id = d.restaurant_id";

/// List dishes; a restaurant operator only sees their own menu.
pub async fn fetch_dishes(
    pool: &SqlitePool,
    restaurant_scope: Option<i64>,
) -> Result<Vec<Dish>, sqlx::Error> {
    match restaurant_scope {
        Some(restaurant_id) => {
            sqlx::query_as(&format!(
                "{DISH_SELECT} WHERE d.restaurant_id = ? ORDER BY d.id DESC"
            ))
            .bind(restaurant_id)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as(&format!("{DISH_SELECT} ORDER BY d.id DESC"))
                .fetch_all(pool)
                .await
        }
    }
}

pub async fn find_dish(pool: &SqlitePool, id: i64) -> Result<Option<Dish>, sqlx::Error> {
    sqlx::query_as(&format!("{DISH_SELECT} WHERE d.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert_dish(pool: &SqlitePool, req: &CreateDishRequest) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO dishes (restaurant_id, title, description, price, calories, ingredients, photo, sold_out) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(req.restaurant_id)
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

pub async fn update_dish(
    pool: &SqlitePool,
    id: i64,
    patch: &DishPatch,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE dishes SET \
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

/// Cascades to order items, reviews, favorites, subscription items, and the
/// paired craving when one exists.
pub async fn delete_dish(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM dishes WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

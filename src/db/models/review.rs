//! Review model and accessors.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub dish_id: i64,
    pub author: String,
    pub rating: i64,
    pub comment: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub rating: i64,
    pub comment: String,
}

/// List reviews; a restaurant operator only sees reviews of their own dishes.
pub async fn fetch_reviews(
    pool: &SqlitePool,
    restaurant_scope: Option<i64>,
) -> Result<Vec<Review>, sqlx::Error> {
    match restaurant_scope {
        Some(restaurant_id) => {
            sqlx::query_as(
                "SELECT rv.id, rv.dish_id, rv.author, rv.rating, rv.comment, rv.created_at \
                 FROM reviews rv JOIN dishes d ON d.id = rv.dish_id \
                 WHERE d.restaurant_id = ? ORDER BY rv.id DESC",
            )
            .bind(restaurant_id)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as(
                "SELECT id, dish_id, author, rating, comment, created_at \
                 FROM reviews ORDER BY id DESC",
            )
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn fetch_reviews_for_dish(
    pool: &SqlitePool,
    dish_id: i64,
) -> Result<Vec<Review>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, dish_id, author, rating, comment, created_at \
         FROM reviews WHERE dish_id = ? ORDER BY id DESC",
    )
    .bind(dish_id)
    .fetch_all(pool)
    .await
}

/// The author name is denormalized at post time; later display-name changes
/// do not rewrite past reviews.
pub async fn insert_review(
    pool: &SqlitePool,
    dish_id: i64,
    user_id: i64,
    author: &str,
    rating: i64,
    comment: &str,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO reviews (dish_id, user_id, author, rating, comment) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(dish_id)
    .bind(user_id)
    .bind(author)
    .bind(rating)
    .bind(comment)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

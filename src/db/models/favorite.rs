//! Favorite accessors: a (user, dish) pair with no lifecycle of its own.
//! The API exposes favorites as a bare list of dish ids.

use sqlx::SqlitePool;

pub async fn fetch_favorites(pool: &SqlitePool, user_id: i64) -> Result<Vec<i64>, sqlx::Error> {
    let rows: Vec<(i64,)> = sqlx::query_as("SELECT dish_id FROM favorites WHERE user_id = ?")
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Re-favoriting is a no-op, not a conflict.
pub async fn add_favorite(
    pool: &SqlitePool,
    user_id: i64,
    dish_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT OR IGNORE INTO favorites (user_id, dish_id) VALUES (?, ?)")
        .bind(user_id)
        .bind(dish_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn remove_favorite(
    pool: &SqlitePool,
    user_id: i64,
    dish_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM favorites WHERE user_id = ? AND dish_id = ?")
        .bind(user_id)
        .bind(dish_id)
        .execute(pool)
        .await?;
    Ok(())
}

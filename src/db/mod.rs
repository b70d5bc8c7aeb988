mod models;
mod seeders;

pub use models::*;

use anyhow::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

pub type DbPool = SqlitePool;

/// Execute a SQL migration file, properly handling comments
async fn execute_sql(pool: &SqlitePool, sql: &str) -> Result<()> {
    for statement in sql.split(';') {
        // Strip SQL comment lines (lines starting with --)
        let cleaned: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let trimmed = cleaned.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
        }
    }
    Ok(())
}

pub async fn init(data_dir: &Path) -> Result<DbPool> {
    let db_path = data_dir.join("foodlab.db");
    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    info!("Initializing database at {}", db_path.display());

    init_with_url(&db_url).await
}

/// Open a pool against an explicit SQLite URL and bring the schema up to
/// date. Requests are served off a single connection.
pub async fn init_with_url(db_url: &str) -> Result<DbPool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(db_url)
        .await?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;

    run_migrations(&pool).await?;
    seeders::seed_if_empty(&pool).await?;

    info!("Database initialized successfully");
    Ok(pool)
}

/// Additive column migration: add the column when pragma_table_info does not
/// already list it. Never destructive.
async fn add_column_if_missing(
    pool: &SqlitePool,
    table: &str,
    column: &str,
    definition: &str,
) -> Result<()> {
    let present: Option<(String,)> = sqlx::query_as(&format!(
        "SELECT name FROM pragma_table_info('{table}') WHERE name = ?"
    ))
    .bind(column)
    .fetch_optional(pool)
    .await?;

    if present.is_none() {
        sqlx::query(&format!(
            "ALTER TABLE {table} ADD COLUMN {column} {definition}"
        ))
        .execute(pool)
        .await?;
    }

    Ok(())
}

async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    info!("Running database migrations...");

    // Migration 001: Initial schema
    execute_sql(pool, include_str!("../../migrations/001_initial.sql")).await?;

    // Columns added after the initial release. Databases created before the
    // column existed get it with the original default.
    let added_columns: &[(&str, &str, &str)] = &[
        ("dishes", "calories", "INTEGER NOT NULL DEFAULT 0"),
        ("orders", "subtotal", "INTEGER NOT NULL DEFAULT 0"),
        ("orders", "discount_amount", "INTEGER NOT NULL DEFAULT 0"),
        ("orders", "subscription_frequency", "TEXT"),
        ("orders", "subscription_fee", "INTEGER NOT NULL DEFAULT 0"),
        ("orders", "total_amount", "INTEGER NOT NULL DEFAULT 0"),
        ("subscriptions", "plan_fee", "INTEGER NOT NULL DEFAULT 0"),
        ("reviews", "user_id", "INTEGER"),
    ];
    for (table, column, definition) in added_columns {
        add_column_if_missing(pool, table, column, definition).await?;
    }

    // Migration 002: repair zero-valued fees on rows that predate fee
    // tracking. Safe to re-run on every startup.
    execute_sql(pool, include_str!("../../migrations/002_fee_repair.sql")).await?;

    info!("Migrations completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn init_is_idempotent() {
        let pool = init_with_url("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM restaurants")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 2, "seed runs once, repairs re-run safely");
    }

    #[tokio::test]
    async fn add_column_if_missing_skips_existing() {
        let pool = init_with_url("sqlite::memory:").await.unwrap();
        // calories already exists; a second add must not fail
        add_column_if_missing(&pool, "dishes", "calories", "INTEGER NOT NULL DEFAULT 0")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn fee_repair_recomputes_zero_fees() {
        let pool = init_with_url("sqlite::memory:").await.unwrap();

        sqlx::query(
            "INSERT INTO subscriptions (user_id, name, frequency, plan_fee, pickup_time, payment_method) \
             VALUES (1, 'Plan almuerzo', 'WEEKLY', 0, '12:00', 'card')",
        )
        .execute(&pool)
        .await
        .unwrap();

        execute_sql(&pool, include_str!("../../migrations/002_fee_repair.sql"))
            .await
            .unwrap();

        let fee: (i64,) =
            sqlx::query_as("SELECT plan_fee FROM subscriptions WHERE name = 'Plan almuerzo'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(fee.0, 12000);
    }
}

//! Demo-data seeders.
//!
//! Seeds run on every startup but are count-guarded, so an existing
//! database is never touched.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

use crate::auth::hash_password;

pub async fn seed_if_empty(pool: &SqlitePool) -> Result<()> {
    seed_catalog(pool).await?;
    seed_users(pool).await?;
    Ok(())
}

async fn seed_catalog(pool: &SqlitePool) -> Result<()> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM restaurants")
        .fetch_one(pool)
        .await?;
    if count.0 > 0 {
        return Ok(());
    }

    info!("Seeding demo restaurants and menu...");

    sqlx::query("INSERT INTO restaurants (name, location) VALUES (?, ?)")
        .bind("La Plaza EAFIT")
        .bind("Bloque 18")
        .execute(pool)
        .await?;
    sqlx::query("INSERT INTO restaurants (name, location) VALUES (?, ?)")
        .bind("Bowl Express")
        .bind("Bloque 20")
        .execute(pool)
        .await?;

    let dishes: &[(i64, &str, &str, i64, i64, &str)] = &[
        (
            1,
            "Menú del día: Pollo al horno",
            "Incluye arroz integral y ensalada",
            15500,
            640,
            "Pollo, arroz integral, ensalada",
        ),
        (
            2,
            "Bowl veggie rápido",
            "Garbanzos, quinoa y verduras",
            13900,
            520,
            "Garbanzos, quinoa, verduras",
        ),
    ];
    for (restaurant_id, title, description, price, calories, ingredients) in dishes {
        sqlx::query(
            "INSERT INTO dishes (restaurant_id, title, description, price, calories, ingredients, photo, sold_out) \
             VALUES (?, ?, ?, ?, ?, ?, '', 0)",
        )
        .bind(restaurant_id)
        .bind(title)
        .bind(description)
        .bind(price)
        .bind(calories)
        .bind(ingredients)
        .execute(pool)
        .await?;
    }

    // The demo craving gets a backing dish like any other craving.
    let backing = sqlx::query(
        "INSERT INTO dishes (restaurant_id, title, description, price, calories, ingredients, photo, sold_out) \
         VALUES (1, 'Empanadas de queso', 'Pa''comer algo rápido entre clases', 6000, 320, 'Masa de maíz, queso', '', 0)",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "INSERT INTO cravings (restaurant_id, dish_id, title, description, price, calories, ingredients, photo, sold_out) \
         VALUES (1, ?, 'Empanadas de queso', 'Pa''comer algo rápido entre clases', 6000, 320, 'Masa de maíz, queso', '', 0)",
    )
    .bind(backing.last_insert_rowid())
    .execute(pool)
    .await?;

    sqlx::query("INSERT INTO reviews (dish_id, author, rating, comment) VALUES (1, ?, 5, ?)")
        .bind("Juliana")
        .bind("Llegó rápido y estaba bien servido.")
        .execute(pool)
        .await?;

    Ok(())
}

async fn seed_users(pool: &SqlitePool) -> Result<()> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    if count.0 > 0 {
        return Ok(());
    }

    info!("Seeding demo users...");

    let users: &[(&str, &str, &str, &str, Option<i64>, Option<&str>, i64)] = &[
        (
            "admin@foodlab.eafit",
            "admin123",
            "Admin FoodLab",
            "admin",
            None,
            None,
            0,
        ),
        (
            "plaza@foodlab.eafit",
            "rest123",
            "Operador La Plaza",
            "restaurant",
            Some(1),
            None,
            0,
        ),
        (
            "juliana@eafit.edu.co",
            "student123",
            "Juliana",
            "student",
            None,
            Some("EAFIT-2026-001"),
            10,
        ),
    ];

    for (email, password, display_name, role, restaurant_id, carnet_code, promo_percent) in users {
        sqlx::query(
            "INSERT INTO users (email, password, display_name, role, restaurant_id, carnet_code, promo_percent) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(email)
        .bind(hash_password(password)?)
        .bind(display_name)
        .bind(role)
        .bind(restaurant_id)
        .bind(carnet_code)
        .bind(promo_percent)
        .execute(pool)
        .await?;
    }

    Ok(())
}

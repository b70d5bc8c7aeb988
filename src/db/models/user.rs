//! User, login, and password-reset models.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const RESTAURANT: &str = "restaurant";
    pub const STUDENT: &str = "student";
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub role: String,
    pub restaurant_id: Option<i64>,
    pub carnet_code: Option<String>,
    pub promo_percent: i64,
    pub created_at: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == roles::ADMIN
    }

    pub fn is_restaurant(&self) -> bool {
        self.role == roles::RESTAURANT
    }

    /// Restaurant scope for role-filtered reads: operators see only their
    /// own restaurant, everyone else sees everything.
    pub fn restaurant_scope(&self) -> Option<i64> {
        if self.is_restaurant() {
            self.restaurant_id
        } else {
            None
        }
    }

    /// Whether this user may create or mutate resources of the given
    /// restaurant. Admins always may; operators only within their own.
    pub fn can_manage_restaurant(&self, restaurant_id: i64) -> bool {
        if self.is_admin() {
            return true;
        }
        self.is_restaurant() && self.restaurant_id == Some(restaurant_id)
    }
}

/// Public view of a user; never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub restaurant_id: Option<i64>,
    pub carnet_code: Option<String>,
    pub promo_percent: i64,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            role: user.role,
            restaurant_id: user.restaurant_id,
            carnet_code: user.carnet_code,
            promo_percent: user.promo_percent,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Clone, FromRow)]
pub struct PasswordResetToken {
    pub id: i64,
    pub user_id: i64,
    pub reset_code: String,
    pub expires_at: i64,
    pub used: bool,
}

pub async fn find_user_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_user_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn update_user_password(
    pool: &SqlitePool,
    user_id: i64,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET password = ? WHERE id = ?")
        .bind(password_hash)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// At most one live reset code per user: issuing a new one marks any prior
/// unused codes as used.
pub async fn invalidate_unused_reset_codes(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE password_reset_tokens SET used = 1 WHERE user_id = ? AND used = 0")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn insert_reset_code(
    pool: &SqlitePool,
    user_id: i64,
    code: &str,
    expires_at: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO password_reset_tokens (user_id, reset_code, expires_at, used) \
         VALUES (?, ?, ?, 0)",
    )
    .bind(user_id)
    .bind(code)
    .bind(expires_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_latest_reset_code(
    pool: &SqlitePool,
    user_id: i64,
    code: &str,
) -> Result<Option<PasswordResetToken>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, user_id, reset_code, expires_at, used \
         FROM password_reset_tokens \
         WHERE user_id = ? AND reset_code = ? \
         ORDER BY id DESC LIMIT 1",
    )
    .bind(user_id)
    .bind(code)
    .fetch_optional(pool)
    .await
}

pub async fn mark_reset_code_used(pool: &SqlitePool, token_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE password_reset_tokens SET used = 1 WHERE id = ?")
        .bind(token_id)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with(role: &str, restaurant_id: Option<i64>) -> User {
        User {
            id: 1,
            email: "x@example.com".to_string(),
            password: String::new(),
            display_name: "X".to_string(),
            role: role.to_string(),
            restaurant_id,
            carnet_code: None,
            promo_percent: 0,
            created_at: String::new(),
        }
    }

    #[test]
    fn admin_manages_any_restaurant() {
        let admin = user_with(roles::ADMIN, None);
        assert!(admin.can_manage_restaurant(1));
        assert!(admin.can_manage_restaurant(99));
        assert_eq!(admin.restaurant_scope(), None);
    }

    #[test]
    fn operator_is_limited_to_own_restaurant() {
        let operator = user_with(roles::RESTAURANT, Some(2));
        assert!(operator.can_manage_restaurant(2));
        assert!(!operator.can_manage_restaurant(3));
        assert_eq!(operator.restaurant_scope(), Some(2));
    }

    #[test]
    fn student_manages_nothing() {
        let student = user_with(roles::STUDENT, None);
        assert!(!student.can_manage_restaurant(1));
        assert_eq!(student.restaurant_scope(), None);
    }

    #[test]
    fn user_response_drops_password() {
        let mut user = user_with(roles::STUDENT, None);
        user.password = "$2b$12$secret".to_string();
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["displayName"], "X");
    }
}

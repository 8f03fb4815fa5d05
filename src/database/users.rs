use sqlx::{FromRow, PgPool};

use crate::auth;
use crate::database::models::User;
use crate::error::ApiError;

/// User directory over an injected pool.
#[derive(Clone)]
pub struct UserStore {
    pool: PgPool,
}

/// Row fetched for authentication only; the hash stays inside this module.
#[derive(FromRow)]
struct CredentialRow {
    id: i32,
    username: String,
    password: String,
    first_name: String,
    last_name: String,
}

impl UserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Public record by id.
    ///
    /// Fails with `NotFound` if the user does not exist.
    pub async fn get(&self, user_id: i32) -> Result<User, ApiError> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, first_name, last_name
               FROM users
              WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No user: id#{}", user_id)))
    }

    /// Authenticate with username and password.
    ///
    /// Fails with `Unauthorized` if the user is not found or the password
    /// does not match; the two cases are indistinguishable to the caller.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, ApiError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            "SELECT id, username, password, first_name, last_name
               FROM users
              WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            if auth::verify_password(password, &row.password) {
                return Ok(User {
                    id: row.id,
                    username: row.username,
                    first_name: row.first_name,
                    last_name: row.last_name,
                });
            }
        }

        Err(ApiError::unauthorized("Invalid username/password"))
    }

    /// Register a new account and return the public record.
    ///
    /// Fails with `BadRequest` on a duplicate username. The pre-check and the
    /// insert share a transaction, and a concurrent insert slipping between
    /// them lands on the UNIQUE constraint, which maps to the same error.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<User, ApiError> {
        let hashed = auth::hash_password(password)?;

        let mut tx = self.pool.begin().await?;

        let duplicate =
            sqlx::query_scalar::<_, String>("SELECT username FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(&mut *tx)
                .await?;

        if duplicate.is_some() {
            return Err(ApiError::bad_request(format!(
                "Duplicate username: {}",
                username
            )));
        }

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password, first_name, last_name)
             VALUES ($1, $2, $3, $4)
             RETURNING id, username, first_name, last_name",
        )
        .bind(username)
        .bind(&hashed)
        .bind(first_name)
        .bind(last_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return ApiError::bad_request(format!("Duplicate username: {}", username));
                }
            }
            ApiError::from(e)
        })?;

        tx.commit().await?;
        Ok(user)
    }

    /// Every tea id the user has saved to either list. This is the ownership
    /// set the guard checks, recomputed per request.
    pub async fn saved_tea_ids(&self, user_id: i32) -> Result<Vec<i32>, ApiError> {
        let ids = sqlx::query_scalar::<_, i32>("SELECT tea_id FROM saved_teas WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }
}

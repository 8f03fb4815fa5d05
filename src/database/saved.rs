use sqlx::PgPool;

use crate::database::models::SavedTea;
use crate::error::ApiError;

const SAVED_TEA_COLUMNS: &str = "id, user_id, tea_id, is_my_tea, is_on_wish_list";

/// A saved tea sits on exactly one list; an equal flag pair can never
/// describe a valid relationship.
pub fn check_list_flags(is_my_tea: bool, is_on_wish_list: bool) -> Result<(), ApiError> {
    if is_my_tea == is_on_wish_list {
        return Err(ApiError::bad_request("Cannot save this tea!"));
    }
    Ok(())
}

/// Saved-tea relationship store. All operations are keyed by the composite
/// (user_id, tea_id): several users saving the same tea never interfere.
#[derive(Clone)]
pub struct SavedTeaStore {
    pool: PgPool,
}

impl SavedTeaStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a relationship between a user and a tea.
    ///
    /// Fails with `NotFound` if either side does not exist and `BadRequest`
    /// if the flag pair is equal. The existence checks and the insert run in
    /// one transaction.
    pub async fn add(
        &self,
        user_id: i32,
        tea_id: i32,
        is_my_tea: bool,
        is_on_wish_list: bool,
    ) -> Result<SavedTea, ApiError> {
        let mut tx = self.pool.begin().await?;

        let tea = sqlx::query_scalar::<_, i32>("SELECT id FROM teas WHERE id = $1")
            .bind(tea_id)
            .fetch_optional(&mut *tx)
            .await?;
        if tea.is_none() {
            return Err(ApiError::not_found(format!("No tea: {}", tea_id)));
        }

        let user = sqlx::query_scalar::<_, i32>("SELECT id FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
        if user.is_none() {
            return Err(ApiError::not_found(format!("No user id: {}", user_id)));
        }

        check_list_flags(is_my_tea, is_on_wish_list)?;

        let saved = sqlx::query_as::<_, SavedTea>(&format!(
            "INSERT INTO saved_teas (user_id, tea_id, is_my_tea, is_on_wish_list)
             VALUES ($1, $2, $3, $4)
             RETURNING {SAVED_TEA_COLUMNS}"
        ))
        .bind(user_id)
        .bind(tea_id)
        .bind(is_my_tea)
        .bind(is_on_wish_list)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(saved)
    }

    /// Delete the relationship between a user and a tea.
    ///
    /// Fails with `NotFound` if the user never saved that tea.
    pub async fn remove(&self, user_id: i32, tea_id: i32) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM saved_teas WHERE user_id = $1 AND tea_id = $2")
            .bind(user_id)
            .bind(tea_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found(format!(
                "No saved tea with tea id#: {}",
                tea_id
            )));
        }
        Ok(())
    }

    /// Move the relationship onto the "My Teas" list. Idempotent: repeated
    /// calls converge to the same state.
    pub async fn move_to_my_teas(&self, user_id: i32, tea_id: i32) -> Result<SavedTea, ApiError> {
        self.set_list(user_id, tea_id, true, false).await
    }

    /// Move the relationship onto the wish list. Idempotent.
    pub async fn move_to_wish_list(&self, user_id: i32, tea_id: i32) -> Result<SavedTea, ApiError> {
        self.set_list(user_id, tea_id, false, true).await
    }

    async fn set_list(
        &self,
        user_id: i32,
        tea_id: i32,
        is_my_tea: bool,
        is_on_wish_list: bool,
    ) -> Result<SavedTea, ApiError> {
        sqlx::query_as::<_, SavedTea>(&format!(
            "UPDATE saved_teas
                SET is_my_tea = $3, is_on_wish_list = $4
              WHERE user_id = $1 AND tea_id = $2
             RETURNING {SAVED_TEA_COLUMNS}"
        ))
        .bind(user_id)
        .bind(tea_id)
        .bind(is_my_tea)
        .bind(is_on_wish_list)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No saved tea with tea id#: {}", tea_id)))
    }
}

use serde::Deserialize;
use sqlx::PgPool;

use crate::database::models::{NewTea, Tea};
use crate::database::saved::check_list_flags;
use crate::error::ApiError;

const TEA_COLUMNS: &str = "id, title, brand, description, category, review, \
                           country_of_origin, organic, img_url, brew_time, brew_temp";

/// Partial update: only supplied fields are written.
#[derive(Debug, Default, Deserialize)]
pub struct TeaUpdate {
    pub title: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub review: Option<String>,
    pub country_of_origin: Option<String>,
    pub organic: Option<bool>,
    pub img_url: Option<String>,
    pub brew_time: Option<i32>,
    pub brew_temp: Option<i32>,
}

impl TeaUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.brand.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.review.is_none()
            && self.country_of_origin.is_none()
            && self.organic.is_none()
            && self.img_url.is_none()
            && self.brew_time.is_none()
            && self.brew_temp.is_none()
    }
}

/// Tea catalog over an injected pool.
#[derive(Clone)]
pub struct TeaStore {
    pool: PgPool,
}

impl TeaStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fails with `NotFound` if the tea does not exist.
    pub async fn get(&self, tea_id: i32) -> Result<Tea, ApiError> {
        sqlx::query_as::<_, Tea>(&format!("SELECT {TEA_COLUMNS} FROM teas WHERE id = $1"))
            .bind(tea_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("No tea: {}", tea_id)))
    }

    /// Insert a tea and return the stored row including its generated id.
    pub async fn create(&self, tea: NewTea) -> Result<Tea, ApiError> {
        let tea = sqlx::query_as::<_, Tea>(&format!(
            "INSERT INTO teas
                 (title, brand, description, category, review,
                  country_of_origin, organic, img_url, brew_time, brew_temp)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {TEA_COLUMNS}"
        ))
        .bind(tea.title)
        .bind(tea.brand)
        .bind(tea.description)
        .bind(tea.category)
        .bind(tea.review)
        .bind(tea.country_of_origin)
        .bind(tea.organic)
        .bind(tea.img_url)
        .bind(tea.brew_time)
        .bind(tea.brew_temp)
        .fetch_one(&self.pool)
        .await?;
        Ok(tea)
    }

    /// Apply only the supplied fields.
    ///
    /// Fails with `BadRequest` when no fields are supplied and `NotFound`
    /// when the tea does not exist.
    pub async fn update(&self, tea_id: i32, update: TeaUpdate) -> Result<Tea, ApiError> {
        if update.is_empty() {
            return Err(ApiError::bad_request("No data to update"));
        }

        let mut qb = sqlx::QueryBuilder::<sqlx::Postgres>::new("UPDATE teas SET ");
        {
            let mut sets = qb.separated(", ");
            if let Some(title) = update.title {
                sets.push("title = ").push_bind_unseparated(title);
            }
            if let Some(brand) = update.brand {
                sets.push("brand = ").push_bind_unseparated(brand);
            }
            if let Some(description) = update.description {
                sets.push("description = ").push_bind_unseparated(description);
            }
            if let Some(category) = update.category {
                sets.push("category = ").push_bind_unseparated(category);
            }
            if let Some(review) = update.review {
                sets.push("review = ").push_bind_unseparated(review);
            }
            if let Some(country_of_origin) = update.country_of_origin {
                sets.push("country_of_origin = ")
                    .push_bind_unseparated(country_of_origin);
            }
            if let Some(organic) = update.organic {
                sets.push("organic = ").push_bind_unseparated(organic);
            }
            if let Some(img_url) = update.img_url {
                sets.push("img_url = ").push_bind_unseparated(img_url);
            }
            if let Some(brew_time) = update.brew_time {
                sets.push("brew_time = ").push_bind_unseparated(brew_time);
            }
            if let Some(brew_temp) = update.brew_temp {
                sets.push("brew_temp = ").push_bind_unseparated(brew_temp);
            }
        }
        qb.push(" WHERE id = ");
        qb.push_bind(tea_id);
        qb.push(format!(" RETURNING {TEA_COLUMNS}"));

        qb.build_query_as::<Tea>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("No tea: {}", tea_id)))
    }

    /// Fails with `NotFound` if the tea does not exist.
    pub async fn remove(&self, tea_id: i32) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM teas WHERE id = $1")
            .bind(tea_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found(format!("No tea: {}", tea_id)));
        }
        Ok(())
    }

    /// All teas on one of a user's lists, selected by the flag pair.
    ///
    /// Fails with `BadRequest` when the two flags are equal.
    pub async fn find_all(
        &self,
        user_id: i32,
        is_my_tea: bool,
        is_on_wish_list: bool,
    ) -> Result<Vec<Tea>, ApiError> {
        check_list_flags(is_my_tea, is_on_wish_list)?;

        let teas = sqlx::query_as::<_, Tea>(
            "SELECT t.id, t.title, t.brand, t.description, t.category, t.review,
                    t.country_of_origin, t.organic, t.img_url, t.brew_time, t.brew_temp
               FROM teas t
               JOIN saved_teas s ON s.tea_id = t.id
              WHERE s.user_id = $1 AND s.is_my_tea = $2 AND s.is_on_wish_list = $3
              ORDER BY t.id",
        )
        .bind(user_id)
        .bind(is_my_tea)
        .bind(is_on_wish_list)
        .fetch_all(&self.pool)
        .await?;
        Ok(teas)
    }
}

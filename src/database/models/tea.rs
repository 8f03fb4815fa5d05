use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Catalog entry. Teas carry no ownership column; any logged-in user may
/// read or mutate any tea (shared-catalog semantics).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Tea {
    pub id: i32,
    pub title: String,
    pub brand: String,
    pub description: String,
    pub category: String,
    pub review: String,
    pub country_of_origin: String,
    pub organic: bool,
    pub img_url: String,
    pub brew_time: i32,
    pub brew_temp: i32,
}

/// Field set for catalog inserts.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTea {
    pub title: String,
    pub brand: String,
    pub description: String,
    pub category: String,
    pub review: String,
    pub country_of_origin: String,
    pub organic: bool,
    pub img_url: String,
    pub brew_time: i32,
    pub brew_temp: i32,
}

use serde::Serialize;
use sqlx::FromRow;

/// Public user record. The password hash never leaves the users store.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

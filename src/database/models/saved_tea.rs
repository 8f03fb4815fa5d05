use serde::Serialize;
use sqlx::FromRow;

/// Join record linking a user to a tea. Exactly one of the two flags is true
/// at any time; the stores and a CHECK constraint both enforce it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SavedTea {
    pub id: i32,
    pub user_id: i32,
    pub tea_id: i32,
    pub is_my_tea: bool,
    pub is_on_wish_list: bool,
}

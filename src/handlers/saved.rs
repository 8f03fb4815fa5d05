use axum::{
    extract::{Path, State},
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::extract::Json;
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddSavedTeaRequest {
    pub tea_id: i32,
    pub is_my_tea: bool,
    pub is_on_wish_list: bool,
}

/// POST /saved/teas/add - save a tea to one of the caller's lists.
///
/// The owning user always comes from the token, never from the body.
pub async fn add_post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<AddSavedTeaRequest>,
) -> Result<axum::Json<Value>, ApiError> {
    let saved = state
        .saved
        .add(
            auth_user.user_id,
            payload.tea_id,
            payload.is_my_tea,
            payload.is_on_wish_list,
        )
        .await?;

    let added_to = if saved.is_my_tea { "my_teas" } else { "wish_list" };
    Ok(axum::Json(
        json!({ "saved": saved.tea_id, "added_to": added_to }),
    ))
}

/// PATCH /saved/teas/to-my-teas/:tea_id - move a saved tea onto "My Teas"
pub async fn to_my_teas_patch(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(tea_id): Path<i32>,
) -> Result<axum::Json<Value>, ApiError> {
    let saved = state.saved.move_to_my_teas(auth_user.user_id, tea_id).await?;
    Ok(axum::Json(json!({ "saved_tea": saved })))
}

/// PATCH /saved/teas/to-wish-list/:tea_id - move a saved tea onto the wish list
pub async fn to_wish_list_patch(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(tea_id): Path<i32>,
) -> Result<axum::Json<Value>, ApiError> {
    let saved = state
        .saved
        .move_to_wish_list(auth_user.user_id, tea_id)
        .await?;
    Ok(axum::Json(json!({ "saved_tea": saved })))
}

/// DELETE /saved/teas/delete/:tea_id - remove a saved tea from the caller's lists
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(tea_id): Path<i32>,
) -> Result<axum::Json<Value>, ApiError> {
    state.saved.remove(auth_user.user_id, tea_id).await?;
    Ok(axum::Json(json!({ "deleted": tea_id })))
}

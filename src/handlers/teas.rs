use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::NewTea;
use crate::database::saved::check_list_flags;
use crate::database::teas::TeaUpdate;
use crate::error::ApiError;
use crate::extract::Json;
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NewTeaRequest {
    #[serde(flatten)]
    pub tea: NewTea,
    pub is_my_tea: bool,
    pub is_on_wish_list: bool,
}

/// GET /teas/my-teas - the caller's "My Teas" list
pub async fn my_teas_get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<axum::Json<Value>, ApiError> {
    let teas = state.teas.find_all(auth_user.user_id, true, false).await?;
    Ok(axum::Json(json!({ "teas": teas })))
}

/// GET /teas/wish-list - the caller's wish list
pub async fn wish_list_get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<axum::Json<Value>, ApiError> {
    let teas = state.teas.find_all(auth_user.user_id, false, true).await?;
    Ok(axum::Json(json!({ "teas": teas })))
}

/// GET /teas/:tea_id - fetch one tea
pub async fn tea_get(
    State(state): State<AppState>,
    Path(tea_id): Path<i32>,
) -> Result<axum::Json<Value>, ApiError> {
    let tea = state.teas.get(tea_id).await?;
    Ok(axum::Json(json!({ "tea": tea })))
}

/// POST /teas/new - create a tea and save it to one of the caller's lists
pub async fn tea_post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<NewTeaRequest>,
) -> Result<(StatusCode, axum::Json<Value>), ApiError> {
    // reject an invalid flag pair before the tea row exists
    check_list_flags(payload.is_my_tea, payload.is_on_wish_list)?;

    let tea = state.teas.create(payload.tea).await?;
    state
        .saved
        .add(
            auth_user.user_id,
            tea.id,
            payload.is_my_tea,
            payload.is_on_wish_list,
        )
        .await?;

    Ok((StatusCode::CREATED, axum::Json(json!({ "tea": tea }))))
}

/// PATCH /teas/:tea_id - partial update
pub async fn tea_patch(
    State(state): State<AppState>,
    Path(tea_id): Path<i32>,
    Json(update): Json<TeaUpdate>,
) -> Result<axum::Json<Value>, ApiError> {
    let tea = state.teas.update(tea_id, update).await?;
    Ok(axum::Json(json!({ "tea": tea })))
}

/// DELETE /teas/:tea_id - delete a catalog entry
pub async fn tea_delete(
    State(state): State<AppState>,
    Path(tea_id): Path<i32>,
) -> Result<axum::Json<Value>, ApiError> {
    state.teas.remove(tea_id).await?;
    Ok(axum::Json(json!({ "deleted": tea_id })))
}

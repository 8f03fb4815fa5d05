use axum::{extract::State, http::StatusCode, Extension};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::generate_token;
use crate::error::ApiError;
use crate::extract::Json;
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// POST /auth/token - authenticate and receive a bearer token
pub async fn token_post(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<axum::Json<Value>, ApiError> {
    let user = state
        .users
        .authenticate(&payload.username, &payload.password)
        .await?;
    let token = generate_token(user.id)?;
    Ok(axum::Json(json!({ "token": token })))
}

/// POST /auth/register - create an account and receive a bearer token
pub async fn register_post(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, axum::Json<Value>), ApiError> {
    let user = state
        .users
        .register(
            &payload.username,
            &payload.password,
            &payload.first_name,
            &payload.last_name,
        )
        .await?;
    let token = generate_token(user.id)?;
    Ok((StatusCode::CREATED, axum::Json(json!({ "token": token }))))
}

/// POST /auth - fetch the caller's profile
pub async fn profile_post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<axum::Json<Value>, ApiError> {
    let user = state.users.get(auth_user.user_id).await?;
    Ok(axum::Json(json!({ "user": user })))
}

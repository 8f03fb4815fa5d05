use anyhow::Context;
use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod auth;
mod config;
mod database;
mod error;
mod extract;
mod handlers;
mod middleware;
mod state;

use error::ApiError;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting TeaTime API in {:?} mode", config.environment);

    let pool = database::pool::connect(config)
        .await
        .context("database connection failed")?;
    database::pool::migrate(&pool)
        .await
        .context("migrations failed")?;

    let app = app(AppState::new(pool));

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("TeaTime API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // API routes
        .merge(auth_routes())
        .merge(teas_routes(state.clone()))
        .merge(saves_routes(state.clone()))
        // Unmatched routes get the error envelope, not axum's bare 404
        .fallback(not_found)
        // Global middleware; token verification never rejects by itself
        .layer(from_fn(middleware::authenticate_jwt))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/auth/token", post(auth::token_post))
        .route("/auth/register", post(auth::register_post))
        .route(
            "/auth",
            post(auth::profile_post).route_layer(from_fn(middleware::ensure_logged_in)),
        )
}

fn teas_routes(state: AppState) -> Router<AppState> {
    use handlers::teas;

    Router::new()
        .route(
            "/teas/my-teas",
            get(teas::my_teas_get).route_layer(from_fn(middleware::ensure_logged_in)),
        )
        .route(
            "/teas/wish-list",
            get(teas::wish_list_get).route_layer(from_fn(middleware::ensure_logged_in)),
        )
        .route(
            "/teas/new",
            post(teas::tea_post).route_layer(from_fn(middleware::ensure_logged_in)),
        )
        .route(
            "/teas/:tea_id",
            get(teas::tea_get)
                .patch(teas::tea_patch)
                .delete(teas::tea_delete)
                .route_layer(from_fn_with_state(state, middleware::ensure_tea_owner)),
        )
}

fn saves_routes(state: AppState) -> Router<AppState> {
    use handlers::saved;

    Router::new()
        .route(
            "/saved/teas/add",
            post(saved::add_post).route_layer(from_fn(middleware::ensure_logged_in)),
        )
        .route(
            "/saved/teas/to-my-teas/:tea_id",
            patch(saved::to_my_teas_patch)
                .route_layer(from_fn_with_state(state.clone(), middleware::ensure_tea_owner)),
        )
        .route(
            "/saved/teas/to-wish-list/:tea_id",
            patch(saved::to_wish_list_patch)
                .route_layer(from_fn_with_state(state.clone(), middleware::ensure_tea_owner)),
        )
        .route(
            "/saved/teas/delete/:tea_id",
            delete(saved::delete)
                .route_layer(from_fn_with_state(state, middleware::ensure_tea_owner)),
        )
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "TeaTime API",
        "version": version,
        "endpoints": {
            "auth": "/auth/token, /auth/register (public), /auth (logged in)",
            "teas": "/teas/my-teas, /teas/wish-list, /teas/new, /teas/:tea_id",
            "saved": "/saved/teas/add, /saved/teas/to-my-teas/:tea_id, /saved/teas/to-wish-list/:tea_id, /saved/teas/delete/:tea_id",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    match database::pool::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "ok" })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "degraded", "database_error": e.to_string() })),
        ),
    }
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not Found")
}

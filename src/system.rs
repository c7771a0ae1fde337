//! Liveness and diagnostic routes.

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use tracing::instrument;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/debug-token", get(debug_token))
        .route("/debug-db", get(debug_db))
}

async fn ping() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}

#[instrument]
async fn debug_token(AuthUser(identifier): AuthUser) -> Json<Value> {
    Json(json!({ "identifier": identifier }))
}

#[instrument(skip(state))]
async fn debug_db(
    State(state): State<AppState>,
    AuthUser(_identifier): AuthUser,
) -> Result<Json<Value>, ApiError> {
    let db = state
        .db
        .ensure_connected()
        .await
        .map_err(ApiError::Connection)?;
    let accounts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
        .fetch_one(db)
        .await?;
    let profiles: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
        .fetch_one(db)
        .await?;
    Ok(Json(json!({
        "connected": true,
        "accounts": accounts,
        "profiles": profiles,
    })))
}

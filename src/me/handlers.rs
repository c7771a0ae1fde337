use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use super::merge::MergedView;
use super::service;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me).put(put_me))
}

#[instrument(skip(state))]
async fn get_me(
    State(state): State<AppState>,
    AuthUser(identifier): AuthUser,
) -> Result<Json<MergedView>, ApiError> {
    let db = state
        .db
        .ensure_connected()
        .await
        .map_err(ApiError::Connection)?;
    let view = service::get_merged(db, &identifier).await?;
    Ok(Json(view))
}

#[instrument(skip(state, body))]
async fn put_me(
    State(state): State<AppState>,
    AuthUser(identifier): AuthUser,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<MergedView>, ApiError> {
    let db = state
        .db
        .ensure_connected()
        .await
        .map_err(ApiError::Connection)?;
    let view = service::update_merged(db, &identifier, &body).await?;
    Ok(Json(view))
}

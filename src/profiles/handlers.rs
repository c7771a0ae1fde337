use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;
use tracing::instrument;

use super::repo::{Profile, ProfilePatch};
use super::service;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Mutable profile fields. The owning key, record id and timestamps are
/// not part of this shape, so attempts to set them are dropped during
/// deserialization rather than rejected.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub bio: Option<String>,
    pub organization: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub timezone: Option<String>,
    pub preferences: Option<serde_json::Value>,
}

impl From<UpdateProfileRequest> for ProfilePatch {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            bio: req.bio,
            organization: req.organization,
            role: req.role,
            phone: req.phone,
            timezone: req.timezone,
            preferences: req.preferences,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(put_profile))
}

#[instrument(skip(state))]
async fn get_profile(
    State(state): State<AppState>,
    AuthUser(identifier): AuthUser,
) -> Result<Json<Profile>, ApiError> {
    let db = state
        .db
        .ensure_connected()
        .await
        .map_err(ApiError::Connection)?;
    let profile = service::get_or_create(db, &identifier).await?;
    Ok(Json(profile))
}

#[instrument(skip(state, req))]
async fn put_profile(
    State(state): State<AppState>,
    AuthUser(identifier): AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    let db = state
        .db
        .ensure_connected()
        .await
        .map_err(ApiError::Connection)?;
    let profile = service::update(db, &identifier, req.into()).await?;
    Ok(Json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn immutable_fields_are_dropped_from_update_bodies() {
        let req: UpdateProfileRequest = serde_json::from_value(json!({
            "account_email": "evil@x.com",
            "id": "0c6e8a3c-0000-0000-0000-000000000000",
            "created_at": "2020-01-01T00:00:00Z",
            "updated_at": "2020-01-01T00:00:00Z",
            "bio": "hello",
            "timezone": "UTC",
        }))
        .expect("unknown fields are ignored, not rejected");
        assert_eq!(req.bio.as_deref(), Some("hello"));
        assert_eq!(req.timezone.as_deref(), Some("UTC"));
    }

    #[test]
    fn absent_fields_stay_unset_in_the_patch() {
        let req: UpdateProfileRequest = serde_json::from_value(json!({ "bio": "hi" })).unwrap();
        let patch = ProfilePatch::from(req);
        assert_eq!(patch.bio.as_deref(), Some("hi"));
        assert!(patch.timezone.is_none());
        assert!(patch.preferences.is_none());
    }
}

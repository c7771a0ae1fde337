use sqlx::error::DatabaseError;
use sqlx::PgPool;
use tracing::debug;

use super::prefs;
use super::repo::{self, Profile, ProfilePatch};
use crate::error::ApiError;

/// Fetch the profile for `owner`, creating a defaults row on first access.
///
/// A create-create race is arbitrated by the unique index on the owning
/// key: the loser re-fetches the winner's row instead of failing.
pub async fn get_or_create(db: &PgPool, owner: &str) -> Result<Profile, ApiError> {
    if let Some(profile) = repo::find_by_owner(db, owner).await? {
        return Ok(profile);
    }
    match repo::insert_default(db, owner).await {
        Ok(profile) => {
            debug!(owner = %owner, "profile created");
            Ok(profile)
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            debug!(owner = %owner, "profile created concurrently, re-fetching");
            repo::find_by_owner(db, owner)
                .await?
                .ok_or(ApiError::ProfileNotFound)
        }
        Err(e) => Err(e.into()),
    }
}

/// Apply a partial update, provisioning the profile if it does not exist.
/// The preferences document is validated before anything is written.
pub async fn update(db: &PgPool, owner: &str, patch: ProfilePatch) -> Result<Profile, ApiError> {
    if let Some(preferences) = &patch.preferences {
        prefs::validate(preferences).map_err(ApiError::Validation)?;
    }
    Ok(repo::upsert(db, owner, &patch).await?)
}

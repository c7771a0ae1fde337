use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Supplementary settings record, at most one per identity key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub account_email: String, // owning identity key, unique
    pub bio: Option<String>,
    pub organization: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub timezone: String,
    pub preferences: serde_json::Value,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Partial profile update; `None` keeps the stored (or default) value.
#[derive(Debug, Default, Clone)]
pub struct ProfilePatch {
    pub bio: Option<String>,
    pub organization: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub timezone: Option<String>,
    pub preferences: Option<serde_json::Value>,
}

/// Find a profile by its owning identity key.
pub async fn find_by_owner(db: &PgPool, owner: &str) -> sqlx::Result<Option<Profile>> {
    sqlx::query_as::<_, Profile>(
        r#"
        SELECT id, account_email, bio, organization, role, phone,
               timezone, preferences, created_at, updated_at
        FROM profiles
        WHERE account_email = $1
        "#,
    )
    .bind(owner)
    .fetch_optional(db)
    .await
}

/// Insert a defaults-only row for `owner`. Fails with a unique violation
/// if a row for that key already exists.
pub async fn insert_default(db: &PgPool, owner: &str) -> sqlx::Result<Profile> {
    sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO profiles (account_email)
        VALUES ($1)
        RETURNING id, account_email, bio, organization, role, phone,
                  timezone, preferences, created_at, updated_at
        "#,
    )
    .bind(owner)
    .fetch_one(db)
    .await
}

/// Apply a partial update, creating the row with defaults for any field
/// the patch leaves unset.
pub async fn upsert(db: &PgPool, owner: &str, patch: &ProfilePatch) -> sqlx::Result<Profile> {
    sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO profiles (account_email, bio, organization, role, phone, timezone, preferences)
        VALUES ($1, $2, $3, $4, $5,
                COALESCE($6, 'Africa/Tunis'),
                COALESCE($7, '{}'::jsonb))
        ON CONFLICT (account_email) DO UPDATE SET
            bio = COALESCE($2, profiles.bio),
            organization = COALESCE($3, profiles.organization),
            role = COALESCE($4, profiles.role),
            phone = COALESCE($5, profiles.phone),
            timezone = COALESCE($6, profiles.timezone),
            preferences = COALESCE($7, profiles.preferences),
            updated_at = now()
        RETURNING id, account_email, bio, organization, role, phone,
                  timezone, preferences, created_at, updated_at
        "#,
    )
    .bind(owner)
    .bind(patch.bio.as_deref())
    .bind(patch.organization.as_deref())
    .bind(patch.role.as_deref())
    .bind(patch.phone.as_deref())
    .bind(patch.timezone.as_deref())
    .bind(patch.preferences.clone())
    .fetch_one(db)
    .await
}

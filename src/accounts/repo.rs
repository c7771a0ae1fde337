use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Identity record. Source of truth for identity fields in the merged view.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String, // unique identity key
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub image_url: Option<String>,
    pub organization: Option<String>,
    pub phone: Option<String>,
    pub role: String,
    pub profile_completed: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Partial account update; `None` keeps the stored value.
#[derive(Debug, Default, Clone)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub image_url: Option<String>,
    pub organization: Option<String>,
    pub phone: Option<String>,
}

impl AccountPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.avatar_url.is_none()
            && self.image_url.is_none()
            && self.organization.is_none()
            && self.phone.is_none()
    }
}

/// Find an account by its identity key.
pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<Account>> {
    sqlx::query_as::<_, Account>(
        r#"
        SELECT id, email, name, avatar_url, image_url, organization, phone,
               role, profile_completed, last_login_at, created_at, updated_at
        FROM accounts
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await
}

/// Find an account by its internal record id.
pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Account>> {
    sqlx::query_as::<_, Account>(
        r#"
        SELECT id, email, name, avatar_url, image_url, organization, phone,
               role, profile_completed, last_login_at, created_at, updated_at
        FROM accounts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

/// Apply a partial update to an existing account. Never creates one;
/// returns `None` if no account matches the identity key.
pub async fn update_by_email(
    db: &PgPool,
    email: &str,
    patch: &AccountPatch,
) -> sqlx::Result<Option<Account>> {
    sqlx::query_as::<_, Account>(
        r#"
        UPDATE accounts SET
            name = COALESCE($2, name),
            avatar_url = COALESCE($3, avatar_url),
            image_url = COALESCE($4, image_url),
            organization = COALESCE($5, organization),
            phone = COALESCE($6, phone),
            updated_at = now()
        WHERE email = $1
        RETURNING id, email, name, avatar_url, image_url, organization, phone,
                  role, profile_completed, last_login_at, created_at, updated_at
        "#,
    )
    .bind(email)
    .bind(patch.name.as_deref())
    .bind(patch.avatar_url.as_deref())
    .bind(patch.image_url.as_deref())
    .bind(patch.organization.as_deref())
    .bind(patch.phone.as_deref())
    .fetch_optional(db)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_patch_is_detected() {
        assert!(AccountPatch::default().is_empty());
        let patch = AccountPatch {
            organization: Some("Acme".into()),
            ..AccountPatch::default()
        };
        assert!(!patch.is_empty());
    }
}

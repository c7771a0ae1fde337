use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use super::merge::{merge_view, MergedView};
use crate::accounts::repo::{self as accounts, Account, AccountPatch};
use crate::error::ApiError;
use crate::profiles::repo::{self as profiles, ProfilePatch};
use crate::profiles::{prefs, service as profile_service};

fn is_email(value: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(value)
}

/// Resolve the account behind a token identifier: email-shaped identifiers
/// query the identity key, uuid-shaped ones the record id. Anything else
/// cannot match an account.
async fn resolve_account(db: &PgPool, identifier: &str) -> Result<Account, ApiError> {
    let account = if is_email(identifier) {
        accounts::find_by_email(db, identifier).await?
    } else if let Ok(id) = Uuid::parse_str(identifier) {
        accounts::find_by_id(db, id).await?
    } else {
        None
    };
    account.ok_or(ApiError::AccountNotFound)
}

/// Resolve the account, provision its profile if needed, and merge.
/// The profile is keyed by the account's canonical email, not by the raw
/// token identifier.
pub async fn get_merged(db: &PgPool, identifier: &str) -> Result<MergedView, ApiError> {
    let account = resolve_account(db, identifier).await?;
    let profile = profile_service::get_or_create(db, &account.email).await?;
    Ok(merge_view(&account, &profile))
}

/// Split an update body into the account-updatable and profile-updatable
/// subsets. Text fields are accepted only when textual; preferences only
/// when a structured object. Everything else is ignored.
fn partition_update(body: &Value) -> (AccountPatch, ProfilePatch) {
    let text = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_owned);
    let account = AccountPatch {
        name: text("name"),
        avatar_url: text("avatar"),
        image_url: text("image"),
        organization: text("organization"),
        phone: text("phone"),
    };
    let profile = ProfilePatch {
        timezone: text("timezone"),
        preferences: body.get("preferences").filter(|v| v.is_object()).cloned(),
        ..ProfilePatch::default()
    };
    (account, profile)
}

/// Apply a combined update: the account subset by identity key (the
/// account must already exist), the profile subset as an upsert under the
/// account's email. Responds with the merged view of the result.
pub async fn update_merged(
    db: &PgPool,
    identifier: &str,
    body: &Value,
) -> Result<MergedView, ApiError> {
    let account = resolve_account(db, identifier).await?;
    let (account_patch, profile_patch) = partition_update(body);
    if let Some(preferences) = &profile_patch.preferences {
        prefs::validate(preferences).map_err(ApiError::Validation)?;
    }
    let account = if account_patch.is_empty() {
        account
    } else {
        accounts::update_by_email(db, &account.email, &account_patch)
            .await?
            .ok_or(ApiError::AccountNotFound)?
    };
    let profile = profiles::upsert(db, &account.email, &profile_patch).await?;
    Ok(merge_view(&account, &profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn email_shapes_are_recognised() {
        assert!(is_email("a@x.com"));
        assert!(is_email("first.last@sub.domain.tn"));
        assert!(!is_email("u1"));
        assert!(!is_email("not an@email.com"));
        assert!(!is_email("9b2f4d1e-8c57-4a9d-b0d7-1f2e3a4b5c6d"));
    }

    #[test]
    fn textual_fields_are_partitioned_by_owner() {
        let body = json!({
            "name": "Ann",
            "avatar": "https://cdn/a.png",
            "image": "https://cdn/i.png",
            "organization": "Acme",
            "phone": "111",
            "timezone": "UTC",
            "preferences": { "language": "fr" },
        });
        let (account, profile) = partition_update(&body);
        assert_eq!(account.name.as_deref(), Some("Ann"));
        assert_eq!(account.avatar_url.as_deref(), Some("https://cdn/a.png"));
        assert_eq!(account.image_url.as_deref(), Some("https://cdn/i.png"));
        assert_eq!(account.organization.as_deref(), Some("Acme"));
        assert_eq!(account.phone.as_deref(), Some("111"));
        assert_eq!(profile.timezone.as_deref(), Some("UTC"));
        assert_eq!(profile.preferences, Some(json!({ "language": "fr" })));
    }

    #[test]
    fn non_textual_values_are_ignored() {
        let body = json!({
            "name": 42,
            "organization": { "nested": true },
            "timezone": ["UTC"],
        });
        let (account, profile) = partition_update(&body);
        assert!(account.is_empty());
        assert!(profile.timezone.is_none());
    }

    #[test]
    fn non_object_preferences_are_ignored() {
        let body = json!({ "preferences": "dark" });
        let (_, profile) = partition_update(&body);
        assert!(profile.preferences.is_none());
    }

    #[test]
    fn unrelated_fields_never_reach_either_patch() {
        let body = json!({ "email": "evil@x.com", "role": "admin", "bio": "hi" });
        let (account, profile) = partition_update(&body);
        assert!(account.is_empty());
        assert!(profile.timezone.is_none());
        assert!(profile.preferences.is_none());
        assert!(profile.bio.is_none());
    }
}

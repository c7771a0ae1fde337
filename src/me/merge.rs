//! Field-precedence merge of the account and profile records.

use serde::Serialize;
use serde_json::Value;

use crate::accounts::repo::Account;
use crate::profiles::prefs::DEFAULT_TIMEZONE;
use crate::profiles::repo::Profile;

/// Combined account + profile view returned by the /me routes. Every key
/// is always present; absent values become empty strings or `{}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedView {
    pub email: String,
    pub name: String,
    pub avatar: String,
    pub image: String,
    pub organization: String,
    pub phone: String,
    pub timezone: String,
    pub preferences: Value,
}

/// Precedence, per field:
///
/// | field              | order                        |
/// |--------------------|------------------------------|
/// | email              | account                      |
/// | name, avatar, image| account, else ""             |
/// | organization, phone| account, else profile, else ""|
/// | timezone           | profile, else default        |
/// | preferences        | profile, else {}             |
pub fn merge_view(account: &Account, profile: &Profile) -> MergedView {
    MergedView {
        email: account.email.clone(),
        name: account.name.clone().unwrap_or_default(),
        avatar: account.avatar_url.clone().unwrap_or_default(),
        image: account.image_url.clone().unwrap_or_default(),
        organization: account
            .organization
            .clone()
            .or_else(|| profile.organization.clone())
            .unwrap_or_default(),
        phone: account
            .phone
            .clone()
            .or_else(|| profile.phone.clone())
            .unwrap_or_default(),
        timezone: if profile.timezone.is_empty() {
            DEFAULT_TIMEZONE.to_string()
        } else {
            profile.timezone.clone()
        },
        preferences: if profile.preferences.is_object() {
            profile.preferences.clone()
        } else {
            Value::Object(Default::default())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn account(email: &str, name: Option<&str>) -> Account {
        Account {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.map(str::to_owned),
            avatar_url: None,
            image_url: None,
            organization: None,
            phone: None,
            role: "user".to_string(),
            profile_completed: false,
            last_login_at: None,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    fn fresh_profile(owner: &str) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            account_email: owner.to_string(),
            bio: None,
            organization: None,
            role: None,
            phone: None,
            timezone: DEFAULT_TIMEZONE.to_string(),
            preferences: json!({}),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn fresh_profile_yields_defaults_everywhere() {
        let account = account("a@x.com", Some("Ann"));
        let view = merge_view(&account, &fresh_profile("a@x.com"));
        assert_eq!(view.email, "a@x.com");
        assert_eq!(view.name, "Ann");
        assert_eq!(view.avatar, "");
        assert_eq!(view.image, "");
        assert_eq!(view.organization, "");
        assert_eq!(view.phone, "");
        assert_eq!(view.timezone, "Africa/Tunis");
        assert_eq!(view.preferences, json!({}));
    }

    #[test]
    fn account_wins_for_shared_fields() {
        let mut account = account("a@x.com", None);
        account.organization = Some("Acme".into());
        account.phone = Some("111".into());
        let mut profile = fresh_profile("a@x.com");
        profile.organization = Some("Other".into());
        profile.phone = Some("222".into());
        let view = merge_view(&account, &profile);
        assert_eq!(view.organization, "Acme");
        assert_eq!(view.phone, "111");
    }

    #[test]
    fn profile_fills_shared_fields_the_account_lacks() {
        let account = account("a@x.com", None);
        let mut profile = fresh_profile("a@x.com");
        profile.organization = Some("Acme".into());
        profile.phone = Some("333".into());
        let view = merge_view(&account, &profile);
        assert_eq!(view.organization, "Acme");
        assert_eq!(view.phone, "333");
    }

    #[test]
    fn timezone_and_preferences_come_from_the_profile_alone() {
        let account = account("a@x.com", None);
        let mut profile = fresh_profile("a@x.com");
        profile.timezone = "UTC".into();
        profile.preferences = json!({ "language": "fr" });
        let view = merge_view(&account, &profile);
        assert_eq!(view.timezone, "UTC");
        assert_eq!(view.preferences, json!({ "language": "fr" }));
    }

    #[test]
    fn degenerate_profile_values_fall_back_to_defaults() {
        let account = account("a@x.com", None);
        let mut profile = fresh_profile("a@x.com");
        profile.timezone = String::new();
        profile.preferences = serde_json::Value::Null;
        let view = merge_view(&account, &profile);
        assert_eq!(view.timezone, "Africa/Tunis");
        assert_eq!(view.preferences, json!({}));
    }
}

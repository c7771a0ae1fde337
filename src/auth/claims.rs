use serde::Deserialize;

/// Payload of a bearer token from the external identity provider.
///
/// Only the signature and expiry are enforced. Every identifier field is
/// optional because different issuer versions populate different ones.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "userId")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub sub: Option<String>,
    pub exp: usize, // expires at (unix timestamp)
}

impl TokenClaims {
    /// Resolve the user identifier: email, then id, then userId, then
    /// subject. First non-empty field wins.
    pub fn identifier(&self) -> Option<&str> {
        [&self.email, &self.id, &self.user_id, &self.sub]
            .into_iter()
            .find_map(|field| field.as_deref().filter(|v| !v.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(
        email: Option<&str>,
        id: Option<&str>,
        user_id: Option<&str>,
        sub: Option<&str>,
    ) -> TokenClaims {
        TokenClaims {
            email: email.map(str::to_owned),
            id: id.map(str::to_owned),
            user_id: user_id.map(str::to_owned),
            sub: sub.map(str::to_owned),
            exp: 0,
        }
    }

    #[test]
    fn email_wins_over_every_other_field() {
        let c = claims(Some("a@x.com"), Some("42"), Some("u42"), Some("s42"));
        assert_eq!(c.identifier(), Some("a@x.com"));
    }

    #[test]
    fn id_beats_user_id_and_subject() {
        let c = claims(None, Some("42"), Some("u42"), Some("s42"));
        assert_eq!(c.identifier(), Some("42"));
    }

    #[test]
    fn subject_is_the_last_resort() {
        let c = claims(None, None, None, Some("u1"));
        assert_eq!(c.identifier(), Some("u1"));
    }

    #[test]
    fn empty_fields_are_skipped() {
        let c = claims(Some(""), None, Some("u2"), Some("s2"));
        assert_eq!(c.identifier(), Some("u2"));
    }

    #[test]
    fn payload_without_identifier_resolves_to_none() {
        assert!(claims(None, None, None, None).identifier().is_none());
    }
}

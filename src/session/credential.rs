// src/session/credential.rs
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{DecodingKey, Validation};
use serde::Deserialize;
use std::fmt;

use crate::types::response::TokenPair;

/// Bearer token pair. Debug output never shows the tokens.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    access: String,
    refresh: String,
}

#[derive(Deserialize)]
struct ExpiryClaims {
    exp: Option<i64>,
}

impl Credential {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }

    pub fn access(&self) -> &str {
        &self.access
    }

    pub fn refresh(&self) -> &str {
        &self.refresh
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access)
    }

    /// `exp` of the access token when it is a JWT. The signature is not
    /// checked: the server is the verifier, this only avoids sending a token
    /// that is already known to be dead.
    pub fn access_expiry(&self) -> Option<DateTime<Utc>> {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<ExpiryClaims>(
            &self.access,
            &DecodingKey::from_secret(&[]),
            &validation,
        )
        .ok()?;

        data.claims
            .exp
            .and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }

    /// Opaque tokens never expire client-side
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.access_expiry().is_some_and(|exp| exp <= now)
    }
}

impl From<TokenPair> for Credential {
    fn from(pair: TokenPair) -> Self {
        Self::new(pair.access, pair.refresh)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
pub(crate) fn jwt_expiring_at(exp: i64) -> String {
    use jsonwebtoken::{EncodingKey, Header};

    #[derive(serde::Serialize)]
    struct Claims {
        exp: i64,
        user_id: u64,
    }

    jsonwebtoken::encode(
        &Header::default(),
        &Claims { exp, user_id: 1 },
        &EncodingKey::from_secret(b"server-secret"),
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_debug_redacts_tokens() {
        let credential = Credential::new("secret-access", "secret-refresh");
        let printed = format!("{:?}", credential);
        assert!(!printed.contains("secret"));
    }

    #[test]
    fn test_jwt_expiry() {
        let now = Utc::now();
        let expired = Credential::new(jwt_expiring_at((now - Duration::minutes(5)).timestamp()), "r");
        let valid = Credential::new(jwt_expiring_at((now + Duration::minutes(5)).timestamp()), "r");

        assert!(expired.is_expired_at(now));
        assert!(!valid.is_expired_at(now));
        assert!(valid.access_expiry().is_some());
    }

    #[test]
    fn test_opaque_token_never_expires() {
        let credential = Credential::new("opaque-token", "r");
        assert_eq!(credential.access_expiry(), None);
        assert!(!credential.is_expired_at(Utc::now()));
    }

    #[test]
    fn test_bearer_header() {
        assert_eq!(Credential::new("abc", "def").bearer(), "Bearer abc");
    }
}

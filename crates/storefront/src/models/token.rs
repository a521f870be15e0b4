//! Session token with client-side expiry inspection.
//!
//! The backend issues a JWT at login. The gateway never verifies the
//! signature - that is the backend's job on every authenticated call - but
//! it does decode the payload segment to read the expiry, so a stale token
//! can be discarded locally instead of producing a string of 401s.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeZone, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::warn;

/// Claims read from the token payload. Everything is optional; tokens
/// without an expiry are treated as non-expiring.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenClaims {
    /// Expiry as seconds since the Unix epoch.
    pub exp: Option<i64>,
    /// Backend user id, when the backend includes one.
    pub id: Option<String>,
    /// Standard subject claim, used as a fallback user id.
    pub sub: Option<String>,
}

/// A bearer token held for the logged-in user.
#[derive(Debug, Clone)]
pub struct SessionToken {
    raw: SecretString,
    claims: TokenClaims,
}

impl SessionToken {
    /// Wrap a raw token string, decoding whatever claims can be read.
    ///
    /// A token that does not decode as a JWT is still held - the backend
    /// decides whether it is acceptable - but yields empty claims.
    #[must_use]
    pub fn new(raw: String) -> Self {
        let claims = decode_claims(&raw).unwrap_or_else(|| {
            warn!("Invalid token payload, treating claims as empty");
            TokenClaims::default()
        });

        Self {
            raw: SecretString::from(raw),
            claims,
        }
    }

    /// The raw bearer token for the Authorization header.
    #[must_use]
    pub const fn secret(&self) -> &SecretString {
        &self.raw
    }

    /// The decoded claims.
    #[must_use]
    pub const fn claims(&self) -> &TokenClaims {
        &self.claims
    }

    /// The user id carried by the token, when present.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.claims
            .id
            .as_deref()
            .or(self.claims.sub.as_deref())
    }

    /// When the token expires, if it carries an expiry at all.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.claims
            .exp
            .and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }

    /// Whether the token has expired as of `now`.
    ///
    /// A token without an expiry claim never expires locally; that case is
    /// logged once here so the operator can see it.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Some(expires_at) => expires_at < now,
            None => {
                warn!("Token does not have an expiration time");
                false
            }
        }
    }

    /// The raw token string, for persistence.
    #[must_use]
    pub fn raw(&self) -> &str {
        self.raw.expose_secret()
    }
}

/// Decode the claims from a JWT's payload segment without verification.
fn decode_claims(raw: &str) -> Option<TokenClaims> {
    // A JWT has exactly three dot-separated segments
    let segments: Vec<&str> = raw.split('.').collect();
    let [_header, payload, _signature] = segments.as_slice() else {
        return None;
    };

    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;

    /// Build an unsigned JWT with the given payload JSON.
    fn fake_jwt(payload: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload);
        format!("{header}.{body}.signature")
    }

    #[test]
    fn test_expired_token() {
        let past = (Utc::now() - Duration::hours(2)).timestamp();
        let token = SessionToken::new(fake_jwt(&format!(r#"{{"exp": {past}}}"#)));
        assert!(token.is_expired(Utc::now()));
    }

    #[test]
    fn test_live_token() {
        let future = (Utc::now() + Duration::hours(2)).timestamp();
        let token = SessionToken::new(fake_jwt(&format!(r#"{{"exp": {future}}}"#)));
        assert!(!token.is_expired(Utc::now()));
    }

    #[test]
    fn test_token_without_expiry_never_expires() {
        let token = SessionToken::new(fake_jwt(r#"{"id": "user-1"}"#));
        assert!(!token.is_expired(Utc::now()));
        assert!(token.expires_at().is_none());
    }

    #[test]
    fn test_user_id_prefers_id_over_sub() {
        let token = SessionToken::new(fake_jwt(r#"{"id": "user-1", "sub": "other"}"#));
        assert_eq!(token.user_id(), Some("user-1"));

        let token = SessionToken::new(fake_jwt(r#"{"sub": "subject-9"}"#));
        assert_eq!(token.user_id(), Some("subject-9"));
    }

    #[test]
    fn test_malformed_token_yields_empty_claims() {
        let token = SessionToken::new("not-a-jwt".to_string());
        assert!(token.claims().exp.is_none());
        assert!(!token.is_expired(Utc::now()));
        assert_eq!(token.raw(), "not-a-jwt");
    }

    #[test]
    fn test_garbage_payload_yields_empty_claims() {
        let token = SessionToken::new("aaa.!!!not-base64!!!.ccc".to_string());
        assert!(token.claims().exp.is_none());
    }
}

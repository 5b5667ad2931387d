//! Token Service
//! Mission: Issue and verify stateless bearer tokens

use crate::auth::models::Claims;
use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

/// Issues and verifies HS256 JWTs bound to a username claim.
///
/// Tokens are stateless: no session record is kept, and there is no
/// revocation. Once issued, a token stays valid until its expiry.
pub struct TokenService {
    secret: String,
    ttl_minutes: i64,
}

impl TokenService {
    pub fn new(secret: String, ttl_minutes: i64) -> Self {
        Self {
            secret,
            ttl_minutes,
        }
    }

    /// Issue a token with claims `sub = username` and `exp = now + TTL`.
    pub fn issue(&self, username: &str) -> Result<String> {
        self.issue_with_ttl(username, self.ttl_minutes)
    }

    /// Issue a token with an explicit TTL in minutes.
    pub fn issue_with_ttl(&self, username: &str, ttl_minutes: i64) -> Result<String> {
        let expiration = Utc::now()
            .checked_add_signed(chrono::Duration::minutes(ttl_minutes))
            .context("Invalid timestamp")?
            .timestamp() as usize;

        let claims = Claims {
            sub: username.to_string(),
            exp: expiration,
        };

        debug!(
            "Issuing token for {}, expires in {}m",
            username, ttl_minutes
        );

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to issue token")
    }

    /// Verify signature and expiry, returning the embedded claims.
    ///
    /// Does not consult the credential store: a token stays valid for its
    /// full lifetime even if the account disappears in the meantime.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .context("Invalid or expired token")?;

        debug!("Verified token for {}", decoded.claims.sub);

        Ok(decoded.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let service = TokenService::new("test-secret-key-12345".to_string(), 30);

        let token = service.issue("researcher").unwrap();
        assert!(!token.is_empty());

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, "researcher");
        assert!(claims.exp > Utc::now().timestamp() as usize);
    }

    #[test]
    fn test_malformed_token_rejected() {
        let service = TokenService::new("test-secret-key-12345".to_string(), 30);

        assert!(service.verify("not.a.token").is_err());
        assert!(service.verify("").is_err());
    }

    #[test]
    fn test_different_secrets_reject() {
        let issuer = TokenService::new("secret-one".to_string(), 30);
        let verifier = TokenService::new("secret-two".to_string(), 30);

        let token = issuer.issue("researcher").unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = TokenService::new("test-secret-key-12345".to_string(), 30);

        // Expiry far enough in the past to clear the default leeway.
        let token = service.issue_with_ttl("researcher", -5).unwrap();
        assert!(service.verify(&token).is_err());
    }
}

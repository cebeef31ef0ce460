/// Stateless session tokens
///
/// Tokens are self-contained HS256 JWTs; there is no server-side session
/// table and no revocation list. The signing secret is injected at
/// construction and immutable for the life of the process. A compromised
/// secret invalidates every outstanding token, and the only recovery is
/// rotating the secret, which signs everyone out. That is a key-management
/// requirement, not a supported flow.
use crate::config::IdentityConfig;
use crate::models::{Identity, Role};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Claims carried by a session token.
///
/// A copy of the account's public fields; secret material cannot appear
/// here because claims are built from an `Identity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (account ID)
    pub sub: String,

    /// Account login
    pub login: String,

    /// Account role at issuance time
    pub role: Role,

    /// JWT ID (unique token identifier)
    pub jti: String,

    /// Issued at (seconds since epoch)
    pub iat: i64,

    /// Expiration (seconds since epoch)
    pub exp: i64,

    /// Issuer
    pub iss: String,
}

impl TokenClaims {
    fn new(identity: &Identity, issuer: &str, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: identity.id.to_string(),
            login: identity.login.clone(),
            role: identity.role,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            iss: issuer.to_string(),
        }
    }

    /// Account ID carried in `sub`
    pub fn account_id(&self) -> Result<i64, TokenError> {
        self.sub.parse().map_err(|_| TokenError::Malformed)
    }

    pub fn is_expired(&self) -> bool {
        self.exp <= Utc::now().timestamp()
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("token signature invalid")]
    InvalidSignature,

    #[error("token malformed")]
    Malformed,

    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Issues and verifies signed, expiring session tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], issuer: impl Into<String>, ttl_seconds: i64) -> Self {
        let issuer = issuer.into();
        let mut validation = Validation::new(Algorithm::HS256);
        // No clock slack: an expired token is expired.
        validation.leeway = 0;
        validation.set_issuer(&[&issuer]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            issuer,
            ttl: Duration::seconds(ttl_seconds),
        }
    }

    pub fn from_config(config: &IdentityConfig) -> Self {
        Self::new(
            config.token_secret.as_bytes(),
            config.issuer.clone(),
            config.token_ttl_seconds,
        )
    }

    /// Issue a token for `identity` with the configured lifetime.
    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue_with_ttl(identity, self.ttl)
    }

    /// Issue a token with an explicit lifetime.
    pub fn issue_with_ttl(&self, identity: &Identity, ttl: Duration) -> Result<String, TokenError> {
        let claims = TokenClaims::new(identity, &self.issuer, ttl);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature, expiry, and issuer; return the embedded claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(b"unit-test-secret", "identity-engine", 300)
    }

    fn identity() -> Identity {
        Identity {
            id: 42,
            login: "a@b.com".to_string(),
            role: Role::Admin,
        }
    }

    #[test]
    fn test_issue_verify_roundtrip() {
        let tokens = service();
        let token = tokens.issue(&identity()).unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.account_id().unwrap(), 42);
        assert_eq!(claims.login, "a@b.com");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.iss, "identity-engine");
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let tokens = service();
        let token = tokens
            .issue_with_ttl(&identity(), Duration::seconds(-30))
            .unwrap();

        assert_eq!(tokens.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        let tokens = service();
        let other = TokenService::new(b"a-different-secret", "identity-engine", 300);

        let token = other.issue(&identity()).unwrap();
        assert_eq!(tokens.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let tokens = service();
        assert_eq!(tokens.verify("not-a-token"), Err(TokenError::Malformed));
        assert_eq!(tokens.verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn test_wrong_issuer_is_rejected() {
        let tokens = service();
        let other = TokenService::new(b"unit-test-secret", "someone-else", 300);

        let token = other.issue(&identity()).unwrap();
        assert!(tokens.verify(&token).is_err());
    }

    #[test]
    fn test_claims_carry_no_secret_fields() {
        let tokens = service();
        let token = tokens.issue(&identity()).unwrap();
        let claims = tokens.verify(&token).unwrap();

        let json = serde_json::to_value(&claims).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert!(keys.iter().all(|k| !k.contains("credential")));
        assert!(keys.iter().all(|k| !k.contains("salt")));
    }
}

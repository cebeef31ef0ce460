use serde::{Deserialize, Serialize};

/// Token issuance configuration.
///
/// The signing secret is process-wide and read-only after startup; it is
/// handed to `TokenService` at construction and never consulted from
/// mutable global state. Rotating it invalidates every outstanding token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub token_secret: String,
    pub token_ttl_seconds: i64,
    pub issuer: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            token_secret: "change-me-in-production".to_string(),
            token_ttl_seconds: 86_400,
            issuer: "identity-engine".to_string(),
        }
    }
}

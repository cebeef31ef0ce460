use anyhow::Context;
use auth_identity::{IdentityConfig, IdentityService, TokenService, UserStore};
use crypto::CredentialHasher;
use database_layer::DatabasePool;
use serde::Deserialize;

/// Process configuration, loaded from the environment once at startup.
///
/// `DATABASE_URL` and `TOKEN_SECRET` are required; a missing signing
/// secret is a startup error, never a silent default.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub database_url: String,
    pub token_secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_seconds: i64,
    #[serde(default = "default_issuer")]
    pub token_issuer: String,
}

fn default_token_ttl() -> i64 {
    86_400
}

fn default_issuer() -> String {
    "identity-engine".to_string()
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::default().try_parsing(true))
            .build()
            .context("failed to read environment")?;

        config
            .try_deserialize()
            .context("incomplete configuration: DATABASE_URL and TOKEN_SECRET are required")
    }

    pub fn identity(&self) -> IdentityConfig {
        IdentityConfig {
            token_secret: self.token_secret.clone(),
            token_ttl_seconds: self.token_ttl_seconds,
            issuer: self.token_issuer.clone(),
        }
    }
}

/// Shared application state: the identity service and everything it owns.
/// Cheap to clone; all members are handle types.
#[derive(Clone)]
pub struct AppState {
    pub service: IdentityService,
}

impl AppState {
    pub fn new(pool: DatabasePool, config: &IdentityConfig) -> Self {
        let hasher = CredentialHasher::new();
        let store = UserStore::new(pool, hasher.clone());
        let tokens = TokenService::from_config(config);
        Self {
            service: IdentityService::new(store, hasher, tokens),
        }
    }
}

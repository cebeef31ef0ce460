/// Sign-on, sign-in, and token refresh orchestration.
use crate::error::{IdentityError, IdentityResult};
use crate::models::{Identity, NewUser};
use crate::store::UserStore;
use crate::tokens::TokenService;
use crypto::CredentialHasher;
use database_layer::StoreError;
use tracing::{debug, warn};

/// A successful authentication: the bearer token and the identity it
/// encodes.
#[derive(Debug, Clone)]
pub struct SignIn {
    pub token: String,
    pub identity: Identity,
}

#[derive(Clone)]
pub struct IdentityService {
    store: UserStore,
    hasher: CredentialHasher,
    tokens: TokenService,
}

impl IdentityService {
    pub fn new(store: UserStore, hasher: CredentialHasher, tokens: TokenService) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    pub fn store(&self) -> &UserStore {
        &self.store
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Register a new account with its profile.
    ///
    /// The existence pre-check gives a friendly early `Conflict`; the
    /// database constraint is what actually guarantees uniqueness when two
    /// registrations race.
    pub async fn sign_on(&self, new: &NewUser) -> IdentityResult<i64> {
        if self.store.exists(&new.login, None).await? {
            return Err(StoreError::Conflict.into());
        }
        self.store.create_user(new).await
    }

    /// Authenticate a login/password pair and issue a session token.
    ///
    /// An unknown login and a wrong password fail identically so callers
    /// cannot probe which logins exist.
    pub async fn sign_in(&self, login: &str, password: &str) -> IdentityResult<SignIn> {
        let account = self
            .store
            .find_by_login(login)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        let valid = self
            .hasher
            .verify(password, &account.credential_digest, &account.credential_salt)?;
        if !valid {
            warn!(login, "sign-in rejected: credential mismatch");
            return Err(IdentityError::InvalidCredentials);
        }

        if !account.is_active() {
            warn!(login, "sign-in rejected: account disabled");
            return Err(IdentityError::AccountDisabled);
        }

        let identity = account.identity();
        let token = self.tokens.issue(&identity)?;
        debug!(account_id = identity.id, "sign-in succeeded");

        Ok(SignIn { token, identity })
    }

    /// Re-resolve an authenticated account and issue a fresh token.
    pub async fn refresh(&self, account_id: i64) -> IdentityResult<SignIn> {
        let account = self
            .store
            .find_by_id(account_id)
            .await?
            .ok_or(StoreError::NotFound)?;

        if !account.is_active() {
            return Err(IdentityError::AccountDisabled);
        }

        let identity = account.identity();
        let token = self.tokens.issue(&identity)?;
        Ok(SignIn { token, identity })
    }
}

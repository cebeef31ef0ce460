use crypto::CryptoError;
use database_layer::StoreError;
use thiserror::Error;

use crate::tokens::TokenError;

#[derive(Error, Debug)]
pub enum IdentityError {
    /// Unknown login and wrong password are deliberately indistinguishable.
    #[error("invalid login or password")]
    InvalidCredentials,

    #[error("account disabled")]
    AccountDisabled,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl From<sqlx::Error> for IdentityError {
    fn from(err: sqlx::Error) -> Self {
        IdentityError::Store(err.into())
    }
}

pub type IdentityResult<T> = Result<T, IdentityError>;

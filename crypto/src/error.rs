use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),
}

pub type CryptoResult<T> = Result<T, CryptoError>;

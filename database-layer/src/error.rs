use thiserror::Error;

/// Failure taxonomy for store operations.
///
/// Uniqueness violations map to `Conflict` so callers can rely on the
/// database constraint rather than a racy pre-check; everything else that
/// is not a missing row is a transport or transaction failure.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("uniqueness conflict")]
    Conflict,

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict,
            _ => StoreError::Unavailable(err.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

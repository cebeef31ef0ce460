//! Database layer for Identity Engine
//!
//! Connection pooling, embedded schema migrations, and the store error
//! taxonomy shared by every repository in the workspace.
//!
//! # Transactions
//!
//! `DatabasePool::begin` hands out an `sqlx::Transaction`; dropping it
//! without an explicit `commit` rolls back. Multi-row mutations in the
//! identity store run entirely inside one such scope so a failed step can
//! never leave a partial write behind.

pub mod connection;
pub mod error;

pub use connection::*;
pub use error::*;

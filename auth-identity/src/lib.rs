//! Identity management and user authentication for Identity Engine
//!
//! This crate provides the core of the identity subsystem:
//! - Account and profile models with a closed role set
//! - Stateless JWT issuance and verification
//! - Transactional account+profile persistence
//! - Sign-on, sign-in, and token refresh orchestration
//!
//! Request-level enforcement (token extraction, role gating) lives in the
//! server crate; field-level input validation is a collaborator's concern
//! and is assumed to have happened before any call into this crate.

pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
pub mod tokens;

pub use config::*;
pub use error::*;
pub use models::*;
pub use service::*;
pub use store::*;
pub use tokens::*;

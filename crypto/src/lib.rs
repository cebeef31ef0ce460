//! Credential hashing toolkit for Identity Engine
//!
//! This crate provides the password hashing boundary of the platform:
//! - Salted PBKDF2-HMAC-SHA256 credential derivation
//! - Constant-time digest verification
//! - Secure random salt generation
//!
//! # Security Features
//!
//! - Derived key material is zeroized when dropped
//! - Constant-time comparison to prevent timing attacks
//! - Loud failures: a broken random source or undecodable stored
//!   material is an error, never an empty digest

pub mod credential;
pub mod error;

pub use credential::*;
pub use error::*;

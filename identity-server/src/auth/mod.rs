/// Request-level authorization for Identity Engine
///
/// The gate is the only place tokens are accepted from the outside world:
/// extract, verify, re-resolve the account, enforce active/role, admit.
pub mod gate;

pub use gate::{require_admin, require_auth, AuthGateError};

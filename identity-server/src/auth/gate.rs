/// Authentication middleware
///
/// Per-request state machine: ExtractToken -> VerifyToken ->
/// ResolveIdentity -> CheckActive -> CheckRole -> Admit. Every rejection
/// kind collapses to one uniform unauthorized response at the boundary;
/// the distinguishing kind survives only in logs.
use crate::server::AppState;
use auth_identity::{Account, Identity, IdentityError, Role};
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use database_layer::StoreError;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum AuthGateError {
    #[error("missing authentication token")]
    MissingToken,

    #[error("invalid authentication token")]
    InvalidToken,

    #[error("token subject no longer exists")]
    UnknownUser,

    #[error("account disabled")]
    UserDisabled,

    #[error("insufficient role")]
    PermissionDenied,

    #[error("identity resolution failed: {0}")]
    Store(StoreError),
}

impl IntoResponse for AuthGateError {
    fn into_response(self) -> Response {
        if let AuthGateError::Store(err) = &self {
            warn!(error = %err, "auth gate could not reach the store");
            let body = serde_json::json!({ "error": "Internal error" });
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
        }

        // The kind is logged here and nowhere else; the response body is
        // identical for every rejection so callers cannot probe accounts.
        warn!(kind = %self, "request rejected by auth gate");
        let body = serde_json::json!({ "error": "Unauthorized" });
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

/// Middleware admitting any authenticated, active account.
pub async fn require_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthGateError> {
    authenticate(&state, request, next, None).await
}

/// Middleware admitting active administrators only.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthGateError> {
    authenticate(&state, request, next, Some(Role::Admin)).await
}

async fn authenticate(
    state: &AppState,
    mut request: Request,
    next: Next,
    required_role: Option<Role>,
) -> Result<Response, AuthGateError> {
    let token = extract_token(&request).ok_or(AuthGateError::MissingToken)?;

    let claims = state
        .service
        .tokens()
        .verify(&token)
        .map_err(|_| AuthGateError::InvalidToken)?;
    let account_id = claims
        .account_id()
        .map_err(|_| AuthGateError::InvalidToken)?;

    // Re-resolve the account: a token can outlive its subject.
    let account = state
        .service
        .store()
        .find_by_id(account_id)
        .await
        .map_err(|e| match e {
            IdentityError::Store(store) => AuthGateError::Store(store),
            other => AuthGateError::Store(StoreError::Unavailable(other.to_string())),
        })?
        .ok_or(AuthGateError::UnknownUser)?;

    let identity = authorize(&account, required_role)?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Active/role admission decision for a resolved account.
pub fn authorize(
    account: &Account,
    required_role: Option<Role>,
) -> Result<Identity, AuthGateError> {
    if !account.is_active() {
        return Err(AuthGateError::UserDisabled);
    }
    if let Some(role) = required_role {
        if account.role != role {
            return Err(AuthGateError::PermissionDenied);
        }
    }
    Ok(account.identity())
}

/// Bearer credential from the Authorization header, falling back to a
/// `token` query parameter.
fn extract_token<B>(request: &axum::http::Request<B>) -> Option<String> {
    if let Some(header) = request.headers().get(AUTHORIZATION) {
        if let Ok(value) = header.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    if let Some(query) = request.uri().query() {
        for pair in query.split('&') {
            if let Some(token) = pair.strip_prefix("token=") {
                if !token.is_empty() {
                    return Some(token.to_string());
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;

    fn account(role: Role, active: bool) -> Account {
        Account::new(7, "a@b.com", "digest", "salt", role, active)
    }

    fn request(uri: &str, auth_header: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = auth_header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_extract_bearer_token() {
        let req = request("/api/user", Some("Bearer abc.def.ghi"));
        assert_eq!(extract_token(&req).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_extract_rejects_other_schemes() {
        let req = request("/api/user", Some("Basic dXNlcjpwYXNz"));
        assert_eq!(extract_token(&req), None);
    }

    #[test]
    fn test_extract_falls_back_to_query_parameter() {
        let req = request("/api/user?foo=1&token=abc.def.ghi", None);
        assert_eq!(extract_token(&req).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_extract_header_wins_over_query() {
        let req = request("/api/user?token=from-query", Some("Bearer from-header"));
        assert_eq!(extract_token(&req).as_deref(), Some("from-header"));
    }

    #[test]
    fn test_extract_missing_token() {
        let req = request("/api/user", None);
        assert_eq!(extract_token(&req), None);
        let req = request("/api/user?token=", None);
        assert_eq!(extract_token(&req), None);
    }

    #[test]
    fn test_authorize_admits_active_account() {
        let identity = authorize(&account(Role::User, true), None).unwrap();
        assert_eq!(identity.id, 7);
        assert_eq!(identity.role, Role::User);
    }

    #[test]
    fn test_authorize_rejects_disabled_account() {
        let result = authorize(&account(Role::Admin, false), None);
        assert!(matches!(result, Err(AuthGateError::UserDisabled)));

        // Disabled wins over role: the gate fails closed before the role
        // check even runs.
        let result = authorize(&account(Role::Admin, false), Some(Role::Admin));
        assert!(matches!(result, Err(AuthGateError::UserDisabled)));
    }

    #[test]
    fn test_authorize_rejects_role_mismatch() {
        let result = authorize(&account(Role::User, true), Some(Role::Admin));
        assert!(matches!(result, Err(AuthGateError::PermissionDenied)));
    }

    #[test]
    fn test_authorize_admits_matching_role() {
        let identity = authorize(&account(Role::Admin, true), Some(Role::Admin)).unwrap();
        assert_eq!(identity.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_rejections_are_externally_uniform() {
        let kinds = [
            AuthGateError::MissingToken,
            AuthGateError::InvalidToken,
            AuthGateError::UnknownUser,
            AuthGateError::UserDisabled,
            AuthGateError::PermissionDenied,
        ];

        let mut bodies = Vec::new();
        for kind in kinds {
            let response = kind.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            bodies.push(bytes);
        }

        assert!(
            bodies.windows(2).all(|pair| pair[0] == pair[1]),
            "all rejection kinds must produce an identical response body"
        );
    }
}

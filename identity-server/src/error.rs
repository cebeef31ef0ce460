use auth_identity::IdentityError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database_layer::StoreError;
use tracing::{error, warn};

/// Handler-level error wrapper mapping the identity taxonomy onto HTTP.
#[derive(Debug)]
pub struct ApiError(pub IdentityError);

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            // Unknown login and wrong password share one message.
            IdentityError::InvalidCredentials => {
                (StatusCode::BAD_REQUEST, "Invalid login or password")
            }
            IdentityError::AccountDisabled => (StatusCode::UNAUTHORIZED, "User disabled"),
            IdentityError::Store(StoreError::NotFound) => (StatusCode::NOT_FOUND, "Not found"),
            IdentityError::Store(StoreError::Conflict) => {
                (StatusCode::CONFLICT, "User already exists")
            }
            IdentityError::Store(StoreError::Unavailable(_))
            | IdentityError::Crypto(_)
            | IdentityError::Token(_) => {
                error!(error = %self.0, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
            }
        };

        if status != StatusCode::INTERNAL_SERVER_ERROR {
            warn!(error = %self.0, status = status.as_u16(), "request rejected");
        }

        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}

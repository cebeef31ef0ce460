/// Authentication endpoints: existence probe, sign-in, sign-on, and the
/// token-renewing current-user lookup.
///
/// Field-level validation (email shape, password policy) happens upstream;
/// these handlers assume well-formed input and enforce business invariants
/// only.
use crate::error::ApiError;
use crate::server::AppState;
use auth_identity::{Identity, NewUser, ProfileFields, Role, SignIn};
use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ExistRequest {
    pub login: String,
}

#[derive(Debug, Serialize)]
pub struct ExistResponse {
    pub exists: bool,
}

#[derive(Deserialize)]
pub struct SignInRequest {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: Identity,
}

impl From<SignIn> for SessionResponse {
    fn from(signed_in: SignIn) -> Self {
        Self {
            token: signed_in.token,
            user: signed_in.identity,
        }
    }
}

#[derive(Deserialize)]
pub struct SignOnRequest {
    pub login: String,
    pub password: String,
    pub name: String,
    pub full_name: String,
    pub register_number: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl From<SignOnRequest> for NewUser {
    fn from(req: SignOnRequest) -> Self {
        NewUser {
            login: req.login,
            password: req.password,
            profile: ProfileFields {
                name: req.name,
                full_name: req.full_name,
                register_number: req.register_number,
            },
            role: req.role,
            active: req.active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
}

/// POST /api/auth/exist
pub async fn exist(
    State(state): State<AppState>,
    Json(req): Json<ExistRequest>,
) -> Result<Json<ExistResponse>, ApiError> {
    let exists = state.service.store().exists(&req.login, None).await?;
    Ok(Json(ExistResponse { exists }))
}

/// POST /api/auth/signin
pub async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let signed_in = state.service.sign_in(&req.login, &req.password).await?;
    Ok(Json(signed_in.into()))
}

/// POST /api/auth/signon
pub async fn sign_on(
    State(state): State<AppState>,
    Json(req): Json<SignOnRequest>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let id = state.service.sign_on(&req.into()).await?;
    Ok(Json(CreatedResponse { id }))
}

/// GET /api/auth/user: renew the caller's token.
pub async fn current_user(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<SessionResponse>, ApiError> {
    let signed_in = state.service.refresh(identity.id).await?;
    Ok(Json(signed_in.into()))
}

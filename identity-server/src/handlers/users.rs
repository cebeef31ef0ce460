/// User management endpoints.
///
/// Photo bytes never pass through here: the upload collaborator stores the
/// file and hands back a path, which is all this service persists.
use crate::error::ApiError;
use crate::server::AppState;
use auth_identity::{Account, Profile, ProfileFields, Role, UserUpdate};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::auth::{CreatedResponse, SignOnRequest};

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub account: Account,
    pub profile: Profile,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub login: String,
    pub password: Option<String>,
    pub name: String,
    pub full_name: String,
    pub register_number: String,
    #[serde(default)]
    pub role: Role,
    pub active: bool,
}

impl From<UpdateUserRequest> for UserUpdate {
    fn from(req: UpdateUserRequest) -> Self {
        UserUpdate {
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

#[derive(Debug, Deserialize)]
pub struct PhotoPathRequest {
    pub path: Option<String>,
}

/// GET /api/user: profiles of active user-role accounts.
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<Profile>>, ApiError> {
    let profiles = state.service.store().list_active_users(Role::User).await?;
    Ok(Json(profiles))
}

/// GET /api/user/:id: account plus profile by account id.
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let (account, profile) = state.service.store().get_with_profile(id).await?;
    Ok(Json(UserResponse { account, profile }))
}

/// POST /api/user: create an account with its profile.
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<SignOnRequest>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let id = state.service.sign_on(&req.into()).await?;
    Ok(Json(CreatedResponse { id }))
}

/// PUT /api/user/:id: update, keyed by profile id. Omitting the password
/// leaves the stored credential untouched.
pub async fn update_user(
    State(state): State<AppState>,
    Path(profile_id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let id = state
        .service
        .store()
        .update_user(profile_id, &req.into())
        .await?;
    Ok(Json(CreatedResponse { id }))
}

/// PUT /api/user/:id/photo: record the path produced by the upload
/// collaborator, keyed by account id.
pub async fn update_photo(
    State(state): State<AppState>,
    Path(account_id): Path<i64>,
    Json(req): Json<PhotoPathRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .service
        .store()
        .update_photo_path(account_id, req.path.as_deref())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/user/:id: admin only; cascade removes the profile.
pub async fn remove_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.service.store().remove_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

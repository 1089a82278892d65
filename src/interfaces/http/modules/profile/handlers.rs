//! Profile API handlers

use std::sync::Arc;

use axum::{extract::State, Extension};

use super::dto::UpdateProfileRequest;
use crate::application::{Session, UserService};
use crate::interfaces::http::common::{api_error, ok, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::modules::auth::UserInfo;

#[derive(Clone)]
pub struct ProfileHandlerState {
    pub users: Arc<UserService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own profile", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_profile(
    State(state): State<ProfileHandlerState>,
    Extension(session): Extension<Session>,
) -> ApiResult<UserInfo> {
    let user = state
        .users
        .current_user(Some(&session))
        .await
        .map_err(api_error)?;
    Ok(ok(UserInfo::from(user)))
}

#[utoipa::path(
    put,
    path = "/api/v1/profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated"),
        (status = 422, description = "Field validation failed")
    )
)]
pub async fn update_profile(
    State(state): State<ProfileHandlerState>,
    Extension(session): Extension<Session>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<UserInfo> {
    let user = state
        .users
        .update_profile(&session, request.into())
        .await
        .map_err(api_error)?;
    Ok(ok(UserInfo::from(user)))
}

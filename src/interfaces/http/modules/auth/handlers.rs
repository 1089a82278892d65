//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};

use super::dto::{LoginRequest, LoginResponse, MenuResponse, RegisterRequest, UserInfo};
use crate::application::access::menu_for;
use crate::application::{Session, SignUpCommand, UserService};
use crate::domain::{DomainError, SellerType, UserRole};
use crate::interfaces::http::common::{api_error, ok, ApiError, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::modules::metrics::record_sign_in;

#[derive(Clone)]
pub struct AuthHandlerState {
    pub users: Arc<UserService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<UserInfo>),
        (status = 400, description = "Invalid role, seller type or password confirmation"),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Field validation failed")
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserInfo>>), ApiError> {
    let role: UserRole = request.role.parse().map_err(api_error)?;
    let seller_type = request
        .seller_type
        .as_deref()
        .map(str::parse::<SellerType>)
        .transpose()
        .map_err(api_error)?;

    let user = state
        .users
        .sign_up(SignUpCommand {
            email: request.email,
            password: request.password,
            password_confirmation: request.password_confirmation,
            role,
            seller_type,
            company_name: request.company_name,
            contact_person: request.contact_person,
            phone: request.phone,
            position: request.position,
        })
        .await
        .map_err(api_error)?;

    Ok((StatusCode::CREATED, ok(UserInfo::from(user))))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let result = state.users.sign_in(&request.email, &request.password).await;
    record_sign_in(result.is_ok());
    let signed_in = result.map_err(api_error)?;

    Ok(ok(LoginResponse {
        token: signed_in.token,
        token_type: "Bearer".to_string(),
        expires_at: signed_in.session.expires_at,
        user: UserInfo::from(signed_in.user),
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Session destroyed", body = ApiResponse<String>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn logout(
    State(state): State<AuthHandlerState>,
    Extension(session): Extension<Session>,
) -> ApiResult<String> {
    state.users.sign_out(&session);
    Ok(ok("Signed out".to_string()))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_current_user(
    State(state): State<AuthHandlerState>,
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
    get,
    path = "/api/v1/auth/me/menu",
    tag = "Authentication",
    security((), ("bearer_auth" = [])),
    responses(
        (status = 200, description = "Sections reachable with the stored role; guest sections without a token", body = ApiResponse<MenuResponse>)
    )
)]
pub async fn get_menu(
    State(state): State<AuthHandlerState>,
    session: Option<Extension<Session>>,
) -> ApiResult<MenuResponse> {
    let session = session.map(|Extension(s)| s);
    let user = match state.users.current_user(session.as_ref()).await {
        Ok(user) => Some(user),
        Err(DomainError::Unauthorized(_)) => None,
        Err(e) => return Err(api_error(e)),
    };

    let role = user.as_ref().map(|u| u.role);
    Ok(ok(MenuResponse {
        role: role.map_or("guest", |r| r.as_str()).to_string(),
        sections: menu_for(role).into_iter().map(Into::into).collect(),
    }))
}

//! Admin API handlers
//!
//! Every handler goes through the workflow's admin gate, which re-reads the
//! caller's role before touching request data.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension,
};

use super::dto::{
    AdminRequestParams, AdminSnapshotDto, ChangeRoleRequest, StatsDto, TransitionResponse,
    UpdateStatusRequest, UserListParams,
};
use crate::application::{AdminWorkflow, Session, UserService};
use crate::domain::user::GetUserDto;
use crate::domain::{DomainResult, RequestKind, RequestStatus, UserRole};
use crate::interfaces::http::common::{
    api_error, ok, ApiResponse, ApiResult, PaginatedResponse, PaginationParams, PagingConfig,
    ValidatedJson,
};
use crate::interfaces::http::modules::auth::UserInfo;
use crate::interfaces::http::modules::metrics::record_transition;
use crate::interfaces::http::modules::requests::{ConcreteRequestDto, SteelRequestDto};

#[derive(Clone)]
pub struct AdminHandlerState {
    pub workflow: Arc<AdminWorkflow>,
    pub users: Arc<UserService>,
    pub paging: PagingConfig,
}

fn status_filter(raw: Option<&str>) -> DomainResult<Option<RequestStatus>> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .transpose()
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/stats",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard counters", body = ApiResponse<StatsDto>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn get_stats(
    State(state): State<AdminHandlerState>,
    Extension(session): Extension<Session>,
) -> ApiResult<StatsDto> {
    let stats = state.workflow.stats(Some(&session)).await.map_err(api_error)?;
    Ok(ok(stats.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/dashboard",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Counters plus the newest page of each collection", body = ApiResponse<AdminSnapshotDto>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn get_dashboard(
    State(state): State<AdminHandlerState>,
    Extension(session): Extension<Session>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<AdminSnapshotDto> {
    let window = state.paging.window(params.page, params.page_size);
    let snapshot = state
        .workflow
        .snapshot(Some(&session), window)
        .await
        .map_err(api_error)?;
    Ok(ok(snapshot.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/requests/concrete",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(AdminRequestParams),
    responses(
        (status = 200, description = "Concrete requests, newest first", body = ApiResponse<PaginatedResponse<ConcreteRequestDto>>),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn list_concrete_requests(
    State(state): State<AdminHandlerState>,
    Extension(session): Extension<Session>,
    Query(params): Query<AdminRequestParams>,
) -> ApiResult<PaginatedResponse<ConcreteRequestDto>> {
    let status = status_filter(params.status.as_deref()).map_err(api_error)?;
    let window = state.paging.window(params.page, params.page_size);
    let page = state
        .workflow
        .list_concrete(Some(&session), status, window)
        .await
        .map_err(api_error)?;
    Ok(ok(page.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/requests/steel",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(AdminRequestParams),
    responses(
        (status = 200, description = "Steel requests, newest first", body = ApiResponse<PaginatedResponse<SteelRequestDto>>),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn list_steel_requests(
    State(state): State<AdminHandlerState>,
    Extension(session): Extension<Session>,
    Query(params): Query<AdminRequestParams>,
) -> ApiResult<PaginatedResponse<SteelRequestDto>> {
    let status = status_filter(params.status.as_deref()).map_err(api_error)?;
    let window = state.paging.window(params.page, params.page_size);
    let page = state
        .workflow
        .list_steel(Some(&session), status, window)
        .await
        .map_err(api_error)?;
    Ok(ok(page.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/requests/{kind}/{id}/status",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(
        ("kind" = String, Path, description = "`concrete` or `steel`"),
        ("id" = String, Path, description = "Request id")
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status written; dashboard re-read", body = ApiResponse<TransitionResponse>),
        (status = 400, description = "Unknown kind or status"),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "No such request"),
        (status = 409, description = "Request changed since `expected_updated_at`")
    )
)]
pub async fn update_request_status(
    State(state): State<AdminHandlerState>,
    Extension(session): Extension<Session>,
    Path((kind, id)): Path<(String, String)>,
    ValidatedJson(body): ValidatedJson<UpdateStatusRequest>,
) -> ApiResult<TransitionResponse> {
    let kind: RequestKind = kind.parse().map_err(api_error)?;
    let target: RequestStatus = body.status.parse().map_err(api_error)?;

    let outcome = state
        .workflow
        .transition_status(
            Some(&session),
            kind,
            &id,
            target,
            body.expected_updated_at,
            state.paging.window(None, None),
        )
        .await
        .map_err(api_error)?;

    record_transition(kind, target);
    Ok(ok(outcome.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(UserListParams),
    responses(
        (status = 200, description = "Users, newest first", body = ApiResponse<PaginatedResponse<UserInfo>>),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn list_users(
    State(state): State<AdminHandlerState>,
    Extension(session): Extension<Session>,
    Query(params): Query<UserListParams>,
) -> ApiResult<PaginatedResponse<UserInfo>> {
    let role = params
        .role
        .as_deref()
        .filter(|r| !r.trim().is_empty())
        .map(str::parse::<UserRole>)
        .transpose()
        .map_err(api_error)?;

    let dto = GetUserDto {
        search: params.search,
        role,
        window: state.paging.window(params.page, params.page_size),
    };
    let page = state
        .users
        .list_users(Some(&session), dto)
        .await
        .map_err(api_error)?;
    Ok(ok(page.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}/role",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User id")),
    request_body = ChangeRoleRequest,
    responses(
        (status = 200, description = "Role changed; user re-read", body = ApiResponse<UserInfo>),
        (status = 403, description = "Not an administrator, or self-demotion"),
        (status = 404, description = "No such user")
    )
)]
pub async fn change_user_role(
    State(state): State<AdminHandlerState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<ChangeRoleRequest>,
) -> ApiResult<UserInfo> {
    let role: UserRole = body.role.parse().map_err(api_error)?;
    let user = state
        .users
        .change_role(Some(&session), &id, role)
        .await
        .map_err(api_error)?;
    Ok(ok(user.into()))
}

//! Request submission API handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::info;

use super::dto::{
    ConcreteRequestDto, CreateConcreteRequestBody, CreateSteelRequestBody, OwnRequestDto,
    OwnRequestsParams, OwnStatsDto, SteelRequestDto,
};
use crate::application::{Session, SubmissionService};
use crate::domain::RequestKind;
use crate::interfaces::http::common::{
    api_error, ok, ApiError, ApiResponse, ApiResult, PaginatedResponse, PagingConfig,
    ValidatedJson,
};
use crate::interfaces::http::modules::metrics::record_submission;

#[derive(Clone)]
pub struct RequestsHandlerState {
    pub submissions: Arc<SubmissionService>,
    pub paging: PagingConfig,
}

#[utoipa::path(
    post,
    path = "/api/v1/requests/concrete",
    tag = "Requests",
    security(("bearer_auth" = [])),
    request_body = CreateConcreteRequestBody,
    responses(
        (status = 201, description = "Request stored as pending", body = ApiResponse<ConcreteRequestDto>),
        (status = 400, description = "Unknown item tag or blank field"),
        (status = 401, description = "Not authenticated"),
        (status = 422, description = "Field validation failed")
    )
)]
pub async fn submit_concrete(
    State(state): State<RequestsHandlerState>,
    Extension(session): Extension<Session>,
    ValidatedJson(body): ValidatedJson<CreateConcreteRequestBody>,
) -> Result<(StatusCode, Json<ApiResponse<ConcreteRequestDto>>), ApiError> {
    let input = body.into_input().map_err(api_error)?;
    let stored = state
        .submissions
        .submit_concrete(&session, input)
        .await
        .map_err(api_error)?;

    record_submission(RequestKind::Concrete);
    info!(request_id = %stored.id, owner_id = %stored.owner_id, "Concrete request submitted");
    Ok((StatusCode::CREATED, ok(stored.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/requests/steel",
    tag = "Requests",
    security(("bearer_auth" = [])),
    request_body = CreateSteelRequestBody,
    responses(
        (status = 201, description = "Request stored as pending", body = ApiResponse<SteelRequestDto>),
        (status = 400, description = "Non-positive dimensions or unknown tag"),
        (status = 401, description = "Not authenticated"),
        (status = 422, description = "Field validation failed")
    )
)]
pub async fn submit_steel(
    State(state): State<RequestsHandlerState>,
    Extension(session): Extension<Session>,
    ValidatedJson(body): ValidatedJson<CreateSteelRequestBody>,
) -> Result<(StatusCode, Json<ApiResponse<SteelRequestDto>>), ApiError> {
    let input = body.into_input().map_err(api_error)?;
    let stored = state
        .submissions
        .submit_steel(&session, input)
        .await
        .map_err(api_error)?;

    record_submission(RequestKind::Steel);
    info!(request_id = %stored.id, owner_id = %stored.owner_id, "Steel request submitted");
    Ok((StatusCode::CREATED, ok(stored.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/requests/mine",
    tag = "Requests",
    security(("bearer_auth" = [])),
    params(OwnRequestsParams),
    responses(
        (status = 200, description = "Own requests, newest first", body = ApiResponse<PaginatedResponse<OwnRequestDto>>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_own_requests(
    State(state): State<RequestsHandlerState>,
    Extension(session): Extension<Session>,
    Query(params): Query<OwnRequestsParams>,
) -> ApiResult<PaginatedResponse<OwnRequestDto>> {
    let kind = params
        .kind
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .map(str::parse::<RequestKind>)
        .transpose()
        .map_err(api_error)?;
    let window = state.paging.window(params.page, params.page_size);

    let page = state
        .submissions
        .list_own(&session, kind, window)
        .await
        .map_err(api_error)?;
    Ok(ok(page.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/requests/mine/stats",
    tag = "Requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Counters over the caller's own requests", body = ApiResponse<OwnStatsDto>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn own_stats(
    State(state): State<RequestsHandlerState>,
    Extension(session): Extension<Session>,
) -> ApiResult<OwnStatsDto> {
    let stats = state.submissions.own_stats(&session).await.map_err(api_error)?;
    Ok(ok(stats.into()))
}

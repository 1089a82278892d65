//! Shared HTTP plumbing: response envelope, paging, error mapping

pub mod serde_helpers;
pub mod validated_json;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::{IntoParams, ToSchema};

use crate::domain::DomainError;
use crate::shared::{validate_pagination, PageRequest, PaginatedResult};

pub use validated_json::ValidatedJson;

/// Standard API response envelope
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "data": null, "error": "..."}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// One page of a listing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    /// Across all pages
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T, D: From<T>> From<PaginatedResult<T>> for PaginatedResponse<D> {
    fn from(result: PaginatedResult<T>) -> Self {
        Self {
            items: result.items.into_iter().map(D::from).collect(),
            total: result.total,
            page: result.page,
            limit: result.limit,
            total_pages: result.total_pages,
        }
    }
}

/// Query parameters for paged listings
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct PaginationParams {
    /// 1-based page number. Default: 1
    pub page: Option<u32>,
    /// Items per page. Default and maximum come from configuration
    pub page_size: Option<u32>,
}

/// Page size limits applied to every listing
#[derive(Debug, Clone, Copy)]
pub struct PagingConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl PagingConfig {
    pub fn window(&self, page: Option<u32>, page_size: Option<u32>) -> PageRequest {
        validate_pagination(page, page_size, self.default_page_size, self.max_page_size)
    }
}

pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub fn error_status(err: &DomainError) -> StatusCode {
    match err {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Convert a domain error into the JSON envelope, logging it on the way.
pub fn api_error(err: DomainError) -> ApiError {
    let status = error_status(&err);
    if err.is_client_error() {
        warn!(status = status.as_u16(), error = %err, "Request rejected");
    } else {
        error!(error = %err, "Store failure");
    }
    (status, Json(ApiResponse::error(err.to_string())))
}

/// Wrap a successful value in the envelope.
pub fn ok<T>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_http_statuses() {
        assert_eq!(error_status(&DomainError::validation("x")), StatusCode::BAD_REQUEST);
        assert_eq!(error_status(&DomainError::Unauthorized("x".into())), StatusCode::UNAUTHORIZED);
        assert_eq!(error_status(&DomainError::Forbidden("x".into())), StatusCode::FORBIDDEN);
        assert_eq!(
            error_status(&DomainError::not_found("User", "id", "1")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(error_status(&DomainError::Conflict("x".into())), StatusCode::CONFLICT);
        assert_eq!(
            error_status(&DomainError::Store("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn paging_is_clamped_to_configured_maximum() {
        let paging = PagingConfig::default();
        assert_eq!(paging.window(None, None), PageRequest::new(1, 10));
        assert_eq!(paging.window(Some(3), Some(1000)), PageRequest::new(3, 100));
    }
}

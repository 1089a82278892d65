//! Admin DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::{AdminSnapshot, RequestStats, TransitionOutcome};
use crate::domain::StatusCounts;
use crate::interfaces::http::common::PaginatedResponse;
use crate::interfaces::http::modules::requests::{ConcreteRequestDto, SteelRequestDto};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusCountsDto {
    pub total: u64,
    /// Includes requests whose status was never set
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    pub completed: u64,
}

impl From<StatusCounts> for StatusCountsDto {
    fn from(c: StatusCounts) -> Self {
        Self {
            total: c.total,
            pending: c.pending,
            approved: c.approved,
            rejected: c.rejected,
            completed: c.completed,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatsDto {
    pub concrete: StatusCountsDto,
    pub steel: StatusCountsDto,
    pub total_requests: u64,
    pub pending: u64,
    /// Completed across both kinds
    pub completed: u64,
    pub total_users: u64,
}

impl From<RequestStats> for StatsDto {
    fn from(stats: RequestStats) -> Self {
        Self {
            total_requests: stats.total_requests(),
            pending: stats.pending(),
            completed: stats.completed(),
            total_users: stats.total_users,
            concrete: stats.concrete.into(),
            steel: stats.steel.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminSnapshotDto {
    pub stats: StatsDto,
    pub concrete: PaginatedResponse<ConcreteRequestDto>,
    pub steel: PaginatedResponse<SteelRequestDto>,
}

impl From<AdminSnapshot> for AdminSnapshotDto {
    fn from(snapshot: AdminSnapshot) -> Self {
        Self {
            stats: snapshot.stats.into(),
            concrete: snapshot.concrete.into(),
            steel: snapshot.steel.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AdminRequestParams {
    /// `pending` also matches requests with no status
    pub status: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusRequest {
    /// `pending`, `approved`, `rejected` or `completed`
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
    /// `updated_at` as last read; the write is refused if it has changed since
    pub expected_updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransitionResponse {
    pub kind: String,
    pub id: String,
    pub status: Option<String>,
    pub updated_at: DateTime<Utc>,
    /// Dashboard as re-read after the write
    pub snapshot: AdminSnapshotDto,
}

impl From<TransitionOutcome> for TransitionResponse {
    fn from(outcome: TransitionOutcome) -> Self {
        Self {
            kind: outcome.kind.as_str().to_string(),
            id: outcome.id,
            status: outcome.stamp.status.map(|s| s.as_str().to_string()),
            updated_at: outcome.stamp.updated_at,
            snapshot: outcome.snapshot.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct UserListParams {
    /// Matches email or company name
    pub search: Option<String>,
    pub role: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangeRoleRequest {
    #[validate(length(min = 1, message = "Role is required"))]
    #[schema(example = "seller")]
    pub role: String,
}

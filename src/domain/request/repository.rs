use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{ConcreteRequest, RequestKind, RequestQuery, RequestStatus, StatusCounts, StatusStamp, SteelRequest};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

/// The `concrete_requests` and `steel_requests` collections of the record store.
#[async_trait]
pub trait RequestRepository: Send + Sync {
    async fn insert_concrete(&self, request: ConcreteRequest) -> DomainResult<ConcreteRequest>;
    async fn insert_steel(&self, request: SteelRequest) -> DomainResult<SteelRequest>;

    /// Newest first.
    async fn list_concrete(&self, query: RequestQuery<'_>) -> DomainResult<PaginatedResult<ConcreteRequest>>;
    /// Newest first.
    async fn list_steel(&self, query: RequestQuery<'_>) -> DomainResult<PaginatedResult<SteelRequest>>;

    /// Per-status counts for one collection, limited to `owner_id` when set.
    async fn status_counts(&self, kind: RequestKind, owner_id: Option<&str>) -> DomainResult<StatusCounts>;

    /// Write `status` and move `updated_at` strictly forward.
    ///
    /// With `expected_updated_at` set, nothing is written unless the stored
    /// stamp still equals it (`DomainError::Conflict`). A missing record is
    /// `DomainError::NotFound`.
    async fn update_status(
        &self,
        kind: RequestKind,
        id: &str,
        status: RequestStatus,
        expected_updated_at: Option<DateTime<Utc>>,
    ) -> DomainResult<StatusStamp>;
}

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::RequestStats;
use crate::application::access::require_admin;
use crate::application::session::Session;
use crate::domain::request::{
    ConcreteRequest, RequestKind, RequestQuery, RequestStatus, StatusStamp, SteelRequest,
};
use crate::domain::{DomainResult, RepositoryProvider, User};
use crate::shared::{PageRequest, PaginatedResult};

/// What the admin dashboard shows: aggregates plus one page of each collection.
#[derive(Debug, Clone)]
pub struct AdminSnapshot {
    pub stats: RequestStats,
    pub concrete: PaginatedResult<ConcreteRequest>,
    pub steel: PaginatedResult<SteelRequest>,
}

#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    pub kind: RequestKind,
    pub id: String,
    pub stamp: StatusStamp,
    /// Dashboard re-read after the write
    pub snapshot: AdminSnapshot,
}

/// Administrator side of the request lifecycle
pub struct AdminWorkflow {
    repos: Arc<dyn RepositoryProvider>,
}

impl AdminWorkflow {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn authorize_admin(&self, session: Option<&Session>) -> DomainResult<User> {
        require_admin(self.repos.as_ref(), session).await
    }

    async fn load_stats(&self) -> DomainResult<RequestStats> {
        let requests = self.repos.requests();
        let concrete = requests.status_counts(RequestKind::Concrete, None).await?;
        let steel = requests.status_counts(RequestKind::Steel, None).await?;
        let total_users = self.repos.users().count_users().await?;
        Ok(RequestStats::new(concrete, steel, total_users))
    }

    async fn load_snapshot(&self, window: PageRequest) -> DomainResult<AdminSnapshot> {
        let requests = self.repos.requests();
        let concrete = requests.list_concrete(RequestQuery::all(window)).await?;
        let steel = requests.list_steel(RequestQuery::all(window)).await?;
        let stats = self.load_stats().await?;
        Ok(AdminSnapshot {
            stats,
            concrete,
            steel,
        })
    }

    /// Both collections newest first, with dashboard aggregates.
    pub async fn snapshot(&self, session: Option<&Session>, window: PageRequest) -> DomainResult<AdminSnapshot> {
        self.authorize_admin(session).await?;
        self.load_snapshot(window).await
    }

    pub async fn stats(&self, session: Option<&Session>) -> DomainResult<RequestStats> {
        self.authorize_admin(session).await?;
        self.load_stats().await
    }

    pub async fn list_concrete(
        &self,
        session: Option<&Session>,
        status: Option<RequestStatus>,
        window: PageRequest,
    ) -> DomainResult<PaginatedResult<ConcreteRequest>> {
        self.authorize_admin(session).await?;
        let query = RequestQuery {
            status,
            ..RequestQuery::all(window)
        };
        self.repos.requests().list_concrete(query).await
    }

    pub async fn list_steel(
        &self,
        session: Option<&Session>,
        status: Option<RequestStatus>,
        window: PageRequest,
    ) -> DomainResult<PaginatedResult<SteelRequest>> {
        self.authorize_admin(session).await?;
        let query = RequestQuery {
            status,
            ..RequestQuery::all(window)
        };
        self.repos.requests().list_steel(query).await
    }

    /// Set a request's status, then re-read the dashboard.
    ///
    /// Any state may follow any state. `expected_updated_at` turns the write
    /// into a compare-and-swap against the stored modification stamp.
    pub async fn transition_status(
        &self,
        session: Option<&Session>,
        kind: RequestKind,
        id: &str,
        target: RequestStatus,
        expected_updated_at: Option<DateTime<Utc>>,
        window: PageRequest,
    ) -> DomainResult<TransitionOutcome> {
        let admin = self.authorize_admin(session).await?;

        let stamp = self
            .repos
            .requests()
            .update_status(kind, id, target, expected_updated_at)
            .await?;
        info!(admin_id = %admin.id, %kind, request_id = id, status = %target, "Request status changed");

        let snapshot = self.load_snapshot(window).await?;
        Ok(TransitionOutcome {
            kind,
            id: id.to_string(),
            stamp,
            snapshot,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;
    use crate::application::session::SessionRegistry;
    use crate::application::test_support::{seed_user, session_for};
    use crate::domain::request::{ContactSnapshot, FormworkItem, RequestRepository, StatusCounts};
    use crate::domain::{DomainError, UserRepositoryInterface, UserRole};
    use crate::infrastructure::storage::{InMemoryRequestRepository, InMemoryUserRepository};
    use crate::shared::now_micros;

    /// Counts every read that touches request data.
    #[derive(Default)]
    struct SpyRequests {
        inner: InMemoryRequestRepository,
        reads: AtomicUsize,
    }

    #[async_trait]
    impl RequestRepository for SpyRequests {
        async fn insert_concrete(&self, r: ConcreteRequest) -> DomainResult<ConcreteRequest> {
            self.inner.insert_concrete(r).await
        }

        async fn insert_steel(&self, r: SteelRequest) -> DomainResult<SteelRequest> {
            self.inner.insert_steel(r).await
        }

        async fn list_concrete(&self, q: RequestQuery<'_>) -> DomainResult<PaginatedResult<ConcreteRequest>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.list_concrete(q).await
        }

        async fn list_steel(&self, q: RequestQuery<'_>) -> DomainResult<PaginatedResult<SteelRequest>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.list_steel(q).await
        }

        async fn status_counts(&self, kind: RequestKind, owner_id: Option<&str>) -> DomainResult<StatusCounts> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.status_counts(kind, owner_id).await
        }

        async fn update_status(
            &self,
            kind: RequestKind,
            id: &str,
            status: RequestStatus,
            expected: Option<DateTime<Utc>>,
        ) -> DomainResult<StatusStamp> {
            self.inner.update_status(kind, id, status, expected).await
        }
    }

    #[derive(Default)]
    struct SpyProvider {
        users: InMemoryUserRepository,
        requests: SpyRequests,
    }

    impl RepositoryProvider for SpyProvider {
        fn users(&self) -> &dyn UserRepositoryInterface {
            &self.users
        }

        fn requests(&self) -> &dyn RequestRepository {
            &self.requests
        }
    }

    struct Fixture {
        provider: Arc<SpyProvider>,
        workflow: AdminWorkflow,
        admin: Session,
        buyer: Session,
    }

    async fn fixture() -> Fixture {
        let provider = Arc::new(SpyProvider::default());
        let registry = SessionRegistry::new();
        let admin = seed_user(provider.as_ref(), "admin@example.com", UserRole::Admin).await;
        let buyer = seed_user(provider.as_ref(), "buyer@example.com", UserRole::Buyer).await;

        Fixture {
            workflow: AdminWorkflow::new(provider.clone()),
            admin: session_for(&registry, &admin),
            buyer: session_for(&registry, &buyer),
            provider,
        }
    }

    async fn store_concrete(f: &Fixture, status: Option<RequestStatus>) -> ConcreteRequest {
        let now = now_micros();
        f.provider
            .requests
            .insert_concrete(ConcreteRequest {
                id: uuid::Uuid::new_v4().to_string(),
                owner_id: f.buyer.user_id.clone(),
                title: "Columns".into(),
                description: "Round columns".into(),
                items: BTreeSet::from([FormworkItem::RoundColumn]),
                material: "steel".into(),
                project_location: "Qom".into(),
                deadline: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
                status,
                contact: ContactSnapshot::default(),
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap()
    }

    fn page() -> PageRequest {
        PageRequest::new(1, 10)
    }

    #[tokio::test]
    async fn non_admin_is_rejected_before_any_request_read() {
        let f = fixture().await;
        store_concrete(&f, None).await;

        let err = f.workflow.snapshot(Some(&f.buyer), page()).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let err = f.workflow.snapshot(None, page()).await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        let err = f
            .workflow
            .transition_status(Some(&f.buyer), RequestKind::Concrete, "x", RequestStatus::Approved, None, page())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        assert_eq!(f.provider.requests.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unset_status_counts_as_pending() {
        let f = fixture().await;
        store_concrete(&f, None).await;
        store_concrete(&f, Some(RequestStatus::Completed)).await;

        let stats = f.workflow.stats(Some(&f.admin)).await.unwrap();
        assert_eq!(stats.concrete.total, 2);
        assert_eq!(stats.concrete.pending, 1);
        assert_eq!(stats.completed(), 1);
        assert_eq!(stats.total_users, 2);
    }

    #[tokio::test]
    async fn transition_is_visible_in_the_refetched_snapshot() {
        let f = fixture().await;
        let request = store_concrete(&f, Some(RequestStatus::Pending)).await;

        let before = f.workflow.stats(Some(&f.admin)).await.unwrap();
        assert_eq!(before.concrete.pending, 1);

        let outcome = f
            .workflow
            .transition_status(
                Some(&f.admin),
                RequestKind::Concrete,
                &request.id,
                RequestStatus::Rejected,
                None,
                page(),
            )
            .await
            .unwrap();

        let listed = &outcome.snapshot.concrete.items[0];
        assert_eq!(listed.status, Some(RequestStatus::Rejected));
        assert!(listed.updated_at > request.updated_at);
        assert_eq!(outcome.stamp.updated_at, listed.updated_at);
        assert_eq!(outcome.snapshot.stats.concrete.pending, 0);
        assert_eq!(outcome.snapshot.stats.concrete.rejected, 1);
    }

    #[tokio::test]
    async fn repeating_a_transition_keeps_the_same_state() {
        let f = fixture().await;
        let request = store_concrete(&f, None).await;

        let first = f
            .workflow
            .transition_status(Some(&f.admin), RequestKind::Concrete, &request.id, RequestStatus::Approved, None, page())
            .await
            .unwrap();
        let second = f
            .workflow
            .transition_status(Some(&f.admin), RequestKind::Concrete, &request.id, RequestStatus::Approved, None, page())
            .await
            .unwrap();

        assert_eq!(first.snapshot.stats, second.snapshot.stats);
        assert_eq!(second.snapshot.concrete.items[0].status, Some(RequestStatus::Approved));
        assert!(second.stamp.updated_at > first.stamp.updated_at);
    }

    #[tokio::test]
    async fn every_state_can_follow_every_state() {
        let f = fixture().await;
        let request = store_concrete(&f, None).await;

        for from in RequestStatus::ALL {
            for to in RequestStatus::ALL {
                f.workflow
                    .transition_status(Some(&f.admin), RequestKind::Concrete, &request.id, from, None, page())
                    .await
                    .unwrap();
                let outcome = f
                    .workflow
                    .transition_status(Some(&f.admin), RequestKind::Concrete, &request.id, to, None, page())
                    .await
                    .unwrap();
                assert_eq!(outcome.stamp.status, Some(to), "{from} -> {to}");
            }
        }
    }

    #[tokio::test]
    async fn stale_token_is_a_conflict_and_writes_nothing() {
        let f = fixture().await;
        let request = store_concrete(&f, None).await;

        f.workflow
            .transition_status(
                Some(&f.admin),
                RequestKind::Concrete,
                &request.id,
                RequestStatus::Approved,
                Some(request.updated_at),
                page(),
            )
            .await
            .unwrap();

        let err = f
            .workflow
            .transition_status(
                Some(&f.admin),
                RequestKind::Concrete,
                &request.id,
                RequestStatus::Completed,
                Some(request.updated_at),
                page(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let listed = f
            .workflow
            .list_concrete(Some(&f.admin), Some(RequestStatus::Approved), page())
            .await
            .unwrap();
        assert_eq!(listed.total, 1);
    }

    #[tokio::test]
    async fn unknown_request_is_not_found() {
        let f = fixture().await;
        let err = f
            .workflow
            .transition_status(Some(&f.admin), RequestKind::Steel, "missing", RequestStatus::Completed, None, page())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}

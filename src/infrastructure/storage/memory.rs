//! In-memory repositories for development and testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::request::{
    ConcreteRequest, RequestKind, RequestQuery, RequestRepository, RequestStatus, StatusCounts,
    StatusStamp, SteelRequest,
};
use crate::domain::user::{CreateUserDto, GetUserDto, UpdateProfileDto};
use crate::domain::{
    DomainError, DomainResult, RepositoryProvider, User, UserRepositoryInterface, UserRole,
};
use crate::shared::{next_modification, now_micros, PaginatedResult};

// ── Users ───────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, User>,
    /// email -> user id
    emails: DashMap<String, String>,
}

fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, String)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[async_trait]
impl UserRepositoryInterface for InMemoryUserRepository {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let id = uuid::Uuid::new_v4().to_string();
        match self.emails.entry(dto.email.clone()) {
            Entry::Occupied(_) => {
                return Err(DomainError::Conflict(
                    "Email is already registered".to_string(),
                ))
            }
            Entry::Vacant(slot) => {
                slot.insert(id.clone());
            }
        }

        let now = now_micros();
        let user = User {
            id: id.clone(),
            email: dto.email,
            password_hash: dto.password_hash,
            role: dto.role,
            profile: dto.profile,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        };
        self.users.insert(id, user.clone());
        Ok(user)
    }

    async fn list_users(&self, dto: GetUserDto) -> DomainResult<PaginatedResult<User>> {
        // Case-insensitive, like SQLite LIKE
        let term = dto.search.as_deref().map(str::to_lowercase);
        let mut users: Vec<User> = self
            .users
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|u| dto.role.map_or(true, |role| u.role == role))
            .filter(|u| match term.as_deref() {
                None => true,
                Some(term) => {
                    u.email.to_lowercase().contains(term)
                        || u.profile
                            .company_name
                            .as_deref()
                            .is_some_and(|c| c.to_lowercase().contains(term))
                }
            })
            .collect();
        newest_first(&mut users, |u| (u.created_at, u.id.clone()));

        Ok(PaginatedResult::from_ordered(users, dto.window))
    }

    async fn count_users(&self) -> DomainResult<u64> {
        Ok(self.users.len() as u64)
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let Some(id) = self.emails.get(email).map(|id| id.value().clone()) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.users.get(id).map(|u| u.value().clone()))
    }

    async fn update_profile(&self, id: &str, dto: UpdateProfileDto) -> DomainResult<Option<User>> {
        let Some(mut user) = self.users.get_mut(id) else {
            return Ok(None);
        };

        let profile = &mut user.profile;
        if let Some(company_name) = dto.company_name {
            profile.company_name = Some(company_name);
        }
        if let Some(contact_person) = dto.contact_person {
            profile.contact_person = Some(contact_person);
        }
        if let Some(phone) = dto.phone {
            profile.phone = Some(phone);
        }
        if let Some(position) = dto.position {
            profile.position = Some(position);
        }
        user.updated_at = next_modification(user.updated_at);
        Ok(Some(user.clone()))
    }

    async fn update_role(&self, id: &str, role: UserRole) -> DomainResult<Option<User>> {
        let Some(mut user) = self.users.get_mut(id) else {
            return Ok(None);
        };
        user.role = role;
        user.updated_at = next_modification(user.updated_at);
        Ok(Some(user.clone()))
    }

    async fn touch_last_login(&self, id: &str) -> DomainResult<()> {
        if let Some(mut user) = self.users.get_mut(id) {
            user.last_login_at = Some(now_micros());
        }
        Ok(())
    }
}

// ── Requests ────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryRequestRepository {
    concrete: DashMap<String, ConcreteRequest>,
    steel: DashMap<String, SteelRequest>,
}

fn query_matches(owner_id: &str, status: Option<RequestStatus>, query: &RequestQuery<'_>) -> bool {
    let owner_ok = query.owner_id.map_or(true, |owner| owner == owner_id);
    let status_ok = match query.status {
        None => true,
        Some(RequestStatus::Pending) => crate::domain::request::counts_as_pending(status),
        Some(wanted) => status == Some(wanted),
    };
    owner_ok && status_ok
}

/// Compare-and-swap on one record's status column.
fn swap_status(
    kind: RequestKind,
    id: &str,
    status: &mut Option<RequestStatus>,
    updated_at: &mut DateTime<Utc>,
    target: RequestStatus,
    expected_updated_at: Option<DateTime<Utc>>,
) -> DomainResult<StatusStamp> {
    if expected_updated_at.is_some_and(|expected| expected != *updated_at) {
        return Err(DomainError::Conflict(format!(
            "{} {} was modified by someone else, reload and retry",
            kind.entity_name(),
            id
        )));
    }
    *status = Some(target);
    *updated_at = next_modification(*updated_at);
    Ok(StatusStamp {
        status: *status,
        updated_at: *updated_at,
    })
}

#[async_trait]
impl RequestRepository for InMemoryRequestRepository {
    async fn insert_concrete(&self, request: ConcreteRequest) -> DomainResult<ConcreteRequest> {
        match self.concrete.entry(request.id.clone()) {
            Entry::Occupied(_) => Err(DomainError::Conflict(format!(
                "ConcreteRequest {} already exists",
                request.id
            ))),
            Entry::Vacant(slot) => Ok(slot.insert(request).value().clone()),
        }
    }

    async fn insert_steel(&self, request: SteelRequest) -> DomainResult<SteelRequest> {
        match self.steel.entry(request.id.clone()) {
            Entry::Occupied(_) => Err(DomainError::Conflict(format!(
                "SteelRequest {} already exists",
                request.id
            ))),
            Entry::Vacant(slot) => Ok(slot.insert(request).value().clone()),
        }
    }

    async fn list_concrete(&self, query: RequestQuery<'_>) -> DomainResult<PaginatedResult<ConcreteRequest>> {
        let mut items: Vec<ConcreteRequest> = self
            .concrete
            .iter()
            .filter(|r| query_matches(&r.owner_id, r.status, &query))
            .map(|r| r.value().clone())
            .collect();
        newest_first(&mut items, |r| (r.created_at, r.id.clone()));
        Ok(PaginatedResult::from_ordered(items, query.window))
    }

    async fn list_steel(&self, query: RequestQuery<'_>) -> DomainResult<PaginatedResult<SteelRequest>> {
        let mut items: Vec<SteelRequest> = self
            .steel
            .iter()
            .filter(|r| query_matches(&r.owner_id, r.status, &query))
            .map(|r| r.value().clone())
            .collect();
        newest_first(&mut items, |r| (r.created_at, r.id.clone()));
        Ok(PaginatedResult::from_ordered(items, query.window))
    }

    async fn status_counts(&self, kind: RequestKind, owner_id: Option<&str>) -> DomainResult<StatusCounts> {
        let owned = |record_owner: &str| owner_id.map_or(true, |owner| owner == record_owner);
        let mut counts = StatusCounts::default();
        match kind {
            RequestKind::Concrete => self
                .concrete
                .iter()
                .filter(|r| owned(&r.owner_id))
                .for_each(|r| counts.add(r.status, 1)),
            RequestKind::Steel => self
                .steel
                .iter()
                .filter(|r| owned(&r.owner_id))
                .for_each(|r| counts.add(r.status, 1)),
        }
        Ok(counts)
    }

    async fn update_status(
        &self,
        kind: RequestKind,
        id: &str,
        status: RequestStatus,
        expected_updated_at: Option<DateTime<Utc>>,
    ) -> DomainResult<StatusStamp> {
        let not_found = || DomainError::not_found(kind.entity_name(), "id", id);
        match kind {
            RequestKind::Concrete => {
                let mut record = self.concrete.get_mut(id).ok_or_else(not_found)?;
                let record = &mut *record;
                swap_status(kind, id, &mut record.status, &mut record.updated_at, status, expected_updated_at)
            }
            RequestKind::Steel => {
                let mut record = self.steel.get_mut(id).ok_or_else(not_found)?;
                let record = &mut *record;
                swap_status(kind, id, &mut record.status, &mut record.updated_at, status, expected_updated_at)
            }
        }
    }
}

// ── Provider ────────────────────────────────────────────────────

/// Repository provider that keeps everything in process memory.
#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    users: InMemoryUserRepository,
    requests: InMemoryRequestRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn users(&self) -> &dyn UserRepositoryInterface {
        &self.users
    }

    fn requests(&self) -> &dyn RequestRepository {
        &self.requests
    }
}

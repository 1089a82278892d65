use std::sync::Arc;

use tracing::info;

use super::OwnRequestStats;
use crate::application::access::require_user;
use crate::application::session::Session;
use crate::domain::request::{
    ConcreteRequest, ContactSnapshot, CraneRequirement, NewConcreteRequest, NewSteelRequest,
    RequestKind, RequestQuery, RequestRecord, RequestStatus, SteelRequest, SurfaceTreatment,
    DEFAULT_PAINT_THICKNESS,
};
use crate::domain::{DomainResult, RepositoryProvider, User};
use crate::shared::{non_blank, now_micros, PageRequest, PaginatedResult};

fn contact_of(owner: &User) -> ContactSnapshot {
    ContactSnapshot {
        contact_person: Some(owner.display_contact()),
        email: owner.email.clone(),
        phone: owner.profile.phone.clone(),
    }
}

/// Buyer-facing side of the request lifecycle
pub struct SubmissionService {
    repos: Arc<dyn RepositoryProvider>,
}

impl SubmissionService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Validate and store a concrete formwork request owned by the session user.
    pub async fn submit_concrete(&self, session: &Session, input: NewConcreteRequest) -> DomainResult<ConcreteRequest> {
        input.validate()?;
        let owner = require_user(self.repos.as_ref(), Some(session)).await?;

        let now = now_micros();
        let record = ConcreteRequest {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner.id.clone(),
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            items: input.items,
            material: input.material.trim().to_string(),
            project_location: input.project_location.trim().to_string(),
            deadline: input.deadline,
            status: Some(RequestStatus::INITIAL),
            contact: contact_of(&owner),
            created_at: now,
            updated_at: now,
        };

        let saved = self.repos.requests().insert_concrete(record).await?;
        info!(request_id = %saved.id, kind = %RequestKind::Concrete, owner_id = %saved.owner_id, "Request submitted");
        Ok(saved)
    }

    /// Validate and store a steel structure request owned by the session user.
    pub async fn submit_steel(&self, session: &Session, input: NewSteelRequest) -> DomainResult<SteelRequest> {
        input.validate()?;
        let owner = require_user(self.repos.as_ref(), Some(session)).await?;

        let project_name = non_blank(input.project_name.clone())
            .unwrap_or_else(|| input.default_project_name());

        let now = now_micros();
        let record = SteelRequest {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner.id.clone(),
            project_name,
            dimensions: input.dimensions,
            has_drawing: input.has_drawing,
            usage: input.usage.trim().to_string(),
            project_location: input.project_location.trim().to_string(),
            crane: CraneRequirement::new(input.needs_crane, input.crane_tonnage),
            foundation: input.foundation,
            surface: SurfaceTreatment {
                sandblast: input.sandblast,
                paint_type: non_blank(input.paint_type),
                paint_thickness: input.paint_thickness.unwrap_or(DEFAULT_PAINT_THICKNESS),
            },
            buyer_responsibilities: input.buyer_responsibilities,
            estimated_weight: input.estimated_weight,
            price_type: input.price_type,
            structure_type: non_blank(input.structure_type),
            roof_type: non_blank(input.roof_type),
            special_requirements: non_blank(input.special_requirements),
            delivery_date: input.delivery_date,
            status: Some(RequestStatus::INITIAL),
            contact: contact_of(&owner),
            created_at: now,
            updated_at: now,
        };

        let saved = self.repos.requests().insert_steel(record).await?;
        info!(request_id = %saved.id, kind = %RequestKind::Steel, owner_id = %saved.owner_id, "Request submitted");
        Ok(saved)
    }

    /// The caller's own requests, newest first.
    ///
    /// Without a kind both collections are merged; each side is read only as
    /// far as the requested page reaches.
    pub async fn list_own(
        &self,
        session: &Session,
        kind: Option<RequestKind>,
        window: PageRequest,
    ) -> DomainResult<PaginatedResult<RequestRecord>> {
        let requests = self.repos.requests();
        let owner = session.user_id.as_str();

        match kind {
            Some(RequestKind::Concrete) => Ok(requests
                .list_concrete(RequestQuery::owned_by(owner, window))
                .await?
                .map(RequestRecord::Concrete)),
            Some(RequestKind::Steel) => Ok(requests
                .list_steel(RequestQuery::owned_by(owner, window))
                .await?
                .map(RequestRecord::Steel)),
            None => {
                let reach = PageRequest::new(1, window.page.saturating_mul(window.page_size));
                let concrete = requests.list_concrete(RequestQuery::owned_by(owner, reach)).await?;
                let steel = requests.list_steel(RequestQuery::owned_by(owner, reach)).await?;

                let total = concrete.total + steel.total;
                let mut merged: Vec<RequestRecord> = concrete
                    .items
                    .into_iter()
                    .map(RequestRecord::Concrete)
                    .chain(steel.items.into_iter().map(RequestRecord::Steel))
                    .collect();
                merged.sort_by(|a, b| {
                    (b.created_at(), b.id()).cmp(&(a.created_at(), a.id()))
                });

                let items = merged
                    .into_iter()
                    .skip(window.offset() as usize)
                    .take(window.page_size as usize)
                    .collect();
                Ok(PaginatedResult::new(items, total, window.page, window.page_size))
            }
        }
    }

    /// Counters over the caller's own requests of both kinds.
    pub async fn own_stats(&self, session: &Session) -> DomainResult<OwnRequestStats> {
        let requests = self.repos.requests();
        let owner = Some(session.user_id.as_str());
        Ok(OwnRequestStats {
            concrete: requests.status_counts(RequestKind::Concrete, owner).await?,
            steel: requests.status_counts(RequestKind::Steel, owner).await?,
        })
    }
}

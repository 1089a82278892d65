//! SeaORM implementation of RequestRepository

use std::collections::BTreeSet;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::{debug, warn};

use crate::domain::request::{
    ConcreteRequest, ContactSnapshot, CraneRequirement, Dimensions, RequestKind, RequestQuery,
    RequestRepository, RequestStatus, StatusCounts, StatusStamp, SteelRequest, SurfaceTreatment,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{concrete_request, steel_request};
use crate::shared::{next_modification, PaginatedResult};

pub struct SeaOrmRequestRepository {
    db: DatabaseConnection,
}

impl SeaOrmRequestRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn tags_to_json<'a>(tags: impl Iterator<Item = &'a str>) -> DomainResult<String> {
    Ok(serde_json::to_string(&tags.collect::<Vec<_>>())?)
}

fn json_to_tags<T: FromStr + Ord>(raw: &str, column: &str) -> BTreeSet<T> {
    let values: Vec<String> = serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!(column, error = %e, "Unreadable tag list, treating as empty");
        Vec::new()
    });
    values.iter().filter_map(|v| v.parse().ok()).collect()
}

fn stored_status(raw: Option<String>) -> Option<RequestStatus> {
    raw.as_deref().and_then(RequestStatus::from_stored)
}

fn concrete_to_domain(m: concrete_request::Model) -> ConcreteRequest {
    ConcreteRequest {
        items: json_to_tags(&m.items, "items"),
        status: stored_status(m.status),
        contact: ContactSnapshot {
            contact_person: m.contact_person,
            email: m.contact_email,
            phone: m.contact_phone,
        },
        id: m.id,
        owner_id: m.owner_id,
        title: m.title,
        description: m.description,
        material: m.material,
        project_location: m.project_location,
        deadline: m.deadline,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn steel_to_domain(m: steel_request::Model) -> SteelRequest {
    SteelRequest {
        dimensions: Dimensions {
            length: m.length,
            width: m.width,
            height: m.height,
        },
        crane: CraneRequirement::new(m.needs_crane, m.crane_tonnage),
        surface: SurfaceTreatment {
            sandblast: m.sandblast,
            paint_type: m.paint_type,
            paint_thickness: m.paint_thickness.max(0) as u32,
        },
        buyer_responsibilities: json_to_tags(&m.buyer_responsibilities, "buyer_responsibilities"),
        price_type: m.price_type.parse().unwrap_or_default(),
        status: stored_status(m.status),
        contact: ContactSnapshot {
            contact_person: m.contact_person,
            email: m.contact_email,
            phone: m.contact_phone,
        },
        id: m.id,
        owner_id: m.owner_id,
        project_name: m.project_name,
        has_drawing: m.has_drawing,
        usage: m.usage,
        project_location: m.project_location,
        foundation: m.foundation,
        estimated_weight: m.estimated_weight,
        structure_type: m.structure_type,
        roof_type: m.roof_type,
        special_requirements: m.special_requirements,
        delivery_date: m.delivery_date,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

/// Matches every stored spelling of `status`.
///
/// Pending is the complement of the other states, so NULL and unrecognised
/// spellings land in the same bucket `StatusCounts` puts them in.
fn status_condition<C: ColumnTrait>(column: C, status: RequestStatus) -> Condition {
    if status != RequestStatus::Pending {
        return Condition::all().add(column.is_in(status.stored_spellings().iter().copied()));
    }
    let decided = RequestStatus::ALL
        .into_iter()
        .filter(|s| *s != RequestStatus::Pending)
        .flat_map(|s| s.stored_spellings().iter().copied());
    Condition::any()
        .add(column.is_null())
        .add(column.is_not_in(decided))
}

// ── Status operations shared by both tables ─────────────────────

#[derive(Clone, Copy)]
struct StatusColumns<C> {
    id: C,
    owner_id: C,
    status: C,
    updated_at: C,
}

async fn count_by_status<E>(
    db: &DatabaseConnection,
    cols: StatusColumns<E::Column>,
    owner_id: Option<&str>,
) -> DomainResult<StatusCounts>
where
    E: EntityTrait,
{
    let mut select = E::find();
    if let Some(owner_id) = owner_id {
        select = select.filter(cols.owner_id.eq(owner_id));
    }
    let groups: Vec<(Option<String>, i64)> = select
        .select_only()
        .column(cols.status)
        .column_as(cols.id.count(), "count")
        .group_by(cols.status)
        .into_tuple()
        .all(db)
        .await?;

    Ok(StatusCounts::from_groups(
        groups.into_iter().map(|(status, n)| (status, n.max(0) as u64)),
    ))
}

async fn write_status<E>(
    db: &DatabaseConnection,
    kind: RequestKind,
    cols: StatusColumns<E::Column>,
    id: &str,
    status: RequestStatus,
    expected_updated_at: Option<DateTime<Utc>>,
) -> DomainResult<StatusStamp>
where
    E: EntityTrait,
{
    let current: Option<DateTime<Utc>> = E::find()
        .select_only()
        .column(cols.updated_at)
        .filter(cols.id.eq(id))
        .into_tuple()
        .one(db)
        .await?;

    let Some(current) = current else {
        return Err(DomainError::not_found(kind.entity_name(), "id", id));
    };

    if let Some(expected) = expected_updated_at {
        if expected != current {
            return Err(stale(kind, id));
        }
    }

    let modified = next_modification(current);
    let mut update = E::update_many()
        .col_expr(cols.status, Expr::value(status.as_str()))
        .col_expr(cols.updated_at, Expr::value(modified))
        .filter(cols.id.eq(id));
    if expected_updated_at.is_some() {
        update = update.filter(cols.updated_at.eq(current));
    }

    let result = update.exec(db).await?;
    if result.rows_affected == 0 {
        return Err(stale(kind, id));
    }

    debug!(%kind, id, status = %status, "Status written");
    Ok(StatusStamp {
        status: Some(status),
        updated_at: modified,
    })
}

fn stale(kind: RequestKind, id: &str) -> DomainError {
    DomainError::Conflict(format!(
        "{} {} was modified by someone else, reload and retry",
        kind.entity_name(),
        id
    ))
}

const CONCRETE_COLUMNS: StatusColumns<concrete_request::Column> = StatusColumns {
    id: concrete_request::Column::Id,
    owner_id: concrete_request::Column::OwnerId,
    status: concrete_request::Column::Status,
    updated_at: concrete_request::Column::UpdatedAt,
};

const STEEL_COLUMNS: StatusColumns<steel_request::Column> = StatusColumns {
    id: steel_request::Column::Id,
    owner_id: steel_request::Column::OwnerId,
    status: steel_request::Column::Status,
    updated_at: steel_request::Column::UpdatedAt,
};

// ── RequestRepository impl ──────────────────────────────────────

#[async_trait]
impl RequestRepository for SeaOrmRequestRepository {
    async fn insert_concrete(&self, r: ConcreteRequest) -> DomainResult<ConcreteRequest> {
        let model = concrete_request::ActiveModel {
            id: Set(r.id),
            owner_id: Set(r.owner_id),
            title: Set(r.title),
            description: Set(r.description),
            items: Set(tags_to_json(r.items.iter().map(|i| i.as_str()))?),
            material: Set(r.material),
            project_location: Set(r.project_location),
            deadline: Set(r.deadline),
            status: Set(r.status.map(|s| s.as_str().to_string())),
            contact_person: Set(r.contact.contact_person),
            contact_email: Set(r.contact.email),
            contact_phone: Set(r.contact.phone),
            created_at: Set(r.created_at),
            updated_at: Set(r.updated_at),
        };

        let saved = model.insert(&self.db).await?;
        Ok(concrete_to_domain(saved))
    }

    async fn insert_steel(&self, r: SteelRequest) -> DomainResult<SteelRequest> {
        let model = steel_request::ActiveModel {
            id: Set(r.id),
            owner_id: Set(r.owner_id),
            project_name: Set(r.project_name),
            length: Set(r.dimensions.length),
            width: Set(r.dimensions.width),
            height: Set(r.dimensions.height),
            has_drawing: Set(r.has_drawing),
            usage: Set(r.usage),
            project_location: Set(r.project_location),
            needs_crane: Set(r.crane.required),
            crane_tonnage: Set(r.crane.tonnage),
            foundation: Set(r.foundation),
            sandblast: Set(r.surface.sandblast),
            paint_type: Set(r.surface.paint_type),
            paint_thickness: Set(r.surface.paint_thickness.min(i32::MAX as u32) as i32),
            buyer_responsibilities: Set(tags_to_json(
                r.buyer_responsibilities.iter().map(|b| b.as_str()),
            )?),
            estimated_weight: Set(r.estimated_weight),
            price_type: Set(r.price_type.as_str().to_string()),
            structure_type: Set(r.structure_type),
            roof_type: Set(r.roof_type),
            special_requirements: Set(r.special_requirements),
            delivery_date: Set(r.delivery_date),
            status: Set(r.status.map(|s| s.as_str().to_string())),
            contact_person: Set(r.contact.contact_person),
            contact_email: Set(r.contact.email),
            contact_phone: Set(r.contact.phone),
            created_at: Set(r.created_at),
            updated_at: Set(r.updated_at),
        };

        let saved = model.insert(&self.db).await?;
        Ok(steel_to_domain(saved))
    }

    async fn list_concrete(&self, query: RequestQuery<'_>) -> DomainResult<PaginatedResult<ConcreteRequest>> {
        let mut select = concrete_request::Entity::find();
        if let Some(owner_id) = query.owner_id {
            select = select.filter(concrete_request::Column::OwnerId.eq(owner_id));
        }
        if let Some(status) = query.status {
            select = select.filter(status_condition(concrete_request::Column::Status, status));
        }
        let select = select
            .order_by_desc(concrete_request::Column::CreatedAt)
            .order_by_desc(concrete_request::Column::Id);

        let total = select.clone().count(&self.db).await?;
        let models = select
            .offset(query.window.offset())
            .limit(query.window.page_size as u64)
            .all(&self.db)
            .await?;

        Ok(PaginatedResult::new(
            models.into_iter().map(concrete_to_domain).collect(),
            total,
            query.window.page,
            query.window.page_size,
        ))
    }

    async fn list_steel(&self, query: RequestQuery<'_>) -> DomainResult<PaginatedResult<SteelRequest>> {
        let mut select = steel_request::Entity::find();
        if let Some(owner_id) = query.owner_id {
            select = select.filter(steel_request::Column::OwnerId.eq(owner_id));
        }
        if let Some(status) = query.status {
            select = select.filter(status_condition(steel_request::Column::Status, status));
        }
        let select = select
            .order_by_desc(steel_request::Column::CreatedAt)
            .order_by_desc(steel_request::Column::Id);

        let total = select.clone().count(&self.db).await?;
        let models = select
            .offset(query.window.offset())
            .limit(query.window.page_size as u64)
            .all(&self.db)
            .await?;

        Ok(PaginatedResult::new(
            models.into_iter().map(steel_to_domain).collect(),
            total,
            query.window.page,
            query.window.page_size,
        ))
    }

    async fn status_counts(&self, kind: RequestKind, owner_id: Option<&str>) -> DomainResult<StatusCounts> {
        match kind {
            RequestKind::Concrete => {
                count_by_status::<concrete_request::Entity>(&self.db, CONCRETE_COLUMNS, owner_id).await
            }
            RequestKind::Steel => {
                count_by_status::<steel_request::Entity>(&self.db, STEEL_COLUMNS, owner_id).await
            }
        }
    }

    async fn update_status(
        &self,
        kind: RequestKind,
        id: &str,
        status: RequestStatus,
        expected_updated_at: Option<DateTime<Utc>>,
    ) -> DomainResult<StatusStamp> {
        match kind {
            RequestKind::Concrete => {
                write_status::<concrete_request::Entity>(
                    &self.db,
                    kind,
                    CONCRETE_COLUMNS,
                    id,
                    status,
                    expected_updated_at,
                )
                .await
            }
            RequestKind::Steel => {
                write_status::<steel_request::Entity>(
                    &self.db,
                    kind,
                    STEEL_COLUMNS,
                    id,
                    status,
                    expected_updated_at,
                )
                .await
            }
        }
    }
}

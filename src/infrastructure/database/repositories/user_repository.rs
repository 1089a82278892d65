//! SeaORM implementation of UserRepositoryInterface

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::domain::user::{CreateUserDto, GetUserDto, Profile, UpdateProfileDto};
use crate::domain::{DomainError, DomainResult, User, UserRepositoryInterface, UserRole};
use crate::infrastructure::database::entities::user;
use crate::shared::{next_modification, now_micros, PaginatedResult};

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_role_to_domain(role: user::UserRole) -> UserRole {
    match role {
        user::UserRole::Buyer => UserRole::Buyer,
        user::UserRole::Seller => UserRole::Seller,
        user::UserRole::Admin => UserRole::Admin,
    }
}

fn domain_role_to_entity(role: UserRole) -> user::UserRole {
    match role {
        UserRole::Buyer => user::UserRole::Buyer,
        UserRole::Seller => user::UserRole::Seller,
        UserRole::Admin => user::UserRole::Admin,
    }
}

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        role: entity_role_to_domain(model.role),
        profile: Profile {
            company_name: model.company_name,
            contact_person: model.contact_person,
            phone: model.phone,
            position: model.position,
            seller_type: model.seller_type.as_deref().and_then(|s| s.parse().ok()),
        },
        created_at: model.created_at,
        updated_at: model.updated_at,
        last_login_at: model.last_login_at,
    }
}

fn unique_violation(e: DbErr) -> DomainError {
    let text = e.to_string();
    if text.contains("UNIQUE") || text.contains("duplicate") {
        DomainError::Conflict("Email is already registered".to_string())
    } else {
        e.into()
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let now = now_micros();
        let profile = dto.profile;

        let new_user = user::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            email: Set(dto.email),
            password_hash: Set(dto.password_hash),
            role: Set(domain_role_to_entity(dto.role)),
            company_name: Set(profile.company_name),
            contact_person: Set(profile.contact_person),
            phone: Set(profile.phone),
            position: Set(profile.position),
            seller_type: Set(profile.seller_type.map(|t| t.as_str().to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            last_login_at: Set(None),
        };

        let model = new_user.insert(&self.db).await.map_err(unique_violation)?;
        Ok(user_model_to_domain(model))
    }

    async fn list_users(&self, dto: GetUserDto) -> DomainResult<PaginatedResult<User>> {
        let mut query = user::Entity::find();

        if let Some(ref search) = dto.search {
            query = query.filter(
                Condition::any()
                    .add(user::Column::Email.contains(search))
                    .add(user::Column::CompanyName.contains(search)),
            );
        }

        if let Some(role) = dto.role {
            query = query.filter(user::Column::Role.eq(domain_role_to_entity(role)));
        }

        let query = query.order_by_desc(user::Column::CreatedAt);
        let total = query.clone().count(&self.db).await?;

        let models = query
            .offset(dto.window.offset())
            .limit(dto.window.page_size as u64)
            .all(&self.db)
            .await?;

        let items = models.into_iter().map(user_model_to_domain).collect();
        Ok(PaginatedResult::new(
            items,
            total,
            dto.window.page,
            dto.window.page_size,
        ))
    }

    async fn count_users(&self) -> DomainResult<u64> {
        Ok(user::Entity::find().count(&self.db).await?)
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(model.map(user_model_to_domain))
    }

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(user_model_to_domain))
    }

    async fn update_profile(&self, id: &str, dto: UpdateProfileDto) -> DomainResult<Option<User>> {
        let Some(existing) = user::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let modified = next_modification(existing.updated_at);
        let mut active: user::ActiveModel = existing.into();

        if let Some(company_name) = dto.company_name {
            active.company_name = Set(Some(company_name));
        }
        if let Some(contact_person) = dto.contact_person {
            active.contact_person = Set(Some(contact_person));
        }
        if let Some(phone) = dto.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(position) = dto.position {
            active.position = Set(Some(position));
        }
        active.updated_at = Set(modified);

        let updated = active.update(&self.db).await?;
        Ok(Some(user_model_to_domain(updated)))
    }

    async fn update_role(&self, id: &str, role: UserRole) -> DomainResult<Option<User>> {
        let Some(existing) = user::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let modified = next_modification(existing.updated_at);
        let mut active: user::ActiveModel = existing.into();
        active.role = Set(domain_role_to_entity(role));
        active.updated_at = Set(modified);

        let updated = active.update(&self.db).await?;
        Ok(Some(user_model_to_domain(updated)))
    }

    async fn touch_last_login(&self, id: &str) -> DomainResult<()> {
        user::Entity::update_many()
            .col_expr(user::Column::LastLoginAt, Expr::value(now_micros()))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

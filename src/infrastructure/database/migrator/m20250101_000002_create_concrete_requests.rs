//! Create concrete_requests table migration

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ConcreteRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ConcreteRequests::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ConcreteRequests::OwnerId).string().not_null())
                    .col(ColumnDef::new(ConcreteRequests::Title).string_len(255).not_null())
                    .col(ColumnDef::new(ConcreteRequests::Description).text().not_null())
                    .col(
                        ColumnDef::new(ConcreteRequests::Items)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(ConcreteRequests::Material).string_len(255).not_null())
                    .col(
                        ColumnDef::new(ConcreteRequests::ProjectLocation)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ConcreteRequests::Deadline).date().not_null())
                    .col(ColumnDef::new(ConcreteRequests::Status).string_len(20).null())
                    .col(ColumnDef::new(ConcreteRequests::ContactPerson).string_len(255).null())
                    .col(
                        ColumnDef::new(ConcreteRequests::ContactEmail)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ConcreteRequests::ContactPhone).string_len(50).null())
                    .col(
                        ColumnDef::new(ConcreteRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ConcreteRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_concrete_requests_owner_id")
                            .from(ConcreteRequests::Table, ConcreteRequests::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_concrete_requests_owner_id", ConcreteRequests::OwnerId),
            ("idx_concrete_requests_status", ConcreteRequests::Status),
            ("idx_concrete_requests_created_at", ConcreteRequests::CreatedAt),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(ConcreteRequests::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ConcreteRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ConcreteRequests {
    Table,
    Id,
    OwnerId,
    Title,
    Description,
    Items,
    Material,
    ProjectLocation,
    Deadline,
    Status,
    ContactPerson,
    ContactEmail,
    ContactPhone,
    CreatedAt,
    UpdatedAt,
}

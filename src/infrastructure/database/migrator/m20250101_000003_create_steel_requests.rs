//! Create steel_requests table migration

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
                    .table(SteelRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SteelRequests::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SteelRequests::OwnerId).string().not_null())
                    .col(ColumnDef::new(SteelRequests::ProjectName).string_len(255).not_null())
                    .col(ColumnDef::new(SteelRequests::Length).double().not_null())
                    .col(ColumnDef::new(SteelRequests::Width).double().not_null())
                    .col(ColumnDef::new(SteelRequests::Height).double().not_null())
                    .col(
                        ColumnDef::new(SteelRequests::HasDrawing)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(SteelRequests::Usage).text().not_null())
                    .col(
                        ColumnDef::new(SteelRequests::ProjectLocation)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SteelRequests::NeedsCrane)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(SteelRequests::CraneTonnage).double().null())
                    .col(
                        ColumnDef::new(SteelRequests::Foundation)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SteelRequests::Sandblast)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(SteelRequests::PaintType).string_len(100).null())
                    .col(
                        ColumnDef::new(SteelRequests::PaintThickness)
                            .integer()
                            .not_null()
                            .default(50),
                    )
                    .col(
                        ColumnDef::new(SteelRequests::BuyerResponsibilities)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(SteelRequests::EstimatedWeight).double().null())
                    .col(
                        ColumnDef::new(SteelRequests::PriceType)
                            .string_len(20)
                            .not_null()
                            .default("estimated"),
                    )
                    .col(ColumnDef::new(SteelRequests::StructureType).string_len(100).null())
                    .col(ColumnDef::new(SteelRequests::RoofType).string_len(100).null())
                    .col(ColumnDef::new(SteelRequests::SpecialRequirements).text().null())
                    .col(ColumnDef::new(SteelRequests::DeliveryDate).date().null())
                    .col(ColumnDef::new(SteelRequests::Status).string_len(20).null())
                    .col(ColumnDef::new(SteelRequests::ContactPerson).string_len(255).null())
                    .col(
                        ColumnDef::new(SteelRequests::ContactEmail)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(SteelRequests::ContactPhone).string_len(50).null())
                    .col(
                        ColumnDef::new(SteelRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SteelRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_steel_requests_owner_id")
                            .from(SteelRequests::Table, SteelRequests::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_steel_requests_owner_id", SteelRequests::OwnerId),
            ("idx_steel_requests_status", SteelRequests::Status),
            ("idx_steel_requests_created_at", SteelRequests::CreatedAt),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(SteelRequests::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SteelRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum SteelRequests {
    Table,
    Id,
    OwnerId,
    ProjectName,
    Length,
    Width,
    Height,
    HasDrawing,
    Usage,
    ProjectLocation,
    NeedsCrane,
    CraneTonnage,
    Foundation,
    Sandblast,
    PaintType,
    PaintThickness,
    BuyerResponsibilities,
    EstimatedWeight,
    PriceType,
    StructureType,
    RoofType,
    SpecialRequirements,
    DeliveryDate,
    Status,
    ContactPerson,
    ContactEmail,
    ContactPhone,
    CreatedAt,
    UpdatedAt,
}

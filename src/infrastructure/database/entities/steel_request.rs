//! Steel structure request entity

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "steel_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: String,
    pub project_name: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub has_drawing: bool,
    #[sea_orm(column_type = "Text")]
    pub usage: String,
    pub project_location: String,
    pub needs_crane: bool,
    pub crane_tonnage: Option<f64>,
    pub foundation: bool,
    pub sandblast: bool,
    pub paint_type: Option<String>,
    pub paint_thickness: i32,
    #[sea_orm(column_type = "Text")]
    pub buyer_responsibilities: String, // JSON array
    pub estimated_weight: Option<f64>,
    pub price_type: String,
    pub structure_type: Option<String>,
    pub roof_type: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub special_requirements: Option<String>,
    pub delivery_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub contact_person: Option<String>,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Request DTOs

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::request::{
    ContactSnapshot, Dimensions, NewConcreteRequest, NewSteelRequest, PriceType,
};
use crate::application::OwnRequestStats;
use crate::domain::{ConcreteRequest, DomainResult, RequestRecord, SteelRequest};
use crate::interfaces::http::modules::admin::StatusCountsDto;
use crate::interfaces::http::common::serde_helpers::{lenient_number, yes_no};

fn parse_set<T: FromStr<Err = crate::domain::DomainError> + Ord>(raw: &[String]) -> DomainResult<BTreeSet<T>> {
    raw.iter().map(|s| s.parse()).collect()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateConcreteRequestBody {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    /// Formwork categories, e.g. `modular`, `tunnelform`, `round_column`
    #[validate(length(min = 1, message = "Select at least one item"))]
    pub items: Vec<String>,
    #[validate(length(min = 1, max = 255, message = "Material is required"))]
    pub material: String,
    #[validate(length(min = 1, max = 255, message = "Project location is required"))]
    pub project_location: String,
    #[schema(value_type = String, format = Date, example = "2026-03-01")]
    pub deadline: NaiveDate,
}

impl CreateConcreteRequestBody {
    pub fn into_input(self) -> DomainResult<NewConcreteRequest> {
        Ok(NewConcreteRequest {
            items: parse_set(&self.items)?,
            title: self.title,
            description: self.description,
            material: self.material,
            project_location: self.project_location,
            deadline: self.deadline,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSteelRequestBody {
    /// Defaults to `Shed {length}x{width}`
    #[validate(length(max = 255))]
    pub project_name: Option<String>,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, deserialize_with = "yes_no")]
    #[schema(value_type = bool)]
    pub has_drawing: bool,
    #[validate(length(min = 1, message = "Usage is required"))]
    pub usage: String,
    #[validate(length(min = 1, max = 255, message = "Project location is required"))]
    pub project_location: String,
    #[serde(default, deserialize_with = "yes_no")]
    #[schema(value_type = bool)]
    pub needs_crane: bool,
    /// Ignored unless `needs_crane`; unreadable text reads as absent
    #[serde(default, deserialize_with = "lenient_number")]
    #[schema(value_type = Option<f64>)]
    pub crane_tonnage: Option<f64>,
    #[serde(default, deserialize_with = "yes_no")]
    #[schema(value_type = bool)]
    pub foundation: bool,
    #[serde(default, deserialize_with = "yes_no")]
    #[schema(value_type = bool)]
    pub sandblast: bool,
    pub paint_type: Option<String>,
    /// Micrometres. Default: 50
    pub paint_thickness: Option<u32>,
    /// Subset of `steel`, `bolts`, `transport`
    #[serde(default)]
    pub buyer_responsibilities: Vec<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    #[schema(value_type = Option<f64>)]
    pub estimated_weight: Option<f64>,
    /// `estimated` (default) or `fixed`
    pub price_type: Option<String>,
    pub structure_type: Option<String>,
    pub roof_type: Option<String>,
    pub special_requirements: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub delivery_date: Option<NaiveDate>,
}

impl CreateSteelRequestBody {
    pub fn into_input(self) -> DomainResult<NewSteelRequest> {
        let price_type = match self.price_type.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => PriceType::default(),
        };

        Ok(NewSteelRequest {
            buyer_responsibilities: parse_set(&self.buyer_responsibilities)?,
            project_name: self.project_name,
            dimensions: Dimensions {
                length: self.length,
                width: self.width,
                height: self.height,
            },
            has_drawing: self.has_drawing,
            usage: self.usage,
            project_location: self.project_location,
            needs_crane: self.needs_crane,
            crane_tonnage: if self.needs_crane { self.crane_tonnage } else { None },
            foundation: self.foundation,
            sandblast: self.sandblast,
            paint_type: self.paint_type,
            paint_thickness: self.paint_thickness,
            estimated_weight: self.estimated_weight,
            price_type,
            structure_type: self.structure_type,
            roof_type: self.roof_type,
            special_requirements: self.special_requirements,
            delivery_date: self.delivery_date,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContactDto {
    pub contact_person: Option<String>,
    pub email: String,
    pub phone: Option<String>,
}

impl From<ContactSnapshot> for ContactDto {
    fn from(c: ContactSnapshot) -> Self {
        Self {
            contact_person: c.contact_person,
            email: c.email,
            phone: c.phone,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConcreteRequestDto {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub items: Vec<String>,
    pub material: String,
    pub project_location: String,
    #[schema(value_type = String, format = Date)]
    pub deadline: NaiveDate,
    /// `null` when never set; counted as pending
    pub status: Option<String>,
    pub contact: ContactDto,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ConcreteRequest> for ConcreteRequestDto {
    fn from(r: ConcreteRequest) -> Self {
        Self {
            id: r.id,
            owner_id: r.owner_id,
            title: r.title,
            description: r.description,
            items: r.items.iter().map(|i| i.as_str().to_string()).collect(),
            material: r.material,
            project_location: r.project_location,
            deadline: r.deadline,
            status: r.status.map(|s| s.as_str().to_string()),
            contact: r.contact.into(),
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SteelRequestDto {
    pub id: String,
    pub owner_id: String,
    pub project_name: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub has_drawing: bool,
    pub usage: String,
    pub project_location: String,
    pub needs_crane: bool,
    pub crane_tonnage: Option<f64>,
    pub foundation: bool,
    pub sandblast: bool,
    pub paint_type: Option<String>,
    pub paint_thickness: u32,
    pub buyer_responsibilities: Vec<String>,
    pub estimated_weight: Option<f64>,
    pub price_type: String,
    pub structure_type: Option<String>,
    pub roof_type: Option<String>,
    pub special_requirements: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub delivery_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub contact: ContactDto,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SteelRequest> for SteelRequestDto {
    fn from(r: SteelRequest) -> Self {
        Self {
            id: r.id,
            owner_id: r.owner_id,
            project_name: r.project_name,
            length: r.dimensions.length,
            width: r.dimensions.width,
            height: r.dimensions.height,
            has_drawing: r.has_drawing,
            usage: r.usage,
            project_location: r.project_location,
            needs_crane: r.crane.required,
            crane_tonnage: r.crane.tonnage,
            foundation: r.foundation,
            sandblast: r.surface.sandblast,
            paint_type: r.surface.paint_type,
            paint_thickness: r.surface.paint_thickness,
            buyer_responsibilities: r
                .buyer_responsibilities
                .iter()
                .map(|b| b.as_str().to_string())
                .collect(),
            estimated_weight: r.estimated_weight,
            price_type: r.price_type.as_str().to_string(),
            structure_type: r.structure_type,
            roof_type: r.roof_type,
            special_requirements: r.special_requirements,
            delivery_date: r.delivery_date,
            status: r.status.map(|s| s.as_str().to_string()),
            contact: r.contact.into(),
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Row of the "my requests" table
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OwnRequestDto {
    pub kind: String,
    pub id: String,
    /// Title for concrete, project name for steel
    pub title: String,
    pub summary: String,
    pub project_location: String,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<RequestRecord> for OwnRequestDto {
    fn from(record: RequestRecord) -> Self {
        let kind = record.kind().as_str().to_string();
        let status = record.status().map(|s| s.as_str().to_string());
        match record {
            RequestRecord::Concrete(r) => Self {
                kind,
                id: r.id,
                title: r.title,
                summary: r
                    .items
                    .iter()
                    .map(|i| i.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                project_location: r.project_location,
                status,
                created_at: r.created_at,
            },
            RequestRecord::Steel(r) => Self {
                kind,
                id: r.id,
                title: r.project_name,
                summary: format!(
                    "{}x{}x{} m, {}",
                    r.dimensions.length, r.dimensions.width, r.dimensions.height, r.usage
                ),
                project_location: r.project_location,
                status,
                created_at: r.created_at,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct OwnRequestsParams {
    /// `concrete` or `steel`; both when omitted
    pub kind: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// The buyer dashboard counters
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OwnStatsDto {
    pub total: u64,
    /// Includes requests whose status was never set
    pub pending: u64,
    pub completed: u64,
    pub concrete: StatusCountsDto,
    pub steel: StatusCountsDto,
}

impl From<OwnRequestStats> for OwnStatsDto {
    fn from(s: OwnRequestStats) -> Self {
        Self {
            total: s.total(),
            pending: s.pending(),
            completed: s.completed(),
            concrete: s.concrete.into(),
            steel: s.steel.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::{FormworkItem, Responsibility};

    #[test]
    fn concrete_body_parses_item_tags() {
        let body: CreateConcreteRequestBody = serde_json::from_value(serde_json::json!({
            "title": "Tower B",
            "description": "Core walls",
            "items": ["modular", "round_column", "modular"],
            "material": "steel",
            "project_location": "Tehran",
            "deadline": "2026-03-01"
        }))
        .unwrap();

        let input = body.into_input().unwrap();
        assert_eq!(
            input.items,
            BTreeSet::from([FormworkItem::Modular, FormworkItem::RoundColumn])
        );
    }

    #[test]
    fn unknown_item_tag_is_a_validation_error() {
        let body: CreateConcreteRequestBody = serde_json::from_value(serde_json::json!({
            "title": "t", "description": "d", "items": ["bamboo"],
            "material": "m", "project_location": "p", "deadline": "2026-03-01"
        }))
        .unwrap();
        assert!(matches!(
            body.into_input(),
            Err(crate::domain::DomainError::Validation(_))
        ));
    }

    #[test]
    fn steel_body_accepts_form_style_flags() {
        let body: CreateSteelRequestBody = serde_json::from_value(serde_json::json!({
            "length": 20.0, "width": 10.0, "height": 6.0,
            "usage": "warehouse", "project_location": "Isfahan",
            "needs_crane": "no", "crane_tonnage": 5.0,
            "foundation": "yes",
            "buyer_responsibilities": ["bolts", "transport"]
        }))
        .unwrap();

        let input = body.into_input().unwrap();
        assert!(!input.needs_crane);
        assert!(input.foundation);
        assert_eq!(input.price_type, PriceType::Estimated);
        assert!(input.buyer_responsibilities.contains(&Responsibility::Bolts));
    }

    #[test]
    fn stray_tonnage_text_does_not_reject_the_body() {
        let body = |crane: &str, tonnage: &str| -> CreateSteelRequestBody {
            serde_json::from_value(serde_json::json!({
                "length": 20.0, "width": 10.0, "height": 6.0,
                "usage": "warehouse", "project_location": "Isfahan",
                "needs_crane": crane, "crane_tonnage": tonnage
            }))
            .unwrap()
        };

        assert_eq!(body("no", "").into_input().unwrap().crane_tonnage, None);
        assert_eq!(body("no", "25").into_input().unwrap().crane_tonnage, None);
        assert_eq!(body("yes", "abc").into_input().unwrap().crane_tonnage, None);
        assert_eq!(body("yes", "25").into_input().unwrap().crane_tonnage, Some(25.0));
    }
}

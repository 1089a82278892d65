use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};

use super::RequestStatus;
use crate::shared::DomainError;

/// The two request collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Concrete,
    Steel,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Concrete => "concrete",
            RequestKind::Steel => "steel",
        }
    }

    pub fn entity_name(&self) -> &'static str {
        match self {
            RequestKind::Concrete => "ConcreteRequest",
            RequestKind::Steel => "SteelRequest",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "concrete" => Ok(RequestKind::Concrete),
            // "shed" is what the buyer dashboard called steel structures
            "steel" | "shed" => Ok(RequestKind::Steel),
            other => Err(DomainError::validation(format!(
                "Unknown request kind '{}'",
                other
            ))),
        }
    }
}

macro_rules! string_enum {
    ($name:ident, $label:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($text => Ok($name::$variant),)+
                    other => Err(DomainError::validation(format!(
                        concat!("Unknown ", $label, " '{}'"),
                        other
                    ))),
                }
            }
        }
    };
}

/// Formwork categories a concrete request can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormworkItem {
    Modular,
    Special,
    Tunnelform,
    Scaffolding,
    Cuplock,
    Accessories,
    RoundColumn,
    Sliding,
    Climbing,
    Panel,
}

string_enum!(FormworkItem, "formwork item", {
    Modular => "modular",
    Special => "special",
    Tunnelform => "tunnelform",
    Scaffolding => "scaffolding",
    Cuplock => "cuplock",
    Accessories => "accessories",
    RoundColumn => "round_column",
    Sliding => "sliding",
    Climbing => "climbing",
    Panel => "panel",
});

/// What the buyer supplies themselves on a steel structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Responsibility {
    Steel,
    Bolts,
    Transport,
}

string_enum!(Responsibility, "responsibility", {
    Steel => "steel",
    Bolts => "bolts",
    Transport => "transport",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceType {
    #[default]
    Estimated,
    Fixed,
}

string_enum!(PriceType, "price type", {
    Estimated => "estimated",
    Fixed => "fixed",
});

/// Contact details copied from the owner's profile at submission time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSnapshot {
    pub contact_person: Option<String>,
    pub email: String,
    pub phone: Option<String>,
}

/// Shed dimensions in metres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn is_positive(&self) -> bool {
        [self.length, self.width, self.height]
            .iter()
            .all(|d| d.is_finite() && *d > 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CraneRequirement {
    pub required: bool,
    /// Only ever set when `required`
    pub tonnage: Option<f64>,
}

impl CraneRequirement {
    pub fn new(required: bool, tonnage: Option<f64>) -> Self {
        Self {
            required,
            tonnage: if required { tonnage } else { None },
        }
    }
}

pub const DEFAULT_PAINT_THICKNESS: u32 = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceTreatment {
    pub sandblast: bool,
    pub paint_type: Option<String>,
    /// Microns
    pub paint_thickness: u32,
}

impl Default for SurfaceTreatment {
    fn default() -> Self {
        Self {
            sandblast: false,
            paint_type: None,
            paint_thickness: DEFAULT_PAINT_THICKNESS,
        }
    }
}

/// Request for concrete formwork
#[derive(Debug, Clone, PartialEq)]
pub struct ConcreteRequest {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub items: BTreeSet<FormworkItem>,
    pub material: String,
    pub project_location: String,
    pub deadline: NaiveDate,
    /// `None` when the stored record carries no status
    pub status: Option<RequestStatus>,
    pub contact: ContactSnapshot,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request for a prefabricated steel structure (shed)
#[derive(Debug, Clone, PartialEq)]
pub struct SteelRequest {
    pub id: String,
    pub owner_id: String,
    pub project_name: String,
    pub dimensions: Dimensions,
    pub has_drawing: bool,
    pub usage: String,
    pub project_location: String,
    pub crane: CraneRequirement,
    pub foundation: bool,
    pub surface: SurfaceTreatment,
    pub buyer_responsibilities: BTreeSet<Responsibility>,
    pub estimated_weight: Option<f64>,
    pub price_type: PriceType,
    pub structure_type: Option<String>,
    pub roof_type: Option<String>,
    pub special_requirements: Option<String>,
    pub delivery_date: Option<NaiveDate>,
    pub status: Option<RequestStatus>,
    pub contact: ContactSnapshot,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A request of either kind, used where both collections are merged.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestRecord {
    Concrete(ConcreteRequest),
    Steel(SteelRequest),
}

impl RequestRecord {
    pub fn kind(&self) -> RequestKind {
        match self {
            RequestRecord::Concrete(_) => RequestKind::Concrete,
            RequestRecord::Steel(_) => RequestKind::Steel,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            RequestRecord::Concrete(r) => &r.id,
            RequestRecord::Steel(r) => &r.id,
        }
    }

    pub fn status(&self) -> Option<RequestStatus> {
        match self {
            RequestRecord::Concrete(r) => r.status,
            RequestRecord::Steel(r) => r.status,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            RequestRecord::Concrete(r) => r.created_at,
            RequestRecord::Steel(r) => r.created_at,
        }
    }
}

/// Status column of one record after a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusStamp {
    pub status: Option<RequestStatus>,
    pub updated_at: DateTime<Utc>,
}

use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::{Dimensions, FormworkItem, PriceType, RequestStatus, Responsibility};
use crate::shared::{DomainError, DomainResult, PageRequest};

fn require(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Concrete formwork submission as entered by the buyer.
#[derive(Debug, Clone)]
pub struct NewConcreteRequest {
    pub title: String,
    pub description: String,
    pub items: BTreeSet<FormworkItem>,
    pub material: String,
    pub project_location: String,
    pub deadline: NaiveDate,
}

impl NewConcreteRequest {
    pub fn validate(&self) -> DomainResult<()> {
        require("title", &self.title)?;
        require("description", &self.description)?;
        require("material", &self.material)?;
        require("project_location", &self.project_location)?;
        if self.items.is_empty() {
            return Err(DomainError::validation(
                "At least one formwork item must be selected",
            ));
        }
        Ok(())
    }
}

/// Steel structure submission as entered by the buyer.
#[derive(Debug, Clone)]
pub struct NewSteelRequest {
    pub project_name: Option<String>,
    pub dimensions: Dimensions,
    pub has_drawing: bool,
    pub usage: String,
    pub project_location: String,
    pub needs_crane: bool,
    pub crane_tonnage: Option<f64>,
    pub foundation: bool,
    pub sandblast: bool,
    pub paint_type: Option<String>,
    pub paint_thickness: Option<u32>,
    pub buyer_responsibilities: BTreeSet<Responsibility>,
    pub estimated_weight: Option<f64>,
    pub price_type: PriceType,
    pub structure_type: Option<String>,
    pub roof_type: Option<String>,
    pub special_requirements: Option<String>,
    pub delivery_date: Option<NaiveDate>,
}

impl NewSteelRequest {
    pub fn validate(&self) -> DomainResult<()> {
        require("usage", &self.usage)?;
        require("project_location", &self.project_location)?;
        if !self.dimensions.is_positive() {
            return Err(DomainError::validation(
                "Length, width and height must be positive",
            ));
        }
        if self.paint_thickness == Some(0) {
            return Err(DomainError::validation("paint_thickness must be positive"));
        }
        if self.needs_crane {
            if let Some(tonnage) = self.crane_tonnage {
                if !(tonnage.is_finite() && tonnage > 0.0) {
                    return Err(DomainError::validation("crane_tonnage must be positive"));
                }
            }
        }
        if let Some(weight) = self.estimated_weight {
            if !(weight.is_finite() && weight > 0.0) {
                return Err(DomainError::validation("estimated_weight must be positive"));
            }
        }
        Ok(())
    }

    /// Name used when the buyer leaves the project name blank.
    pub fn default_project_name(&self) -> String {
        format!(
            "Shed {}x{}",
            self.dimensions.length, self.dimensions.width
        )
    }
}

/// Listing filter for one request collection.
#[derive(Debug, Clone, Copy)]
pub struct RequestQuery<'a> {
    pub owner_id: Option<&'a str>,
    pub status: Option<RequestStatus>,
    pub window: PageRequest,
}

impl<'a> RequestQuery<'a> {
    pub fn all(window: PageRequest) -> Self {
        Self {
            owner_id: None,
            status: None,
            window,
        }
    }

    pub fn owned_by(owner_id: &'a str, window: PageRequest) -> Self {
        Self {
            owner_id: Some(owner_id),
            status: None,
            window,
        }
    }
}

/// Per-status record counts of one collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: u64,
    /// Includes records whose status is unset
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    pub completed: u64,
}

impl StatusCounts {
    /// Fold `(stored status, count)` groups as returned by a GROUP BY.
    pub fn from_groups<I>(groups: I) -> Self
    where
        I: IntoIterator<Item = (Option<String>, u64)>,
    {
        let mut counts = Self::default();
        for (raw, n) in groups {
            let status = raw.as_deref().and_then(RequestStatus::from_stored);
            counts.add(status, n);
        }
        counts
    }

    pub fn add(&mut self, status: Option<RequestStatus>, n: u64) {
        self.total += n;
        match status {
            None | Some(RequestStatus::Pending) => self.pending += n,
            Some(RequestStatus::Approved) => self.approved += n,
            Some(RequestStatus::Rejected) => self.rejected += n,
            Some(RequestStatus::Completed) => self.completed += n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concrete() -> NewConcreteRequest {
        NewConcreteRequest {
            title: "Tower B slabs".into(),
            description: "Formwork for 12 floors".into(),
            items: BTreeSet::from([FormworkItem::Modular]),
            material: "steel".into(),
            project_location: "Tehran".into(),
            deadline: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        }
    }

    fn steel() -> NewSteelRequest {
        NewSteelRequest {
            project_name: None,
            dimensions: Dimensions { length: 100.0, width: 30.0, height: 8.0 },
            has_drawing: false,
            usage: "warehouse".into(),
            project_location: "Isfahan".into(),
            needs_crane: false,
            crane_tonnage: None,
            foundation: true,
            sandblast: false,
            paint_type: None,
            paint_thickness: None,
            buyer_responsibilities: BTreeSet::new(),
            estimated_weight: None,
            price_type: PriceType::Estimated,
            structure_type: None,
            roof_type: None,
            special_requirements: None,
            delivery_date: None,
        }
    }

    #[test]
    fn concrete_request_needs_an_item() {
        assert!(concrete().validate().is_ok());

        let mut input = concrete();
        input.items.clear();
        assert!(matches!(input.validate(), Err(DomainError::Validation(_))));

        let mut input = concrete();
        input.title = "  ".into();
        assert!(matches!(input.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn steel_request_rejects_bad_numbers() {
        assert!(steel().validate().is_ok());

        let mut input = steel();
        input.dimensions.width = -1.0;
        assert!(input.validate().is_err());

        let mut input = steel();
        input.paint_thickness = Some(0);
        assert!(input.validate().is_err());

        let mut input = steel();
        input.needs_crane = true;
        input.crane_tonnage = Some(0.0);
        assert!(input.validate().is_err());

        // tonnage is ignored without a crane
        let mut input = steel();
        input.crane_tonnage = Some(-5.0);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn default_project_name_uses_footprint() {
        assert_eq!(steel().default_project_name(), "Shed 100x30");
    }

    #[test]
    fn unset_and_legacy_statuses_fold_into_counts() {
        let counts = StatusCounts::from_groups(vec![
            (None, 2),
            (Some("pending".to_string()), 1),
            (Some("open".to_string()), 1),
            (Some("selected".to_string()), 3),
            (Some("closed".to_string()), 1),
            (Some("completed".to_string()), 1),
        ]);
        assert_eq!(counts.total, 9);
        assert_eq!(counts.pending, 4);
        assert_eq!(counts.approved, 3);
        assert_eq!(counts.rejected, 0);
        assert_eq!(counts.completed, 2);
    }
}

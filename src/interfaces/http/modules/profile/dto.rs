use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::user::UpdateProfileDto;

/// Omitted or blank fields keep their stored value.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 255))]
    pub company_name: Option<String>,
    #[validate(length(max = 255))]
    pub contact_person: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(length(max = 255))]
    pub position: Option<String>,
}

impl From<UpdateProfileRequest> for UpdateProfileDto {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            company_name: req.company_name,
            contact_person: req.contact_person,
            phone: req.phone,
            position: req.position,
        }
    }
}

//! College profile models and public search DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::resources::model::{Course, Event, Faculty, GalleryItem, Hostel};
use crate::utils::pagination::PaginationParams;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CollegeProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub college_name: String,
    pub college_code: String,
    pub official_registration_no: Option<String>,
    pub college_type: Option<String>,
    pub established_year: Option<i32>,
    pub accreditation_body: Option<String>,
    pub country: String,
    pub state: String,
    pub district: String,
    pub pin_code: Option<String>,
    pub address: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub about_college: Option<String>,
    pub contact_person: Option<String>,
    pub landline: Option<String>,
    pub verified: bool,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub is_popular: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const COLLEGE_COLUMNS: &str = "id, user_id, college_name, college_code, \
     official_registration_no, college_type, established_year, accreditation_body, \
     country, state, district, pin_code, address, email, phone, website, \
     about_college, contact_person, landline, verified, approved_by, approved_at, \
     is_popular, is_featured, created_at, updated_at";

impl CollegeProfile {
    /// The public surface needs at least a name and a locatable address.
    pub fn is_complete(&self) -> bool {
        !self.college_name.trim().is_empty()
            && !self.country.trim().is_empty()
            && !self.state.trim().is_empty()
            && !self.district.trim().is_empty()
            && !self.address.trim().is_empty()
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCollegeProfileRequest {
    #[validate(length(min = 1, message = "College name cannot be empty"))]
    pub college_name: Option<String>,
    pub official_registration_no: Option<String>,
    pub college_type: Option<String>,
    #[validate(range(min = 1500, max = 2100, message = "Established year is out of range"))]
    pub established_year: Option<i32>,
    pub accreditation_body: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub pin_code: Option<String>,
    pub address: Option<String>,
    #[validate(email(message = "Invalid contact email"))]
    pub email: Option<String>,
    #[validate(length(min = 10, max = 15, message = "Phone number must be 10 to 15 digits"))]
    pub phone: Option<String>,
    #[validate(url(message = "Invalid website URL"))]
    pub website: Option<String>,
    pub about_college: Option<String>,
    pub contact_person: Option<String>,
    pub landline: Option<String>,
}

/// Query parameters for the public college search.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CollegeSearchParams {
    pub country: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub college_type: Option<String>,
    pub accreditation_body: Option<String>,
    /// Matches colleges offering at least one course in this stream.
    pub main_stream: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::pagination::deserialize_optional_bool")]
    pub verified: Option<bool>,
    #[serde(default, deserialize_with = "crate::utils::pagination::deserialize_optional_bool")]
    pub is_popular: Option<bool>,
    #[serde(default, deserialize_with = "crate::utils::pagination::deserialize_optional_bool")]
    pub is_featured: Option<bool>,
    /// Free-text match against name and description.
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Public listing entry; internal ownership and approval fields are elided.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CollegeSummary {
    pub college_code: String,
    pub college_name: String,
    pub college_type: Option<String>,
    pub accreditation_body: Option<String>,
    pub country: String,
    pub state: String,
    pub district: String,
    pub website: Option<String>,
    pub about_college: Option<String>,
    pub verified: bool,
    pub is_popular: bool,
    pub is_featured: bool,
}

pub const COLLEGE_SUMMARY_COLUMNS: &str = "college_code, college_name, college_type, \
     accreditation_body, country, state, district, website, about_college, verified, \
     is_popular, is_featured";

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedCollegesResponse {
    pub data: Vec<CollegeSummary>,
    pub meta: crate::utils::pagination::PaginationMeta,
}

/// Full public view of one college with all of its resources inlined.
#[derive(Debug, Serialize, ToSchema)]
pub struct CollegeDetailResponse {
    #[serde(flatten)]
    pub college: CollegeSummary,
    pub established_year: Option<i32>,
    pub address: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub courses: Vec<Course>,
    pub events: Vec<Event>,
    pub gallery: Vec<GalleryItem>,
    pub faculties: Vec<Faculty>,
    pub hostels: Vec<Hostel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> CollegeProfile {
        CollegeProfile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            college_name: "Crescent Institute".into(),
            college_code: "COL-9F8E7D".into(),
            official_registration_no: None,
            college_type: Some("private".into()),
            established_year: Some(1998),
            accreditation_body: None,
            country: "India".into(),
            state: "Kerala".into(),
            district: "Kollam".into(),
            pin_code: None,
            address: "NH 66, Kollam".into(),
            email: None,
            phone: None,
            website: None,
            about_college: None,
            contact_person: None,
            landline: None,
            verified: false,
            approved_by: None,
            approved_at: None,
            is_popular: false,
            is_featured: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_completion_requires_location() {
        assert!(profile().is_complete());

        let mut p = profile();
        p.district = "".into();
        assert!(!p.is_complete());

        let mut p = profile();
        p.address = "  ".into();
        assert!(!p.is_complete());
    }
}

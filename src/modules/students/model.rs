//! Student profile models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::utils::pagination::PaginationParams;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StudentProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub student_code: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub pincode: Option<String>,
    pub education_level: Option<String>,
    pub school_college_name: Option<String>,
    pub percentage_or_grade: Option<String>,
    pub passing_year: Option<String>,
    pub interests: Option<String>,
    pub assigned_consultant_id: Option<Uuid>,
    pub profile_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const STUDENT_COLUMNS: &str = "id, user_id, student_code, date_of_birth, gender, \
     address, country, state, district, pincode, education_level, school_college_name, \
     percentage_or_grade, passing_year, interests, assigned_consultant_id, \
     profile_completed, created_at, updated_at";

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl StudentProfile {
    /// A profile counts as complete once the fields consultants need for an
    /// assignment and first contact are all present.
    pub fn is_complete(&self) -> bool {
        self.date_of_birth.is_some()
            && filled(&self.address)
            && filled(&self.state)
            && filled(&self.district)
            && filled(&self.education_level)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentProfileRequest {
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    #[validate(length(max = 10, message = "Pincode is too long"))]
    pub pincode: Option<String>,
    pub education_level: Option<String>,
    pub school_college_name: Option<String>,
    pub percentage_or_grade: Option<String>,
    pub passing_year: Option<String>,
    pub interests: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StudentFilterParams {
    pub state: Option<String>,
    pub district: Option<String>,
    pub assigned_consultant_id: Option<Uuid>,
    #[serde(default, deserialize_with = "crate::utils::pagination::deserialize_optional_bool")]
    pub profile_completed: Option<bool>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub data: Vec<StudentProfile>,
    pub meta: crate::utils::pagination::PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_profile() -> StudentProfile {
        StudentProfile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            student_code: "STU-1A2B3C".into(),
            date_of_birth: Some(NaiveDate::from_ymd_opt(2006, 4, 12).unwrap()),
            gender: None,
            address: Some("12 Lake Road".into()),
            country: Some("India".into()),
            state: Some("Kerala".into()),
            district: Some("Ernakulam".into()),
            pincode: None,
            education_level: Some("12th".into()),
            school_college_name: None,
            percentage_or_grade: None,
            passing_year: None,
            interests: None,
            assigned_consultant_id: None,
            profile_completed: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_complete_profile() {
        assert!(base_profile().is_complete());
    }

    #[test]
    fn test_missing_required_field_is_incomplete() {
        let mut profile = base_profile();
        profile.date_of_birth = None;
        assert!(!profile.is_complete());

        let mut profile = base_profile();
        profile.district = Some("   ".into());
        assert!(!profile.is_complete());

        let mut profile = base_profile();
        profile.education_level = None;
        assert!(!profile.is_complete());
    }

    #[test]
    fn test_optional_fields_do_not_gate_completion() {
        let mut profile = base_profile();
        profile.gender = None;
        profile.pincode = None;
        profile.interests = None;
        assert!(profile.is_complete());
    }
}

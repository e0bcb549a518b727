//! College-owned resource models: courses, events, gallery, faculty, hostels.
//!
//! Every resource carries a `college_id`; mutation goes through an ownership
//! check so a college can only touch its own rows.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: Uuid,
    pub college_id: Uuid,
    pub main_stream: String,
    pub degree: String,
    pub level: String,
    pub specialization: String,
    pub duration: Option<String>,
    pub fee: Option<i64>,
    pub eligibility: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CourseRequest {
    #[validate(length(min = 1, message = "Main stream is required"))]
    pub main_stream: String,
    #[validate(length(min = 1, message = "Degree is required"))]
    pub degree: String,
    #[validate(length(min = 1, message = "Level is required"))]
    pub level: String,
    #[validate(length(min = 1, message = "Specialization is required"))]
    pub specialization: String,
    pub duration: Option<String>,
    #[validate(range(min = 0, message = "Fee cannot be negative"))]
    pub fee: Option<i64>,
    pub eligibility: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Event {
    pub id: Uuid,
    pub college_id: Uuid,
    pub name: String,
    pub date: Option<NaiveDate>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EventRequest {
    #[validate(length(min = 1, message = "Event name is required"))]
    pub name: String,
    pub date: Option<NaiveDate>,
    pub location: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct GalleryItem {
    pub id: Uuid,
    pub college_id: Uuid,
    pub media_type: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GalleryItemRequest {
    #[validate(length(min = 1, message = "Media type is required"))]
    pub media_type: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Faculty {
    pub id: Uuid,
    pub college_id: Uuid,
    pub name: String,
    pub designation: Option<String>,
    pub qualification: Option<String>,
    pub experience: Option<String>,
    pub department: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct FacultyRequest {
    #[validate(length(min = 1, message = "Faculty name is required"))]
    pub name: String,
    pub designation: Option<String>,
    pub qualification: Option<String>,
    pub experience: Option<String>,
    pub department: Option<String>,
    #[validate(email(message = "Invalid faculty email"))]
    pub email: Option<String>,
    pub is_active: Option<bool>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Hostel {
    pub id: Uuid,
    pub college_id: Uuid,
    pub name: String,
    pub hostel_type: Option<String>,
    pub capacity: Option<i32>,
    pub annual_fee: Option<i64>,
    pub facilities: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct HostelRequest {
    #[validate(length(min = 1, message = "Hostel name is required"))]
    pub name: String,
    pub hostel_type: Option<String>,
    #[validate(range(min = 0, message = "Capacity cannot be negative"))]
    pub capacity: Option<i32>,
    #[validate(range(min = 0, message = "Fee cannot be negative"))]
    pub annual_fee: Option<i64>,
    pub facilities: Option<String>,
    pub description: Option<String>,
}

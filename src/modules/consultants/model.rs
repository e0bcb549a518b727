//! Consultant profile models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::utils::pagination::PaginationParams;

/// Tier of a consultant. New consultants start as `Pending` until they pick
/// a tier; `State` tier is unique per state, `District` consultants are
/// parented to their state's consultant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "consultant_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConsultantType {
    Pending,
    State,
    District,
}

impl std::fmt::Display for ConsultantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::State => "state",
            Self::District => "district",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ConsultantProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub consultant_code: String,
    pub consultant_type: ConsultantType,
    pub state: String,
    pub district: Option<String>,
    pub parent_consultant_id: Option<Uuid>,
    pub full_name: String,
    pub phone: String,
    pub address: Option<String>,
    pub verified: bool,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub total_students: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const CONSULTANT_COLUMNS: &str = "id, user_id, consultant_code, consultant_type, \
     state, district, parent_consultant_id, full_name, phone, address, verified, \
     approved_by, approved_at, total_students, created_at, updated_at";

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateConsultantProfileRequest {
    #[validate(length(min = 1, message = "Full name cannot be empty"))]
    pub full_name: Option<String>,
    #[validate(length(min = 10, max = 15, message = "Phone number must be 10 to 15 digits"))]
    pub phone: Option<String>,
    pub address: Option<String>,
    pub consultant_type: Option<ConsultantType>,
    pub state: Option<String>,
    pub district: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ConsultantFilterParams {
    pub state: Option<String>,
    pub district: Option<String>,
    pub consultant_type: Option<ConsultantType>,
    #[serde(default, deserialize_with = "crate::utils::pagination::deserialize_optional_bool")]
    pub verified: Option<bool>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedConsultantsResponse {
    pub data: Vec<ConsultantProfile>,
    pub meta: crate::utils::pagination::PaginationMeta,
}

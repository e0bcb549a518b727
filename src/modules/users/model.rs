//! User data models and DTOs.
//!
//! The [`User`] entity is the identity anchor for the whole platform: every
//! role profile (student, consultant, college) hangs off a user row, and the
//! verification flags drive account activation.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::utils::pagination::PaginationParams;

/// Account role. `Counsellor` and `Admin` can never be self-registered;
/// they are created through the CLI only.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "user_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Student,
    Consultant,
    College,
    Counsellor,
    Admin,
}

impl UserType {
    /// Roles that may come in through the public registration flow.
    pub fn is_registerable(self) -> bool {
        matches!(self, Self::Student | Self::Consultant | Self::College)
    }

    /// Roles that require a name at registration time.
    pub fn requires_name(self) -> bool {
        matches!(self, Self::Student | Self::Consultant)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Consultant => "consultant",
            Self::College => "college",
            Self::Counsellor => "counsellor",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user account.
///
/// Invariant: `verified == email_verified && phone_verified`, and
/// `is_active` flips to true only when `verified` first becomes true.
/// The password hash is deliberately not part of this struct; services that
/// need it select it into a local row type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub user_type: UserType,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub verified: bool,
    pub is_profile_complete: bool,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

pub const USER_COLUMNS: &str = "id, name, email, phone, user_type, email_verified, \
     phone_verified, verified, is_profile_complete, is_active, created_at, updated_at";

/// Query parameters for the staff-only user listing.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UserFilterParams {
    pub email: Option<String>,
    pub name: Option<String>,
    pub user_type: Option<UserType>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedUsersResponse {
    pub data: Vec<User>,
    pub meta: crate::utils::pagination::PaginationMeta,
}

/// Profile-completion status for the authenticated user.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileStatusResponse {
    pub user_type: UserType,
    pub is_profile_complete: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registerable_roles() {
        assert!(UserType::Student.is_registerable());
        assert!(UserType::Consultant.is_registerable());
        assert!(UserType::College.is_registerable());
        assert!(!UserType::Counsellor.is_registerable());
        assert!(!UserType::Admin.is_registerable());
    }

    #[test]
    fn test_name_requirement() {
        assert!(UserType::Student.requires_name());
        assert!(UserType::Consultant.requires_name());
        assert!(!UserType::College.requires_name());
    }

    #[test]
    fn test_user_type_serde_is_lowercase() {
        let json = serde_json::to_string(&UserType::College).unwrap();
        assert_eq!(json, r#""college""#);

        let parsed: UserType = serde_json::from_str(r#""consultant""#).unwrap();
        assert_eq!(parsed, UserType::Consultant);
    }
}

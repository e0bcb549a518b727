//! One-time code storage model.
//!
//! All four verification channels (account email, account phone,
//! pre-registration email, pre-registration phone) share the `otp_codes`
//! table, discriminated by [`OtpSubjectType`]. A code is usable for ten
//! minutes from issuance; issuing a new code for a subject supersedes any
//! earlier unverified ones.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Seconds a code stays valid after issuance.
pub const OTP_VALIDITY_SECS: i64 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "otp_subject_type", rename_all = "snake_case")]
pub enum OtpSubjectType {
    UserEmail,
    UserPhone,
    PreregEmail,
    PreregPhone,
}

/// What a code verifies, and for whom. The id refers to `users.id` for the
/// `User*` variants and `pre_registrations.id` for the `Prereg*` variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpSubject {
    UserEmail(Uuid),
    UserPhone(Uuid),
    PreregEmail(Uuid),
    PreregPhone(Uuid),
}

impl OtpSubject {
    pub fn kind(self) -> OtpSubjectType {
        match self {
            Self::UserEmail(_) => OtpSubjectType::UserEmail,
            Self::UserPhone(_) => OtpSubjectType::UserPhone,
            Self::PreregEmail(_) => OtpSubjectType::PreregEmail,
            Self::PreregPhone(_) => OtpSubjectType::PreregPhone,
        }
    }

    pub fn id(self) -> Uuid {
        match self {
            Self::UserEmail(id)
            | Self::UserPhone(id)
            | Self::PreregEmail(id)
            | Self::PreregPhone(id) => id,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct OtpCode {
    pub id: Uuid,
    pub subject_type: OtpSubjectType,
    pub subject_id: Uuid,
    pub code: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

/// A code is valid strictly less than [`OTP_VALIDITY_SECS`] after issuance;
/// at exactly the boundary it is already expired.
pub fn is_code_valid(issued_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    let age = now.signed_duration_since(issued_at);
    age.num_seconds() >= 0 && age.num_seconds() < OTP_VALIDITY_SECS
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_fresh_code_is_valid() {
        let now = Utc::now();
        assert!(is_code_valid(now, now));
        assert!(is_code_valid(now, now + Duration::seconds(599)));
    }

    #[test]
    fn test_code_expires_at_boundary() {
        let now = Utc::now();
        assert!(!is_code_valid(now, now + Duration::seconds(600)));
        assert!(!is_code_valid(now, now + Duration::seconds(601)));
    }

    #[test]
    fn test_future_issuance_is_invalid() {
        let now = Utc::now();
        assert!(!is_code_valid(now + Duration::seconds(5), now));
    }

    #[test]
    fn test_subject_accessors() {
        let id = Uuid::new_v4();
        let subject = OtpSubject::PreregPhone(id);
        assert_eq!(subject.kind(), OtpSubjectType::PreregPhone);
        assert_eq!(subject.id(), id);
    }
}

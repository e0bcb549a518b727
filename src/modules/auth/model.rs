//! Authentication and registration models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::users::model::{User, UserType};

/// Seconds a pre-registration stays usable before verification attempts are
/// rejected (7 days).
pub const PRE_REGISTRATION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub user_type: UserType,
    pub exp: usize,
    pub iat: usize,
}

/// Staged registration awaiting email (and, when a phone was given, phone)
/// verification. Finalization promotes it to a `users` row and deletes it.
#[derive(Debug, Clone, FromRow)]
pub struct PreRegistration {
    pub id: Uuid,
    pub token: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub user_type: UserType,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl PreRegistration {
    /// Both channels verified, where "both" shrinks to email alone when no
    /// phone number was submitted.
    pub fn is_fully_verified(&self) -> bool {
        self.email_verified && (self.phone.is_none() || self.phone_verified)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.created_at).num_seconds() >= PRE_REGISTRATION_TTL_SECS
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    pub name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 10, max = 15, message = "Phone number must be 10 to 15 digits"))]
    pub phone: Option<String>,
    pub user_type: UserType,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub password2: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub pre_token: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyEmailRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(equal = 6, message = "OTP must be 6 digits"))]
    pub otp: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyPhoneRequest {
    #[validate(length(min = 10, max = 15, message = "Phone number must be 10 to 15 digits"))]
    pub phone: String,
    #[validate(length(equal = 6, message = "OTP must be 6 digits"))]
    pub otp: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyResponse {
    pub message: String,
    /// True once the account has been created and the caller can log in.
    pub registration_complete: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResendEmailOtpRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResendPhoneOtpRequest {
    #[validate(length(min = 10, max = 15, message = "Phone number must be 10 to 15 digits"))]
    pub phone: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Old password is required"))]
    pub old_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordConfirmRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(equal = 6, message = "OTP must be 6 digits"))]
    pub otp: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

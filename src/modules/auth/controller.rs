use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::model::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, LoginResponse,
    MessageResponse, RegisterRequest, RegisterResponse, ResendEmailOtpRequest,
    ResendPhoneOtpRequest, ResetPasswordConfirmRequest, VerifyEmailRequest,
    VerifyPhoneRequest, VerifyResponse,
};
use crate::modules::auth::service::AuthService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Start a registration. Creates a pre-registration and sends verification
/// codes to the submitted channels.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration staged", body = RegisterResponse),
        (status = 400, description = "Role not registerable or name missing"),
        (status = 409, description = "Email or phone already belongs to an account"),
        (status = 422, description = "Validation failed"),
    )
)]
#[instrument(skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let response = AuthService::register(&state, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Verify an email OTP.
#[utoipa::path(
    post,
    path = "/api/auth/verify-email",
    tag = "Auth",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Email verified", body = VerifyResponse),
        (status = 400, description = "Invalid or expired OTP"),
        (status = 404, description = "No pending registration"),
    )
)]
#[instrument(skip(state, request))]
pub async fn verify_email(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<VerifyEmailRequest>,
) -> Result<Json<VerifyResponse>, AppError> {
    let response = AuthService::verify_email(&state, &request.email, &request.otp).await?;
    Ok(Json(response))
}

/// Verify a phone OTP.
#[utoipa::path(
    post,
    path = "/api/auth/verify-phone",
    tag = "Auth",
    request_body = VerifyPhoneRequest,
    responses(
        (status = 200, description = "Phone verified", body = VerifyResponse),
        (status = 400, description = "Invalid or expired OTP"),
        (status = 404, description = "No pending registration"),
    )
)]
#[instrument(skip(state, request))]
pub async fn verify_phone(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<VerifyPhoneRequest>,
) -> Result<Json<VerifyResponse>, AppError> {
    let response = AuthService::verify_phone(&state, &request.phone, &request.otp).await?;
    Ok(Json(response))
}

/// Re-send the email verification code.
#[utoipa::path(
    post,
    path = "/api/auth/resend-email-otp",
    tag = "Auth",
    request_body = ResendEmailOtpRequest,
    responses(
        (status = 200, description = "Code re-sent", body = MessageResponse),
        (status = 400, description = "Email already verified"),
        (status = 404, description = "Nothing to verify for this email"),
    )
)]
#[instrument(skip(state, request))]
pub async fn resend_email_otp(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ResendEmailOtpRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::resend_email_otp(&state, &request.email).await?;
    Ok(Json(MessageResponse {
        message: "Verification code sent to your email".to_string(),
    }))
}

/// Re-send the phone verification code.
#[utoipa::path(
    post,
    path = "/api/auth/resend-phone-otp",
    tag = "Auth",
    request_body = ResendPhoneOtpRequest,
    responses(
        (status = 200, description = "Code re-sent", body = MessageResponse),
        (status = 400, description = "Phone already verified"),
        (status = 404, description = "Nothing to verify for this phone"),
    )
)]
#[instrument(skip(state, request))]
pub async fn resend_phone_otp(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ResendPhoneOtpRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::resend_phone_otp(&state, &request.phone).await?;
    Ok(Json(MessageResponse {
        message: "Verification code sent to your phone".to_string(),
    }))
}

/// Authenticate and receive an access token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Bad credentials"),
        (status = 403, description = "Account not fully verified or deactivated"),
    )
)]
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login(&state, request).await?;
    Ok(Json(response))
}

/// Change the authenticated user's password.
#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    tag = "Auth",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Old password incorrect"),
        (status = 401, description = "Not authenticated"),
    )
)]
#[instrument(skip(state, auth, request))]
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::change_password(
        &state,
        auth.user_id()?,
        &request.old_password,
        &request.new_password,
    )
    .await?;
    Ok(Json(MessageResponse { message: "Password changed successfully".to_string() }))
}

/// Send a password-reset code to the account email.
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    tag = "Auth",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset code sent", body = MessageResponse),
        (status = 404, description = "No account for this email"),
    )
)]
#[instrument(skip(state, request))]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::forgot_password(&state, &request.email).await?;
    Ok(Json(MessageResponse {
        message: "Password reset code sent to your email".to_string(),
    }))
}

/// Complete a password reset with the emailed code.
#[utoipa::path(
    post,
    path = "/api/auth/reset-password-confirm",
    tag = "Auth",
    request_body = ResetPasswordConfirmRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 400, description = "Invalid or expired OTP"),
        (status = 404, description = "No account for this email"),
    )
)]
#[instrument(skip(state, request))]
pub async fn reset_password_confirm(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ResetPasswordConfirmRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::reset_password_confirm(
        &state,
        &request.email,
        &request.otp,
        &request.new_password,
    )
    .await?;
    Ok(Json(MessageResponse { message: "Password reset successfully".to_string() }))
}

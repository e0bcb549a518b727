use axum::Router;
use axum::routing::post;

use crate::modules::auth::controller;
use crate::state::AppState;

pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(controller::register))
        .route("/verify-email", post(controller::verify_email))
        .route("/verify-phone", post(controller::verify_phone))
        .route("/resend-email-otp", post(controller::resend_email_otp))
        .route("/resend-phone-otp", post(controller::resend_phone_otp))
        .route("/login", post(controller::login))
        .route("/change-password", post(controller::change_password))
        .route("/forgot-password", post(controller::forgot_password))
        .route("/reset-password-confirm", post(controller::reset_password_confirm))
}

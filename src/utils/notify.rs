use lettre::message::header;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{info, instrument, warn};

use crate::config::email::EmailConfig;
use crate::utils::errors::AppError;

/// Fire-and-forget notification channel.
///
/// Every public method is best-effort: dispatch failures are logged at warn
/// level and never propagate, so a broken SMTP relay cannot roll back a
/// registration or approval that already committed.
#[derive(Clone, Debug)]
pub struct Notifier {
    config: EmailConfig,
}

impl Notifier {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    #[instrument(skip(self, code))]
    pub async fn send_email_otp(&self, to_email: &str, code: &str) {
        let body = format!(
            "Hi {},\n\nYour email verification OTP is: {}\n\nThis OTP is valid for 10 minutes.",
            to_email, code
        );
        self.send_best_effort(to_email, "Email Verification OTP", &body)
            .await;
    }

    #[instrument(skip(self, code))]
    pub async fn send_password_reset_otp(&self, to_email: &str, code: &str) {
        let body = format!(
            "Hi {},\n\nYour OTP for password reset is: {}\n\nThis OTP is valid for 10 minutes.",
            to_email, code
        );
        self.send_best_effort(to_email, "Password Reset OTP", &body)
            .await;
    }

    /// SMS delivery is not wired up; the code is logged so development and
    /// test flows can proceed.
    // TODO: route through an SMS gateway once one is provisioned.
    #[instrument(skip(self, code))]
    pub async fn send_phone_otp(&self, phone: &str, code: &str) {
        info!(phone = %phone, otp = %code, "Phone OTP issued");
    }

    #[instrument(skip(self, body))]
    pub async fn notify_staff(&self, recipients: &[String], subject: &str, body: &str) {
        for recipient in recipients {
            self.send_best_effort(recipient, subject, body).await;
        }
    }

    #[instrument(skip(self, body))]
    pub async fn notify_user(&self, to_email: &str, subject: &str, body: &str) {
        self.send_best_effort(to_email, subject, body).await;
    }

    async fn send_best_effort(&self, to_email: &str, subject: &str, body: &str) {
        if !self.config.enabled {
            info!(to = %to_email, subject = %subject, "SMTP disabled, skipping email dispatch");
            return;
        }

        if let Err(e) = self.send_email(to_email, subject, body).await {
            warn!(to = %to_email, subject = %subject, error = %e, "Failed to send email");
        }
    }

    async fn send_email(&self, to_email: &str, subject: &str, body: &str) -> Result<(), AppError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AppError::internal_error(format!("Invalid from email: {}", e)))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| AppError::internal_error(format!("Invalid to email: {}", e)))?)
            .subject(subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AppError::internal_error(format!("Failed to build email: {}", e)))?;

        let mailer = if self.config.smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|e| {
                    AppError::internal_error(format!("Failed to create SMTP relay: {}", e))
                })?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::internal_error(format!("Task join error: {}", e)))?
            .map_err(|e| AppError::internal_error(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}

use chrono::Utc;
use rand::Rng;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use crate::modules::otp::model::{OtpCode, OtpSubject, is_code_valid};
use crate::utils::errors::AppError;

pub struct OtpService;

impl OtpService {
    /// Issue a fresh six-digit code for `subject`, superseding any earlier
    /// unverified codes for the same subject.
    #[instrument(skip(db))]
    pub async fn issue(db: &PgPool, subject: OtpSubject) -> Result<String, AppError> {
        sqlx::query(
            "DELETE FROM otp_codes
             WHERE subject_type = $1 AND subject_id = $2 AND verified = FALSE",
        )
        .bind(subject.kind())
        .bind(subject.id())
        .execute(db)
        .await?;

        let code = Self::generate_code();

        sqlx::query(
            "INSERT INTO otp_codes (subject_type, subject_id, code)
             VALUES ($1, $2, $3)",
        )
        .bind(subject.kind())
        .bind(subject.id())
        .bind(&code)
        .execute(db)
        .await?;

        Ok(code)
    }

    /// Check `code` against the latest unverified code for `subject` and mark
    /// it verified on success.
    #[instrument(skip(db, code))]
    pub async fn validate(
        db: &PgPool,
        subject: OtpSubject,
        code: &str,
    ) -> Result<(), AppError> {
        let record = sqlx::query_as::<_, OtpCode>(
            "SELECT id, subject_type, subject_id, code, verified, created_at
             FROM otp_codes
             WHERE subject_type = $1 AND subject_id = $2 AND verified = FALSE
             ORDER BY created_at DESC
             LIMIT 1",
        )
        .bind(subject.kind())
        .bind(subject.id())
        .fetch_optional(db)
        .await?;

        let record = record
            .ok_or_else(|| AppError::bad_request("Invalid or expired OTP"))?;

        if record.code != code || !is_code_valid(record.created_at, Utc::now()) {
            return Err(AppError::bad_request("Invalid or expired OTP"));
        }

        sqlx::query("UPDATE otp_codes SET verified = TRUE WHERE id = $1")
            .bind(record.id)
            .execute(db)
            .await?;

        Ok(())
    }

    /// Remove every code tied to a pre-registration. Runs inside the
    /// finalization transaction so codes and the pre-registration row
    /// disappear together.
    pub async fn purge_pre_registration(
        tx: &mut Transaction<'_, Postgres>,
        pre_registration_id: uuid::Uuid,
    ) -> Result<(), AppError> {
        sqlx::query(
            "DELETE FROM otp_codes
             WHERE subject_type IN ('prereg_email', 'prereg_phone') AND subject_id = $1",
        )
        .bind(pre_registration_id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    fn generate_code() -> String {
        let code: u32 = rand::thread_rng().gen_range(100_000..=999_999);
        code.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_code_is_six_digits() {
        for _ in 0..100 {
            let code = OtpService::generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(code.chars().next(), Some('0'));
        }
    }
}

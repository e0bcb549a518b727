use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::modules::auth::model::{
    LoginRequest, LoginResponse, PreRegistration, RegisterRequest, RegisterResponse,
    VerifyResponse,
};
use crate::modules::otp::model::OtpSubject;
use crate::modules::otp::service::OtpService;
use crate::modules::users::model::{USER_COLUMNS, User, UserType};
use crate::modules::users::service::ProfileService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::create_access_token;
use crate::utils::password::{hash_password, verify_password};

const PREREG_COLUMNS: &str = "id, token, name, email, phone, password_hash, user_type, \
     email_verified, phone_verified, created_at";

#[derive(Debug, sqlx::FromRow)]
struct UserAuthRow {
    id: Uuid,
    email: String,
    user_type: UserType,
    password: String,
    email_verified: bool,
    phone_verified: bool,
    phone: Option<String>,
    is_active: bool,
}

pub struct AuthService;

impl AuthService {
    /// Stage a new registration. Any earlier unfinalized attempt for the
    /// same email is discarded and replaced.
    #[instrument(skip(state, request), fields(email = %request.email, user_type = %request.user_type))]
    pub async fn register(
        state: &AppState,
        request: RegisterRequest,
    ) -> Result<RegisterResponse, AppError> {
        if !request.user_type.is_registerable() {
            return Err(AppError::bad_request(format!(
                "Registration is not allowed for the {} role",
                request.user_type
            )));
        }

        let name = request.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
        if request.user_type.requires_name() && name.is_none() {
            return Err(AppError::bad_request(format!(
                "Name is required for {} registration",
                request.user_type
            )));
        }

        let email_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(&request.email)
        .fetch_one(&state.db)
        .await?;
        if email_taken {
            return Err(AppError::conflict("An account with this email already exists"));
        }

        if let Some(phone) = &request.phone {
            let phone_taken = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM users WHERE phone = $1)",
            )
            .bind(phone)
            .fetch_one(&state.db)
            .await?;
            if phone_taken {
                return Err(AppError::conflict(
                    "An account with this phone number already exists",
                ));
            }
        }

        let password_hash = hash_password(&request.password)?;

        // Re-registering with the same email restarts the flow from scratch.
        let stale: Vec<Uuid> = sqlx::query_scalar(
            "SELECT id FROM pre_registrations WHERE email = $1",
        )
        .bind(&request.email)
        .fetch_all(&state.db)
        .await?;
        for stale_id in stale {
            sqlx::query(
                "DELETE FROM otp_codes
                 WHERE subject_type IN ('prereg_email', 'prereg_phone') AND subject_id = $1",
            )
            .bind(stale_id)
            .execute(&state.db)
            .await?;
        }
        sqlx::query("DELETE FROM pre_registrations WHERE email = $1")
            .bind(&request.email)
            .execute(&state.db)
            .await?;

        let prereg = sqlx::query_as::<_, PreRegistration>(&format!(
            "INSERT INTO pre_registrations (name, email, phone, password_hash, user_type)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {PREREG_COLUMNS}"
        ))
        .bind(name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&password_hash)
        .bind(request.user_type)
        .fetch_one(&state.db)
        .await?;

        let email_code =
            OtpService::issue(&state.db, OtpSubject::PreregEmail(prereg.id)).await?;
        state.notifier.send_email_otp(&prereg.email, &email_code).await;

        if let Some(phone) = &prereg.phone {
            let phone_code =
                OtpService::issue(&state.db, OtpSubject::PreregPhone(prereg.id)).await?;
            state.notifier.send_phone_otp(phone, &phone_code).await;
        }

        info!(pre_registration_id = %prereg.id, "Registration staged");

        let message = if prereg.phone.is_some() {
            "Verification codes sent to your email and phone".to_string()
        } else {
            "Verification code sent to your email".to_string()
        };

        Ok(RegisterResponse { message, pre_token: prereg.token })
    }

    /// Verify an email code, for either an existing account or a staged
    /// registration. Finalizes the registration when this was the last
    /// outstanding channel.
    #[instrument(skip(state, otp))]
    pub async fn verify_email(
        state: &AppState,
        email: &str,
        otp: &str,
    ) -> Result<VerifyResponse, AppError> {
        if let Some(user) = Self::find_user_by_email(&state.db, email).await? {
            if user.email_verified {
                return Err(AppError::bad_request("Email is already verified"));
            }
            OtpService::validate(&state.db, OtpSubject::UserEmail(user.id), otp).await?;
            let verified =
                Self::mark_user_channel_verified(&state.db, user.id, "email_verified").await?;
            return Ok(VerifyResponse {
                message: "Email verified successfully".to_string(),
                registration_complete: verified,
            });
        }

        let prereg = Self::find_active_prereg(
            &state.db,
            "email",
            email,
        )
        .await?;

        OtpService::validate(&state.db, OtpSubject::PreregEmail(prereg.id), otp).await?;

        sqlx::query("UPDATE pre_registrations SET email_verified = TRUE WHERE id = $1")
            .bind(prereg.id)
            .execute(&state.db)
            .await?;

        let prereg = PreRegistration { email_verified: true, ..prereg };
        if prereg.is_fully_verified() {
            Self::finalize(state, &prereg).await?;
            Ok(VerifyResponse {
                message: "Registration complete. You can now log in".to_string(),
                registration_complete: true,
            })
        } else {
            Ok(VerifyResponse {
                message: "Email verified successfully. Please verify your phone number"
                    .to_string(),
                registration_complete: false,
            })
        }
    }

    /// Phone counterpart of [`AuthService::verify_email`].
    #[instrument(skip(state, otp))]
    pub async fn verify_phone(
        state: &AppState,
        phone: &str,
        otp: &str,
    ) -> Result<VerifyResponse, AppError> {
        if let Some(user) = Self::find_user_by_phone(&state.db, phone).await? {
            if user.phone_verified {
                return Err(AppError::bad_request("Phone number is already verified"));
            }
            OtpService::validate(&state.db, OtpSubject::UserPhone(user.id), otp).await?;
            let verified =
                Self::mark_user_channel_verified(&state.db, user.id, "phone_verified").await?;
            return Ok(VerifyResponse {
                message: "Phone number verified successfully".to_string(),
                registration_complete: verified,
            });
        }

        let prereg = Self::find_active_prereg(&state.db, "phone", phone).await?;

        OtpService::validate(&state.db, OtpSubject::PreregPhone(prereg.id), otp).await?;

        sqlx::query("UPDATE pre_registrations SET phone_verified = TRUE WHERE id = $1")
            .bind(prereg.id)
            .execute(&state.db)
            .await?;

        let prereg = PreRegistration { phone_verified: true, ..prereg };
        if prereg.is_fully_verified() {
            Self::finalize(state, &prereg).await?;
            Ok(VerifyResponse {
                message: "Registration complete. You can now log in".to_string(),
                registration_complete: true,
            })
        } else {
            Ok(VerifyResponse {
                message: "Phone number verified successfully. Please verify your email"
                    .to_string(),
                registration_complete: false,
            })
        }
    }

    /// Promote a fully verified pre-registration to a real account.
    ///
    /// Everything happens in one transaction: user insert, pre-registration
    /// delete, code purge, profile materialization. The delete doubles as a
    /// concurrency guard, so two racing verifications create exactly one
    /// account.
    #[instrument(skip(state, prereg), fields(pre_registration_id = %prereg.id))]
    async fn finalize(state: &AppState, prereg: &PreRegistration) -> Result<(), AppError> {
        let mut tx = state.db.begin().await?;

        let inserted = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO users
                 (name, email, phone, user_type, password,
                  email_verified, phone_verified, verified, is_active)
             VALUES ($1, $2, $3, $4, $5, TRUE, TRUE, TRUE, TRUE)
             RETURNING id",
        )
        .bind(&prereg.name)
        .bind(&prereg.email)
        .bind(&prereg.phone)
        .bind(prereg.user_type)
        .bind(&prereg.password_hash)
        .fetch_one(&mut *tx)
        .await;

        let user_id = match inserted {
            Ok(id) => id,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(AppError::conflict("An account with this email already exists"));
            }
            Err(e) => return Err(e.into()),
        };

        let deleted = sqlx::query("DELETE FROM pre_registrations WHERE id = $1")
            .bind(prereg.id)
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() != 1 {
            return Err(AppError::conflict("Registration was already completed"));
        }

        OtpService::purge_pre_registration(&mut tx, prereg.id).await?;

        ProfileService::materialize(&mut tx, user_id, prereg.user_type, prereg.name.as_deref())
            .await?;

        tx.commit().await?;

        info!(user_id = %user_id, user_type = %prereg.user_type, "Registration finalized");

        if prereg.user_type == UserType::Consultant {
            if let Some(admin_email) = &state.email_config.admin_email {
                state
                    .notifier
                    .notify_staff(
                        std::slice::from_ref(admin_email),
                        "New consultant registration",
                        &format!(
                            "A new consultant has registered with email {} and is awaiting approval.",
                            prereg.email
                        ),
                    )
                    .await;
            }
        }

        Ok(())
    }

    #[instrument(skip(state, request), fields(email = %request.email))]
    pub async fn login(
        state: &AppState,
        request: LoginRequest,
    ) -> Result<LoginResponse, AppError> {
        let row = sqlx::query_as::<_, UserAuthRow>(
            "SELECT id, email, user_type, password, email_verified, phone_verified, phone, is_active
             FROM users WHERE email = $1",
        )
        .bind(&request.email)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

        if !verify_password(&request.password, &row.password)? {
            return Err(AppError::unauthorized("Invalid email or password"));
        }

        if !row.email_verified {
            return Err(AppError::forbidden("Please verify your email before logging in"));
        }
        if row.phone.is_some() && !row.phone_verified {
            return Err(AppError::forbidden(
                "Please verify your phone number before logging in",
            ));
        }
        if !row.is_active {
            return Err(AppError::forbidden("This account has been deactivated"));
        }

        let token = create_access_token(row.id, &row.email, row.user_type, &state.jwt_config)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(row.id)
        .fetch_one(&state.db)
        .await?;

        Ok(LoginResponse { token, user })
    }

    /// Re-issue an email code for an account or a staged registration.
    #[instrument(skip(state))]
    pub async fn resend_email_otp(state: &AppState, email: &str) -> Result<(), AppError> {
        if let Some(user) = Self::find_user_by_email(&state.db, email).await? {
            if user.email_verified {
                return Err(AppError::bad_request("Email is already verified"));
            }
            let code = OtpService::issue(&state.db, OtpSubject::UserEmail(user.id)).await?;
            state.notifier.send_email_otp(email, &code).await;
            return Ok(());
        }

        let prereg = Self::find_active_prereg(&state.db, "email", email).await?;
        if prereg.email_verified {
            return Err(AppError::bad_request("Email is already verified"));
        }
        let code = OtpService::issue(&state.db, OtpSubject::PreregEmail(prereg.id)).await?;
        state.notifier.send_email_otp(email, &code).await;
        Ok(())
    }

    #[instrument(skip(state))]
    pub async fn resend_phone_otp(state: &AppState, phone: &str) -> Result<(), AppError> {
        if let Some(user) = Self::find_user_by_phone(&state.db, phone).await? {
            if user.phone_verified {
                return Err(AppError::bad_request("Phone number is already verified"));
            }
            let code = OtpService::issue(&state.db, OtpSubject::UserPhone(user.id)).await?;
            state.notifier.send_phone_otp(phone, &code).await;
            return Ok(());
        }

        let prereg = Self::find_active_prereg(&state.db, "phone", phone).await?;
        if prereg.phone_verified {
            return Err(AppError::bad_request("Phone number is already verified"));
        }
        let code = OtpService::issue(&state.db, OtpSubject::PreregPhone(prereg.id)).await?;
        state.notifier.send_phone_otp(phone, &code).await;
        Ok(())
    }

    #[instrument(skip(state, old_password, new_password))]
    pub async fn change_password(
        state: &AppState,
        user_id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let current_hash = sqlx::query_scalar::<_, String>(
            "SELECT password FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

        if !verify_password(old_password, &current_hash)? {
            return Err(AppError::bad_request("Old password is incorrect"));
        }

        let new_hash = hash_password(new_password)?;
        sqlx::query("UPDATE users SET password = $1, updated_at = NOW() WHERE id = $2")
            .bind(&new_hash)
            .bind(user_id)
            .execute(&state.db)
            .await?;

        Ok(())
    }

    #[instrument(skip(state))]
    pub async fn forgot_password(state: &AppState, email: &str) -> Result<(), AppError> {
        let user = Self::find_user_by_email(&state.db, email)
            .await?
            .ok_or_else(|| AppError::not_found("No account found for this email"))?;

        let code = OtpService::issue(&state.db, OtpSubject::UserEmail(user.id)).await?;
        state.notifier.send_password_reset_otp(email, &code).await;
        Ok(())
    }

    #[instrument(skip(state, otp, new_password))]
    pub async fn reset_password_confirm(
        state: &AppState,
        email: &str,
        otp: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let user = Self::find_user_by_email(&state.db, email)
            .await?
            .ok_or_else(|| AppError::not_found("No account found for this email"))?;

        OtpService::validate(&state.db, OtpSubject::UserEmail(user.id), otp).await?;

        let new_hash = hash_password(new_password)?;
        sqlx::query("UPDATE users SET password = $1, updated_at = NOW() WHERE id = $2")
            .bind(&new_hash)
            .bind(user.id)
            .execute(&state.db)
            .await?;

        Ok(())
    }

    async fn find_user_by_email(db: &PgPool, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    async fn find_user_by_phone(db: &PgPool, phone: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE phone = $1"
        ))
        .bind(phone)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Latest pre-registration matching `column = value`, rejected when older
    /// than the seven-day window.
    async fn find_active_prereg(
        db: &PgPool,
        column: &str,
        value: &str,
    ) -> Result<PreRegistration, AppError> {
        debug_assert!(column == "email" || column == "phone");
        let prereg = sqlx::query_as::<_, PreRegistration>(&format!(
            "SELECT {PREREG_COLUMNS} FROM pre_registrations
             WHERE {column} = $1
             ORDER BY created_at DESC
             LIMIT 1"
        ))
        .bind(value)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("No pending registration found"))?;

        if prereg.is_expired(Utc::now()) {
            return Err(AppError::bad_request(
                "Registration session has expired, please register again",
            ));
        }

        Ok(prereg)
    }

    /// Set one verification flag and recompute the aggregate `verified` and
    /// `is_active` flags.
    /// Marks one verification channel done and recomputes the account-level
    /// flags in the same statement. Returns the resulting `verified` value.
    async fn mark_user_channel_verified(
        db: &PgPool,
        user_id: Uuid,
        column: &str,
    ) -> Result<bool, AppError> {
        debug_assert!(column == "email_verified" || column == "phone_verified");
        // SET expressions see pre-update column values, so the flag being
        // flipped is folded into the recompute rather than referenced.
        let fully_verified = match column {
            "email_verified" => "(phone IS NULL OR phone_verified)",
            _ => "email_verified",
        };
        let verified = sqlx::query_scalar::<_, bool>(&format!(
            "UPDATE users
             SET {column} = TRUE,
                 verified = {fully_verified},
                 is_active = is_active OR {fully_verified},
                 updated_at = NOW()
             WHERE id = $1
             RETURNING verified"
        ))
        .bind(user_id)
        .fetch_one(db)
        .await?;

        Ok(verified)
    }
}

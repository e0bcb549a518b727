//! Maintenance commands invoked from the binary entrypoint.
//!
//! Admin and counsellor accounts are never self-registered; they are created
//! here with all verification flags set.

use anyhow::{Context, bail};
use sqlx::PgPool;

use crate::modules::users::model::UserType;
use crate::utils::password::hash_password;

pub async fn create_admin(db: &PgPool, email: &str, password: &str) -> anyhow::Result<()> {
    create_staff_user(db, email, password, UserType::Admin).await
}

pub async fn create_counsellor(db: &PgPool, email: &str, password: &str) -> anyhow::Result<()> {
    create_staff_user(db, email, password, UserType::Counsellor).await
}

async fn create_staff_user(
    db: &PgPool,
    email: &str,
    password: &str,
    user_type: UserType,
) -> anyhow::Result<()> {
    if password.len() < 8 {
        bail!("password must be at least 8 characters");
    }

    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
    )
    .bind(email)
    .fetch_one(db)
    .await
    .context("failed to check existing accounts")?;
    if exists {
        bail!("an account with email {email} already exists");
    }

    let password_hash =
        hash_password(password).map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?;

    sqlx::query(
        "INSERT INTO users
             (email, user_type, password, email_verified, phone_verified,
              verified, is_active)
         VALUES ($1, $2, $3, TRUE, TRUE, TRUE, TRUE)",
    )
    .bind(email)
    .bind(user_type)
    .bind(&password_hash)
    .execute(db)
    .await
    .context("failed to create account")?;

    println!("Created {user_type} account for {email}");
    Ok(())
}

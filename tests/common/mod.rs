#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use admitly::config::jwt::JwtConfig;
use admitly::modules::users::model::UserType;
use admitly::router::build_router;
use admitly::state::AppState;
use admitly::utils::jwt::create_access_token;
use admitly::utils::password::hash_password;

pub fn test_app(pool: PgPool) -> Router {
    build_router(AppState::new(pool))
}

pub fn generate_unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", Uuid::new_v4().simple())
}

pub fn generate_unique_phone() -> String {
    let n: u64 = 9_000_000_000 + (Uuid::new_v4().as_u128() % 999_999_999) as u64;
    n.to_string()
}

pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = if let Some(body) = body {
        builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send_json(app, "POST", uri, None, Some(body)).await
}

pub async fn get_json(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    send_json(app, "GET", uri, token, None).await
}

/// Insert a fully verified, active user directly, bypassing the OTP flow.
pub async fn create_verified_user(
    db: &PgPool,
    email: &str,
    phone: Option<&str>,
    user_type: UserType,
    password: &str,
) -> Uuid {
    let hash = hash_password(password).unwrap();
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users
             (name, email, phone, user_type, password,
              email_verified, phone_verified, verified, is_active)
         VALUES ($1, $2, $3, $4, $5, TRUE, TRUE, TRUE, TRUE)
         RETURNING id",
    )
    .bind(format!("Test {user_type}"))
    .bind(email)
    .bind(phone)
    .bind(user_type)
    .bind(&hash)
    .fetch_one(db)
    .await
    .unwrap()
}

/// Bearer token for a user, signed with the same default secret the app uses.
pub fn auth_token(user_id: Uuid, email: &str, user_type: UserType) -> String {
    create_access_token(user_id, email, user_type, &JwtConfig::from_env()).unwrap()
}

/// The most recent unverified code for a subject, as the user would read it
/// from their inbox.
pub async fn fetch_latest_otp(db: &PgPool, subject_type: &str, subject_id: Uuid) -> String {
    sqlx::query_scalar::<_, String>(
        "SELECT code FROM otp_codes
         WHERE subject_type = $1::otp_subject_type AND subject_id = $2 AND verified = FALSE
         ORDER BY created_at DESC LIMIT 1",
    )
    .bind(subject_type)
    .bind(subject_id)
    .fetch_one(db)
    .await
    .unwrap()
}

pub async fn prereg_id_for_email(db: &PgPool, email: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM pre_registrations WHERE email = $1 ORDER BY created_at DESC LIMIT 1",
    )
    .bind(email)
    .fetch_one(db)
    .await
    .unwrap()
}

/// Insert a consultant profile row directly, as the materializer would.
pub async fn create_consultant_profile(
    db: &PgPool,
    user_id: Uuid,
    consultant_type: &str,
    state: &str,
    district: Option<&str>,
    verified: bool,
) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO consultant_profiles
             (user_id, consultant_code, consultant_type, state, district, full_name, verified)
         VALUES ($1, $2, $3::consultant_type, $4, $5, 'Test Consultant', $6)
         RETURNING id",
    )
    .bind(user_id)
    .bind(format!("CON-{}", &Uuid::new_v4().simple().to_string()[..6].to_uppercase()))
    .bind(consultant_type)
    .bind(state)
    .bind(district)
    .bind(verified)
    .fetch_one(db)
    .await
    .unwrap()
}

/// Insert a college profile row directly.
pub async fn create_college_profile(
    db: &PgPool,
    user_id: Uuid,
    college_name: &str,
    state: &str,
    district: &str,
    verified: bool,
) -> (Uuid, String) {
    let code = format!("COL-{}", &Uuid::new_v4().simple().to_string()[..6].to_uppercase());
    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO college_profiles
             (user_id, college_code, college_name, country, state, district, address, verified)
         VALUES ($1, $2, $3, 'India', $4, $5, 'Test Address', $6)
         RETURNING id",
    )
    .bind(user_id)
    .bind(&code)
    .bind(college_name)
    .bind(state)
    .bind(district)
    .bind(verified)
    .fetch_one(db)
    .await
    .unwrap();
    (id, code)
}

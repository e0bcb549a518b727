mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{
    create_verified_user, fetch_latest_otp, generate_unique_email, generate_unique_phone,
    post_json, prereg_id_for_email, test_app,
};

use admitly::modules::users::model::UserType;
use admitly::modules::users::service::ProfileService;

fn register_body(email: &str, phone: Option<&str>, user_type: &str) -> serde_json::Value {
    json!({
        "name": "Asha Menon",
        "email": email,
        "phone": phone,
        "user_type": user_type,
        "password": "password123",
        "password2": "password123",
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn test_full_registration_with_phone(pool: PgPool) {
    let app = test_app(pool.clone());
    let email = generate_unique_email("student");
    let phone = generate_unique_phone();

    let (status, body) =
        post_json(&app, "/api/auth/register", register_body(&email, Some(&phone), "student"))
            .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["pre_token"].is_string());

    let prereg_id = prereg_id_for_email(&pool, &email).await;

    // No account yet, both flags down.
    let (email_verified, phone_verified): (bool, bool) = sqlx::query_as(
        "SELECT email_verified, phone_verified FROM pre_registrations WHERE id = $1",
    )
    .bind(prereg_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(!email_verified);
    assert!(!phone_verified);

    let email_otp = fetch_latest_otp(&pool, "prereg_email", prereg_id).await;
    let (status, body) = post_json(
        &app,
        "/api/auth/verify-email",
        json!({ "email": email, "otp": email_otp }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["registration_complete"], false);

    // Email alone does not create the account while a phone is pending.
    let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(user_count, 0);

    let phone_otp = fetch_latest_otp(&pool, "prereg_phone", prereg_id).await;
    let (status, body) = post_json(
        &app,
        "/api/auth/verify-phone",
        json!({ "phone": phone, "otp": phone_otp }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["registration_complete"], true);

    // Account exists, fully verified and active.
    let (verified, is_active): (bool, bool) = sqlx::query_as(
        "SELECT verified, is_active FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(verified);
    assert!(is_active);

    // Staging rows are gone.
    let prereg_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM pre_registrations WHERE email = $1")
            .bind(&email)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(prereg_count, 0);

    let otp_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM otp_codes WHERE subject_id = $1")
            .bind(prereg_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(otp_count, 0);

    // Student profile materialized with a code.
    let student_code: String = sqlx::query_scalar(
        "SELECT sp.student_code FROM student_profiles sp
         JOIN users u ON u.id = sp.user_id WHERE u.email = $1",
    )
    .bind(&email)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(student_code.starts_with("STU-"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_registration_without_phone_finalizes_on_email(pool: PgPool) {
    let app = test_app(pool.clone());
    let email = generate_unique_email("college");

    let mut body = register_body(&email, None, "college");
    body["name"] = json!("Crescent Institute");
    let (status, _) = post_json(&app, "/api/auth/register", body).await;
    assert_eq!(status, StatusCode::CREATED);

    let prereg_id = prereg_id_for_email(&pool, &email).await;
    let otp = fetch_latest_otp(&pool, "prereg_email", prereg_id).await;

    let (status, body) =
        post_json(&app, "/api/auth/verify-email", json!({ "email": email, "otp": otp })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["registration_complete"], true);

    let college_code: String = sqlx::query_scalar(
        "SELECT cp.college_code FROM college_profiles cp
         JOIN users u ON u.id = cp.user_id WHERE u.email = $1",
    )
    .bind(&email)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(college_code.starts_with("COL-"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_rejects_staff_roles(pool: PgPool) {
    let app = test_app(pool.clone());

    for role in ["admin", "counsellor"] {
        let (status, body) = post_json(
            &app,
            "/api/auth/register",
            register_body(&generate_unique_email(role), None, role),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains(role));
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_requires_name_for_student(pool: PgPool) {
    let app = test_app(pool.clone());
    let mut body = register_body(&generate_unique_email("noname"), None, "student");
    body["name"] = serde_json::Value::Null;

    let (status, _) = post_json(&app, "/api/auth/register", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_conflicts_with_existing_account(pool: PgPool) {
    let app = test_app(pool.clone());
    let email = generate_unique_email("taken");
    create_verified_user(&pool, &email, None, UserType::Student, "password123").await;

    let (status, _) =
        post_json(&app, "/api/auth/register", register_body(&email, None, "student")).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_password_mismatch(pool: PgPool) {
    let app = test_app(pool.clone());
    let mut body = register_body(&generate_unique_email("mismatch"), None, "student");
    body["password2"] = json!("different123");

    let (status, _) = post_json(&app, "/api/auth/register", body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_wrong_otp_rejected(pool: PgPool) {
    let app = test_app(pool.clone());
    let email = generate_unique_email("wrongotp");

    post_json(&app, "/api/auth/register", register_body(&email, None, "student")).await;
    let prereg_id = prereg_id_for_email(&pool, &email).await;
    let real = fetch_latest_otp(&pool, "prereg_email", prereg_id).await;
    let wrong = if real == "000000" { "111111" } else { "000000" };

    let (status, _) =
        post_json(&app, "/api/auth/verify-email", json!({ "email": email, "otp": wrong })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_expired_otp_rejected(pool: PgPool) {
    let app = test_app(pool.clone());
    let email = generate_unique_email("expired");

    post_json(&app, "/api/auth/register", register_body(&email, None, "student")).await;
    let prereg_id = prereg_id_for_email(&pool, &email).await;
    let otp = fetch_latest_otp(&pool, "prereg_email", prereg_id).await;

    sqlx::query(
        "UPDATE otp_codes SET created_at = NOW() - INTERVAL '601 seconds'
         WHERE subject_id = $1",
    )
    .bind(prereg_id)
    .execute(&pool)
    .await
    .unwrap();

    let (status, _) =
        post_json(&app, "/api/auth/verify-email", json!({ "email": email, "otp": otp })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reregistration_supersedes_previous_attempt(pool: PgPool) {
    let app = test_app(pool.clone());
    let email = generate_unique_email("retry");

    post_json(&app, "/api/auth/register", register_body(&email, None, "student")).await;
    let first_id = prereg_id_for_email(&pool, &email).await;

    post_json(&app, "/api/auth/register", register_body(&email, None, "student")).await;
    let second_id = prereg_id_for_email(&pool, &email).await;
    assert_ne!(first_id, second_id);

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM pre_registrations WHERE email = $1")
            .bind(&email)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 1);

    // The fresh attempt's code works.
    let otp = fetch_latest_otp(&pool, "prereg_email", second_id).await;
    let (status, _) =
        post_json(&app, "/api/auth/verify-email", json!({ "email": email, "otp": otp })).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_stale_pre_registration_rejected(pool: PgPool) {
    let app = test_app(pool.clone());
    let email = generate_unique_email("stale");

    post_json(&app, "/api/auth/register", register_body(&email, None, "student")).await;
    let prereg_id = prereg_id_for_email(&pool, &email).await;
    let otp = fetch_latest_otp(&pool, "prereg_email", prereg_id).await;

    sqlx::query("UPDATE pre_registrations SET created_at = NOW() - INTERVAL '8 days' WHERE id = $1")
        .bind(prereg_id)
        .execute(&pool)
        .await
        .unwrap();

    let (status, body) =
        post_json(&app, "/api/auth/verify-email", json!({ "email": email, "otp": otp })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("expired"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_profile_materializer_is_idempotent(pool: PgPool) {
    let email = generate_unique_email("idem");
    let user_id =
        create_verified_user(&pool, &email, None, UserType::Consultant, "password123").await;

    for _ in 0..2 {
        let mut tx = pool.begin().await.unwrap();
        ProfileService::materialize(&mut tx, user_id, UserType::Consultant, Some("Asha"))
            .await
            .unwrap();
        tx.commit().await.unwrap();
    }

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM consultant_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_resend_email_otp_for_pre_registration(pool: PgPool) {
    let app = test_app(pool.clone());
    let email = generate_unique_email("resend");

    post_json(&app, "/api/auth/register", register_body(&email, None, "student")).await;
    let prereg_id = prereg_id_for_email(&pool, &email).await;
    let first = fetch_latest_otp(&pool, "prereg_email", prereg_id).await;

    let (status, _) =
        post_json(&app, "/api/auth/resend-email-otp", json!({ "email": email })).await;
    assert_eq!(status, StatusCode::OK);

    // Exactly one active code remains.
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM otp_codes
         WHERE subject_type = 'prereg_email' AND subject_id = $1 AND verified = FALSE",
    )
    .bind(prereg_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);

    let second = fetch_latest_otp(&pool, "prereg_email", prereg_id).await;
    let (status, _) =
        post_json(&app, "/api/auth/verify-email", json!({ "email": email, "otp": second })).await;
    assert_eq!(status, StatusCode::OK);

    // The superseded code is useless even if it matches by chance.
    if first != second {
        let (status, _) =
            post_json(&app, "/api/auth/verify-email", json!({ "email": email, "otp": first }))
                .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_resend_target_is_404(pool: PgPool) {
    let app = test_app(pool.clone());
    let (status, _) = post_json(
        &app,
        "/api/auth/resend-email-otp",
        json!({ "email": generate_unique_email("ghost") }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

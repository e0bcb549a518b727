mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{
    auth_token, create_consultant_profile, create_verified_user, generate_unique_email,
    get_json, send_json, test_app,
};

use admitly::modules::users::model::UserType;

async fn consultant_with_profile(
    pool: &PgPool,
    consultant_type: &str,
    state: &str,
    district: Option<&str>,
    verified: bool,
) -> (uuid::Uuid, uuid::Uuid, String) {
    let email = generate_unique_email("consultant");
    let user_id =
        create_verified_user(pool, &email, None, UserType::Consultant, "password123").await;
    let profile_id =
        create_consultant_profile(pool, user_id, consultant_type, state, district, verified).await;
    let token = auth_token(user_id, &email, UserType::Consultant);
    (user_id, profile_id, token)
}

#[sqlx::test(migrations = "./migrations")]
async fn test_consultant_can_claim_state_tier(pool: PgPool) {
    let app = test_app(pool.clone());
    let (_, _, token) = consultant_with_profile(&pool, "pending", "", None, false).await;

    let (status, body) = send_json(
        &app,
        "PUT",
        "/api/consultants/me",
        Some(&token),
        Some(json!({ "consultant_type": "state", "state": "Kerala" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["consultant_type"], "state");
    assert_eq!(body["state"], "Kerala");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_second_state_consultant_is_rejected(pool: PgPool) {
    let app = test_app(pool.clone());
    consultant_with_profile(&pool, "state", "Kerala", None, true).await;
    let (_, _, token) = consultant_with_profile(&pool, "pending", "", None, false).await;

    let (status, body) = send_json(
        &app,
        "PUT",
        "/api/consultants/me",
        Some(&token),
        Some(json!({ "consultant_type": "state", "state": "Kerala" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("Kerala"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_state_consultant_can_update_own_row(pool: PgPool) {
    let app = test_app(pool.clone());
    let (_, _, token) = consultant_with_profile(&pool, "state", "Kerala", None, true).await;

    // Saving again with the same tier must not conflict with itself.
    let (status, _) = send_json(
        &app,
        "PUT",
        "/api/consultants/me",
        Some(&token),
        Some(json!({ "consultant_type": "state", "state": "Kerala", "phone": "9876543210" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_district_consultant_auto_parents_to_state(pool: PgPool) {
    let app = test_app(pool.clone());
    let (_, state_profile_id, _) =
        consultant_with_profile(&pool, "state", "Kerala", None, true).await;
    let (_, _, token) = consultant_with_profile(&pool, "pending", "", None, false).await;

    let (status, body) = send_json(
        &app,
        "PUT",
        "/api/consultants/me",
        Some(&token),
        Some(json!({
            "consultant_type": "district",
            "state": "Kerala",
            "district": "Ernakulam",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["parent_consultant_id"], state_profile_id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_district_without_state_consultant_has_no_parent(pool: PgPool) {
    let app = test_app(pool.clone());
    let (_, _, token) = consultant_with_profile(&pool, "pending", "", None, false).await;

    let (status, body) = send_json(
        &app,
        "PUT",
        "/api/consultants/me",
        Some(&token),
        Some(json!({
            "consultant_type": "district",
            "state": "Goa",
            "district": "North Goa",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["parent_consultant_id"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unrelated_update_keeps_existing_parent(pool: PgPool) {
    let app = test_app(pool.clone());
    let (_, state_profile_id, _) =
        consultant_with_profile(&pool, "state", "Kerala", None, true).await;
    let (_, _, token) = consultant_with_profile(&pool, "pending", "", None, false).await;

    let (status, body) = send_json(
        &app,
        "PUT",
        "/api/consultants/me",
        Some(&token),
        Some(json!({
            "consultant_type": "district",
            "state": "Kerala",
            "district": "Ernakulam",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["parent_consultant_id"], state_profile_id.to_string());

    // The state consultant loses verification; the established link must
    // survive a save that touches nothing region-related.
    sqlx::query("UPDATE consultant_profiles SET verified = FALSE WHERE id = $1")
        .bind(state_profile_id)
        .execute(&pool)
        .await
        .unwrap();

    let (status, body) = send_json(
        &app,
        "PUT",
        "/api/consultants/me",
        Some(&token),
        Some(json!({ "phone": "9876543210" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phone"], "9876543210");
    assert_eq!(body["parent_consultant_id"], state_profile_id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_approval_is_staff_only(pool: PgPool) {
    let app = test_app(pool.clone());
    let (_, profile_id, consultant_token) =
        consultant_with_profile(&pool, "state", "Kerala", None, false).await;

    let (status, _) = send_json(
        &app,
        "POST",
        &format!("/api/consultants/{profile_id}/approve"),
        Some(&consultant_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin_email = generate_unique_email("admin");
    let admin_id =
        create_verified_user(&pool, &admin_email, None, UserType::Admin, "password123").await;
    let admin_token = auth_token(admin_id, &admin_email, UserType::Admin);

    let (status, body) = send_json(
        &app,
        "POST",
        &format!("/api/consultants/{profile_id}/approve"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verified"], true);
    assert_eq!(body["approved_by"], admin_id.to_string());
    assert!(body["approved_at"].is_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_assigned_to_district_consultant(pool: PgPool) {
    let app = test_app(pool.clone());
    consultant_with_profile(&pool, "state", "Kerala", None, true).await;
    let (_, district_profile_id, _) =
        consultant_with_profile(&pool, "district", "Kerala", Some("Ernakulam"), true).await;

    let email = generate_unique_email("student");
    let student_user_id =
        create_verified_user(&pool, &email, None, UserType::Student, "password123").await;
    sqlx::query("INSERT INTO student_profiles (user_id, student_code) VALUES ($1, 'STU-TEST01')")
        .bind(student_user_id)
        .execute(&pool)
        .await
        .unwrap();
    let token = auth_token(student_user_id, &email, UserType::Student);

    let (status, body) = send_json(
        &app,
        "PUT",
        "/api/students/me",
        Some(&token),
        Some(json!({ "state": "Kerala", "district": "Ernakulam" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["assigned_consultant_id"], district_profile_id.to_string());

    let total: i32 =
        sqlx::query_scalar("SELECT total_students FROM consultant_profiles WHERE id = $1")
            .bind(district_profile_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(total, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_falls_back_to_state_consultant(pool: PgPool) {
    let app = test_app(pool.clone());
    let (_, state_profile_id, _) =
        consultant_with_profile(&pool, "state", "Kerala", None, true).await;
    // District consultant exists but is unverified, so it is skipped.
    consultant_with_profile(&pool, "district", "Kerala", Some("Kollam"), false).await;

    let email = generate_unique_email("student");
    let student_user_id =
        create_verified_user(&pool, &email, None, UserType::Student, "password123").await;
    sqlx::query("INSERT INTO student_profiles (user_id, student_code) VALUES ($1, 'STU-TEST02')")
        .bind(student_user_id)
        .execute(&pool)
        .await
        .unwrap();
    let token = auth_token(student_user_id, &email, UserType::Student);

    let (status, body) = send_json(
        &app,
        "PUT",
        "/api/students/me",
        Some(&token),
        Some(json!({ "state": "Kerala", "district": "Kollam" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["assigned_consultant_id"], state_profile_id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_unassigned_when_no_consultant_covers_region(pool: PgPool) {
    let app = test_app(pool.clone());

    let email = generate_unique_email("student");
    let student_user_id =
        create_verified_user(&pool, &email, None, UserType::Student, "password123").await;
    sqlx::query("INSERT INTO student_profiles (user_id, student_code) VALUES ($1, 'STU-TEST03')")
        .bind(student_user_id)
        .execute(&pool)
        .await
        .unwrap();
    let token = auth_token(student_user_id, &email, UserType::Student);

    let (status, body) = send_json(
        &app,
        "PUT",
        "/api/students/me",
        Some(&token),
        Some(json!({ "state": "Sikkim", "district": "Gangtok" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["assigned_consultant_id"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_profile_completion_flag(pool: PgPool) {
    let app = test_app(pool.clone());

    let email = generate_unique_email("student");
    let student_user_id =
        create_verified_user(&pool, &email, None, UserType::Student, "password123").await;
    sqlx::query("INSERT INTO student_profiles (user_id, student_code) VALUES ($1, 'STU-TEST04')")
        .bind(student_user_id)
        .execute(&pool)
        .await
        .unwrap();
    let token = auth_token(student_user_id, &email, UserType::Student);

    let (status, body) = send_json(
        &app,
        "PUT",
        "/api/students/me",
        Some(&token),
        Some(json!({ "state": "Kerala", "district": "Ernakulam" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile_completed"], false);

    let (status, body) = send_json(
        &app,
        "PUT",
        "/api/students/me",
        Some(&token),
        Some(json!({
            "date_of_birth": "2006-04-12",
            "address": "12 Lake Road",
            "education_level": "12th",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile_completed"], true);

    let (status, body) = get_json(&app, "/api/users/me/profile-status", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_profile_complete"], true);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_consultant_listing_filters(pool: PgPool) {
    let app = test_app(pool.clone());
    consultant_with_profile(&pool, "state", "Kerala", None, true).await;
    consultant_with_profile(&pool, "district", "Kerala", Some("Ernakulam"), false).await;

    let admin_email = generate_unique_email("admin");
    let admin_id =
        create_verified_user(&pool, &admin_email, None, UserType::Admin, "password123").await;
    let admin_token = auth_token(admin_id, &admin_email, UserType::Admin);

    let (status, body) = get_json(
        &app,
        "/api/consultants?state=Kerala&verified=true",
        Some(&admin_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["consultant_type"], "state");
}

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use common::{
    auth_token, create_college_profile, create_verified_user, generate_unique_email, get_json,
    send_json, test_app,
};

use admitly::modules::users::model::UserType;

async fn college_with_profile(pool: &PgPool) -> (Uuid, String) {
    let email = generate_unique_email("college");
    let user_id =
        create_verified_user(pool, &email, None, UserType::College, "password123").await;
    let (college_id, _) =
        create_college_profile(pool, user_id, "Resource College", "Kerala", "Kollam", true).await;
    let token = auth_token(user_id, &email, UserType::College);
    (college_id, token)
}

#[sqlx::test(migrations = "./migrations")]
async fn test_course_crud(pool: PgPool) {
    let app = test_app(pool.clone());
    let (college_id, token) = college_with_profile(&pool).await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/courses",
        Some(&token),
        Some(json!({
            "main_stream": "Engineering",
            "degree": "BTech",
            "level": "UG",
            "specialization": "Computer Science",
            "fee": 250000,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["college_id"], college_id.to_string());
    let course_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = get_json(&app, "/api/courses", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/api/courses/{course_id}"),
        Some(&token),
        Some(json!({
            "main_stream": "Engineering",
            "degree": "BTech",
            "level": "UG",
            "specialization": "Electronics",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["specialization"], "Electronics");
    assert!(body["fee"].is_null());

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/api/courses/{course_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = get_json(&app, "/api/courses", Some(&token)).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_resource_listing_is_scoped_to_owner(pool: PgPool) {
    let app = test_app(pool.clone());
    let (_, token_a) = college_with_profile(&pool).await;
    let (_, token_b) = college_with_profile(&pool).await;

    send_json(
        &app,
        "POST",
        "/api/events",
        Some(&token_a),
        Some(json!({ "name": "Open Day", "date": "2026-09-15" })),
    )
    .await;

    let (_, body) = get_json(&app, "/api/events", Some(&token_a)).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = get_json(&app, "/api/events", Some(&token_b)).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cannot_mutate_another_colleges_resource(pool: PgPool) {
    let app = test_app(pool.clone());
    let (_, token_a) = college_with_profile(&pool).await;
    let (_, token_b) = college_with_profile(&pool).await;

    let (_, body) = send_json(
        &app,
        "POST",
        "/api/hostels",
        Some(&token_a),
        Some(json!({ "name": "North Block", "capacity": 120 })),
    )
    .await;
    let hostel_id = body["id"].as_str().unwrap().to_string();

    let (status, _) = send_json(
        &app,
        "PUT",
        &format!("/api/hostels/{hostel_id}"),
        Some(&token_b),
        Some(json!({ "name": "Hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/api/hostels/{hostel_id}"),
        Some(&token_b),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Still intact for the owner.
    let (_, body) = get_json(&app, "/api/hostels", Some(&token_a)).await;
    assert_eq!(body[0]["name"], "North Block");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_non_college_roles_cannot_touch_resources(pool: PgPool) {
    let app = test_app(pool.clone());

    let email = generate_unique_email("student");
    let user_id =
        create_verified_user(&pool, &email, None, UserType::Student, "password123").await;
    let token = auth_token(user_id, &email, UserType::Student);

    let (status, _) = get_json(&app, "/api/courses", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/gallery",
        Some(&token),
        Some(json!({ "media_type": "image", "title": "Campus" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_gallery_and_faculty_ordering(pool: PgPool) {
    let app = test_app(pool.clone());
    let (_, token) = college_with_profile(&pool).await;

    for (title, order) in [("Second", 2), ("First", 1)] {
        send_json(
            &app,
            "POST",
            "/api/gallery",
            Some(&token),
            Some(json!({ "media_type": "image", "title": title, "display_order": order })),
        )
        .await;
    }

    let (_, body) = get_json(&app, "/api/gallery", Some(&token)).await;
    assert_eq!(body[0]["title"], "First");
    assert_eq!(body[1]["title"], "Second");

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/faculty",
        Some(&token),
        Some(json!({ "name": "Dr. Rao", "department": "Physics" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["is_active"], true);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_resource_validation(pool: PgPool) {
    let app = test_app(pool.clone());
    let (_, token) = college_with_profile(&pool).await;

    // Empty degree trips field validation.
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/courses",
        Some(&token),
        Some(json!({
            "main_stream": "Engineering",
            "degree": "",
            "level": "UG",
            "specialization": "Computer Science",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Missing required field is a 400.
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/events",
        Some(&token),
        Some(json!({ "date": "2026-09-15" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

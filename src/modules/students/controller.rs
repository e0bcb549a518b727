use axum::Json;
use axum::extract::{Query, State};
use tracing::instrument;

use crate::middleware::auth::{AuthUser, StaffUser};
use crate::modules::students::model::{
    PaginatedStudentsResponse, StudentFilterParams, StudentProfile,
    UpdateStudentProfileRequest,
};
use crate::modules::students::service::StudentService;
use crate::modules::users::model::UserType;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

fn require_student(auth: &AuthUser) -> Result<(), AppError> {
    if auth.user_type() != UserType::Student {
        return Err(AppError::forbidden("Student access required"));
    }
    Ok(())
}

/// Get the caller's student profile.
#[utoipa::path(
    get,
    path = "/api/students/me",
    tag = "Students",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Student profile", body = StudentProfile),
        (status = 403, description = "Not a student account"),
        (status = 404, description = "Profile not found"),
    )
)]
#[instrument(skip(state, auth))]
pub async fn my_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<StudentProfile>, AppError> {
    require_student(&auth)?;
    let profile = StudentService::get_by_user(&state.db, auth.user_id()?).await?;
    Ok(Json(profile))
}

/// Update the caller's student profile. Completing the region fields
/// triggers consultant assignment.
#[utoipa::path(
    put,
    path = "/api/students/me",
    tag = "Students",
    security(("bearer_auth" = [])),
    request_body = UpdateStudentProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = StudentProfile),
        (status = 403, description = "Not a student account"),
    )
)]
#[instrument(skip(state, auth, request))]
pub async fn update_my_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateStudentProfileRequest>,
) -> Result<Json<StudentProfile>, AppError> {
    require_student(&auth)?;
    let profile = StudentService::update_own(&state, auth.user_id()?, request).await?;
    Ok(Json(profile))
}

/// List student profiles. Staff only.
#[utoipa::path(
    get,
    path = "/api/students",
    tag = "Students",
    security(("bearer_auth" = [])),
    params(
        ("state" = Option<String>, Query, description = "Exact state filter"),
        ("district" = Option<String>, Query, description = "Exact district filter"),
        ("assigned_consultant_id" = Option<uuid::Uuid>, Query, description = "Assignment filter"),
        ("profile_completed" = Option<bool>, Query, description = "Completion filter"),
        ("limit" = Option<i64>, Query, description = "Page size (max 100)"),
        ("offset" = Option<i64>, Query, description = "Rows to skip"),
    ),
    responses(
        (status = 200, description = "Students page", body = PaginatedStudentsResponse),
        (status = 403, description = "Not a staff account"),
    )
)]
#[instrument(skip(state, _staff))]
pub async fn list_students(
    State(state): State<AppState>,
    _staff: StaffUser,
    Query(filters): Query<StudentFilterParams>,
) -> Result<Json<PaginatedStudentsResponse>, AppError> {
    let (profiles, meta) = StudentService::list(&state.db, &filters).await?;
    Ok(Json(PaginatedStudentsResponse { data: profiles, meta }))
}

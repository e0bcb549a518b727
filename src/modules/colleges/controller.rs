use axum::Json;
use axum::extract::{Path, Query, State};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::colleges::model::{
    CollegeDetailResponse, CollegeProfile, CollegeSearchParams, PaginatedCollegesResponse,
    UpdateCollegeProfileRequest,
};
use crate::modules::colleges::service::CollegeService;
use crate::modules::users::model::UserType;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

fn require_college(auth: &AuthUser) -> Result<(), AppError> {
    if auth.user_type() != UserType::College {
        return Err(AppError::forbidden("College access required"));
    }
    Ok(())
}

/// Get the caller's college profile.
#[utoipa::path(
    get,
    path = "/api/colleges/me",
    tag = "Colleges",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "College profile", body = CollegeProfile),
        (status = 403, description = "Not a college account"),
    )
)]
#[instrument(skip(state, auth))]
pub async fn my_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<CollegeProfile>, AppError> {
    require_college(&auth)?;
    let profile = CollegeService::get_or_create_own(&state.db, auth.user_id()?).await?;
    Ok(Json(profile))
}

/// Update the caller's college profile.
#[utoipa::path(
    put,
    path = "/api/colleges/me",
    tag = "Colleges",
    security(("bearer_auth" = [])),
    request_body = UpdateCollegeProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = CollegeProfile),
        (status = 403, description = "Not a college account"),
    )
)]
#[instrument(skip(state, auth, request))]
pub async fn update_my_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateCollegeProfileRequest>,
) -> Result<Json<CollegeProfile>, AppError> {
    require_college(&auth)?;
    let profile = CollegeService::update_own(&state.db, auth.user_id()?, request).await?;
    Ok(Json(profile))
}

/// Public college search. No authentication required.
#[utoipa::path(
    get,
    path = "/api/colleges",
    tag = "Colleges",
    params(
        ("country" = Option<String>, Query, description = "Substring match on country"),
        ("state" = Option<String>, Query, description = "Substring match on state"),
        ("district" = Option<String>, Query, description = "Substring match on district"),
        ("college_type" = Option<String>, Query, description = "Exact type filter"),
        ("accreditation_body" = Option<String>, Query, description = "Substring match"),
        ("main_stream" = Option<String>, Query, description = "Offered course stream"),
        ("verified" = Option<bool>, Query, description = "Approval filter"),
        ("is_popular" = Option<bool>, Query, description = "Popular flag"),
        ("is_featured" = Option<bool>, Query, description = "Featured flag"),
        ("search" = Option<String>, Query, description = "Free-text name/description match"),
        ("limit" = Option<i64>, Query, description = "Page size (max 100)"),
        ("offset" = Option<i64>, Query, description = "Rows to skip"),
    ),
    responses(
        (status = 200, description = "Colleges page", body = PaginatedCollegesResponse),
    )
)]
#[instrument(skip(state))]
pub async fn search_colleges(
    State(state): State<AppState>,
    Query(params): Query<CollegeSearchParams>,
) -> Result<Json<PaginatedCollegesResponse>, AppError> {
    let (colleges, meta) = CollegeService::search(&state.db, &params).await?;
    Ok(Json(PaginatedCollegesResponse { data: colleges, meta }))
}

/// Public college detail by code, with courses, events, gallery, faculty and
/// hostels inlined.
#[utoipa::path(
    get,
    path = "/api/colleges/{college_code}",
    tag = "Colleges",
    params(("college_code" = String, Path, description = "Public college code")),
    responses(
        (status = 200, description = "College detail", body = CollegeDetailResponse),
        (status = 404, description = "Unknown college code"),
    )
)]
#[instrument(skip(state))]
pub async fn college_detail(
    State(state): State<AppState>,
    Path(college_code): Path<String>,
) -> Result<Json<CollegeDetailResponse>, AppError> {
    let detail = CollegeService::public_detail(&state.db, &college_code).await?;
    Ok(Json(detail))
}

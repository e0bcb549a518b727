use axum::Json;
use axum::extract::{Path, Query, State};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::{AuthUser, StaffUser};
use crate::modules::consultants::model::{
    ConsultantFilterParams, ConsultantProfile, PaginatedConsultantsResponse,
    UpdateConsultantProfileRequest,
};
use crate::modules::consultants::service::ConsultantService;
use crate::modules::users::model::UserType;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

fn require_consultant(auth: &AuthUser) -> Result<(), AppError> {
    if auth.user_type() != UserType::Consultant {
        return Err(AppError::forbidden("Consultant access required"));
    }
    Ok(())
}

/// Get the caller's consultant profile.
#[utoipa::path(
    get,
    path = "/api/consultants/me",
    tag = "Consultants",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Consultant profile", body = ConsultantProfile),
        (status = 403, description = "Not a consultant account"),
        (status = 404, description = "Profile not found"),
    )
)]
#[instrument(skip(state, auth))]
pub async fn my_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ConsultantProfile>, AppError> {
    require_consultant(&auth)?;
    let profile = ConsultantService::get_by_user(&state.db, auth.user_id()?).await?;
    Ok(Json(profile))
}

/// Update the caller's consultant profile.
#[utoipa::path(
    put,
    path = "/api/consultants/me",
    tag = "Consultants",
    security(("bearer_auth" = [])),
    request_body = UpdateConsultantProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ConsultantProfile),
        (status = 403, description = "Not a consultant account"),
        (status = 409, description = "State consultant slot already taken"),
    )
)]
#[instrument(skip(state, auth, request))]
pub async fn update_my_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateConsultantProfileRequest>,
) -> Result<Json<ConsultantProfile>, AppError> {
    require_consultant(&auth)?;
    let profile = ConsultantService::update_own(&state, auth.user_id()?, request).await?;
    Ok(Json(profile))
}

/// List consultant profiles. Staff only.
#[utoipa::path(
    get,
    path = "/api/consultants",
    tag = "Consultants",
    security(("bearer_auth" = [])),
    params(
        ("state" = Option<String>, Query, description = "Exact state filter"),
        ("district" = Option<String>, Query, description = "Exact district filter"),
        ("consultant_type" = Option<String>, Query, description = "Tier filter"),
        ("verified" = Option<bool>, Query, description = "Approval filter"),
        ("limit" = Option<i64>, Query, description = "Page size (max 100)"),
        ("offset" = Option<i64>, Query, description = "Rows to skip"),
    ),
    responses(
        (status = 200, description = "Consultants page", body = PaginatedConsultantsResponse),
        (status = 403, description = "Not a staff account"),
    )
)]
#[instrument(skip(state, _staff))]
pub async fn list_consultants(
    State(state): State<AppState>,
    _staff: StaffUser,
    Query(filters): Query<ConsultantFilterParams>,
) -> Result<Json<PaginatedConsultantsResponse>, AppError> {
    let (profiles, meta) = ConsultantService::list(&state.db, &filters).await?;
    Ok(Json(PaginatedConsultantsResponse { data: profiles, meta }))
}

/// Approve a consultant. Staff only.
#[utoipa::path(
    post,
    path = "/api/consultants/{id}/approve",
    tag = "Consultants",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Consultant profile id")),
    responses(
        (status = 200, description = "Approved profile", body = ConsultantProfile),
        (status = 403, description = "Not a staff account"),
        (status = 404, description = "Profile not found"),
    )
)]
#[instrument(skip(state, staff))]
pub async fn approve_consultant(
    State(state): State<AppState>,
    staff: StaffUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ConsultantProfile>, AppError> {
    let profile = ConsultantService::approve(&state, staff.user_id()?, id).await?;
    Ok(Json(profile))
}

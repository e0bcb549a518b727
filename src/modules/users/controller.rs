use axum::Json;
use axum::extract::{Query, State};
use tracing::instrument;

use crate::middleware::auth::{AuthUser, StaffUser};
use crate::modules::users::model::{
    PaginatedUsersResponse, ProfileStatusResponse, User, UserFilterParams,
};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Get the authenticated user's account.
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated"),
    )
)]
#[instrument(skip(state, auth))]
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<User>, AppError> {
    let user = UserService::get_by_id(&state.db, auth.user_id()?).await?;
    Ok(Json(user))
}

/// Report whether the caller's role profile is complete.
#[utoipa::path(
    get,
    path = "/api/users/me/profile-status",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile completion status", body = ProfileStatusResponse),
        (status = 401, description = "Not authenticated"),
    )
)]
#[instrument(skip(state, auth))]
pub async fn profile_status(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ProfileStatusResponse>, AppError> {
    let user = UserService::get_by_id(&state.db, auth.user_id()?).await?;
    Ok(Json(ProfileStatusResponse {
        user_type: user.user_type,
        is_profile_complete: user.is_profile_complete,
    }))
}

/// List user accounts. Staff only.
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("email" = Option<String>, Query, description = "Substring match on email"),
        ("name" = Option<String>, Query, description = "Substring match on name"),
        ("user_type" = Option<String>, Query, description = "Exact role filter"),
        ("limit" = Option<i64>, Query, description = "Page size (max 100)"),
        ("offset" = Option<i64>, Query, description = "Rows to skip"),
    ),
    responses(
        (status = 200, description = "Users page", body = PaginatedUsersResponse),
        (status = 403, description = "Not a staff account"),
    )
)]
#[instrument(skip(state, _staff))]
pub async fn list_users(
    State(state): State<AppState>,
    _staff: StaffUser,
    Query(filters): Query<UserFilterParams>,
) -> Result<Json<PaginatedUsersResponse>, AppError> {
    let (users, meta) = UserService::list(&state.db, &filters).await?;
    Ok(Json(PaginatedUsersResponse { data: users, meta }))
}

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::resources::model::{
    Course, CourseRequest, Event, EventRequest, Faculty, FacultyRequest, GalleryItem,
    GalleryItemRequest, Hostel, HostelRequest,
};
use crate::modules::resources::service::{
    CourseService, EventService, FacultyService, GalleryService, HostelService,
    require_college_profile,
};
use crate::modules::users::model::UserType;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

async fn own_college_id(state: &AppState, auth: &AuthUser) -> Result<Uuid, AppError> {
    if auth.user_type() != UserType::College {
        return Err(AppError::forbidden("College access required"));
    }
    require_college_profile(&state.db, auth.user_id()?).await
}

// Courses

#[utoipa::path(
    get, path = "/api/courses", tag = "Resources",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Own courses", body = [Course]))
)]
#[instrument(skip(state, auth))]
pub async fn list_courses(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Course>>, AppError> {
    let college_id = own_college_id(&state, &auth).await?;
    Ok(Json(CourseService::list_for_college(&state.db, college_id).await?))
}

#[utoipa::path(
    post, path = "/api/courses", tag = "Resources",
    security(("bearer_auth" = [])),
    request_body = CourseRequest,
    responses((status = 201, description = "Course created", body = Course))
)]
#[instrument(skip(state, auth, request))]
pub async fn create_course(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CourseRequest>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let college_id = own_college_id(&state, &auth).await?;
    let course = CourseService::create(&state.db, college_id, request).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

#[utoipa::path(
    put, path = "/api/courses/{id}", tag = "Resources",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course id")),
    request_body = CourseRequest,
    responses((status = 200, description = "Course updated", body = Course))
)]
#[instrument(skip(state, auth, request))]
pub async fn update_course(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<CourseRequest>,
) -> Result<Json<Course>, AppError> {
    let college_id = own_college_id(&state, &auth).await?;
    Ok(Json(CourseService::update(&state.db, college_id, id, request).await?))
}

#[utoipa::path(
    delete, path = "/api/courses/{id}", tag = "Resources",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course id")),
    responses((status = 204, description = "Course deleted"))
)]
#[instrument(skip(state, auth))]
pub async fn delete_course(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let college_id = own_college_id(&state, &auth).await?;
    CourseService::delete(&state.db, college_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Events

#[utoipa::path(
    get, path = "/api/events", tag = "Resources",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Own events", body = [Event]))
)]
#[instrument(skip(state, auth))]
pub async fn list_events(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Event>>, AppError> {
    let college_id = own_college_id(&state, &auth).await?;
    Ok(Json(EventService::list_for_college(&state.db, college_id).await?))
}

#[utoipa::path(
    post, path = "/api/events", tag = "Resources",
    security(("bearer_auth" = [])),
    request_body = EventRequest,
    responses((status = 201, description = "Event created", body = Event))
)]
#[instrument(skip(state, auth, request))]
pub async fn create_event(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<EventRequest>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    let college_id = own_college_id(&state, &auth).await?;
    let event = EventService::create(&state.db, college_id, request).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

#[utoipa::path(
    put, path = "/api/events/{id}", tag = "Resources",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Event id")),
    request_body = EventRequest,
    responses((status = 200, description = "Event updated", body = Event))
)]
#[instrument(skip(state, auth, request))]
pub async fn update_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<EventRequest>,
) -> Result<Json<Event>, AppError> {
    let college_id = own_college_id(&state, &auth).await?;
    Ok(Json(EventService::update(&state.db, college_id, id, request).await?))
}

#[utoipa::path(
    delete, path = "/api/events/{id}", tag = "Resources",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Event id")),
    responses((status = 204, description = "Event deleted"))
)]
#[instrument(skip(state, auth))]
pub async fn delete_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let college_id = own_college_id(&state, &auth).await?;
    EventService::delete(&state.db, college_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Gallery

#[utoipa::path(
    get, path = "/api/gallery", tag = "Resources",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Own gallery items", body = [GalleryItem]))
)]
#[instrument(skip(state, auth))]
pub async fn list_gallery(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<GalleryItem>>, AppError> {
    let college_id = own_college_id(&state, &auth).await?;
    Ok(Json(GalleryService::list_for_college(&state.db, college_id).await?))
}

#[utoipa::path(
    post, path = "/api/gallery", tag = "Resources",
    security(("bearer_auth" = [])),
    request_body = GalleryItemRequest,
    responses((status = 201, description = "Gallery item created", body = GalleryItem))
)]
#[instrument(skip(state, auth, request))]
pub async fn create_gallery_item(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<GalleryItemRequest>,
) -> Result<(StatusCode, Json<GalleryItem>), AppError> {
    let college_id = own_college_id(&state, &auth).await?;
    let item = GalleryService::create(&state.db, college_id, request).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    put, path = "/api/gallery/{id}", tag = "Resources",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Gallery item id")),
    request_body = GalleryItemRequest,
    responses((status = 200, description = "Gallery item updated", body = GalleryItem))
)]
#[instrument(skip(state, auth, request))]
pub async fn update_gallery_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<GalleryItemRequest>,
) -> Result<Json<GalleryItem>, AppError> {
    let college_id = own_college_id(&state, &auth).await?;
    Ok(Json(GalleryService::update(&state.db, college_id, id, request).await?))
}

#[utoipa::path(
    delete, path = "/api/gallery/{id}", tag = "Resources",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Gallery item id")),
    responses((status = 204, description = "Gallery item deleted"))
)]
#[instrument(skip(state, auth))]
pub async fn delete_gallery_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let college_id = own_college_id(&state, &auth).await?;
    GalleryService::delete(&state.db, college_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Faculty

#[utoipa::path(
    get, path = "/api/faculty", tag = "Resources",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Own faculty entries", body = [Faculty]))
)]
#[instrument(skip(state, auth))]
pub async fn list_faculty(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Faculty>>, AppError> {
    let college_id = own_college_id(&state, &auth).await?;
    Ok(Json(FacultyService::list_for_college(&state.db, college_id).await?))
}

#[utoipa::path(
    post, path = "/api/faculty", tag = "Resources",
    security(("bearer_auth" = [])),
    request_body = FacultyRequest,
    responses((status = 201, description = "Faculty entry created", body = Faculty))
)]
#[instrument(skip(state, auth, request))]
pub async fn create_faculty(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<FacultyRequest>,
) -> Result<(StatusCode, Json<Faculty>), AppError> {
    let college_id = own_college_id(&state, &auth).await?;
    let faculty = FacultyService::create(&state.db, college_id, request).await?;
    Ok((StatusCode::CREATED, Json(faculty)))
}

#[utoipa::path(
    put, path = "/api/faculty/{id}", tag = "Resources",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Faculty id")),
    request_body = FacultyRequest,
    responses((status = 200, description = "Faculty entry updated", body = Faculty))
)]
#[instrument(skip(state, auth, request))]
pub async fn update_faculty(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<FacultyRequest>,
) -> Result<Json<Faculty>, AppError> {
    let college_id = own_college_id(&state, &auth).await?;
    Ok(Json(FacultyService::update(&state.db, college_id, id, request).await?))
}

#[utoipa::path(
    delete, path = "/api/faculty/{id}", tag = "Resources",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Faculty id")),
    responses((status = 204, description = "Faculty entry deleted"))
)]
#[instrument(skip(state, auth))]
pub async fn delete_faculty(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let college_id = own_college_id(&state, &auth).await?;
    FacultyService::delete(&state.db, college_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Hostels

#[utoipa::path(
    get, path = "/api/hostels", tag = "Resources",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Own hostels", body = [Hostel]))
)]
#[instrument(skip(state, auth))]
pub async fn list_hostels(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Hostel>>, AppError> {
    let college_id = own_college_id(&state, &auth).await?;
    Ok(Json(HostelService::list_for_college(&state.db, college_id).await?))
}

#[utoipa::path(
    post, path = "/api/hostels", tag = "Resources",
    security(("bearer_auth" = [])),
    request_body = HostelRequest,
    responses((status = 201, description = "Hostel created", body = Hostel))
)]
#[instrument(skip(state, auth, request))]
pub async fn create_hostel(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<HostelRequest>,
) -> Result<(StatusCode, Json<Hostel>), AppError> {
    let college_id = own_college_id(&state, &auth).await?;
    let hostel = HostelService::create(&state.db, college_id, request).await?;
    Ok((StatusCode::CREATED, Json(hostel)))
}

#[utoipa::path(
    put, path = "/api/hostels/{id}", tag = "Resources",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Hostel id")),
    request_body = HostelRequest,
    responses((status = 200, description = "Hostel updated", body = Hostel))
)]
#[instrument(skip(state, auth, request))]
pub async fn update_hostel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<HostelRequest>,
) -> Result<Json<Hostel>, AppError> {
    let college_id = own_college_id(&state, &auth).await?;
    Ok(Json(HostelService::update(&state.db, college_id, id, request).await?))
}

#[utoipa::path(
    delete, path = "/api/hostels/{id}", tag = "Resources",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Hostel id")),
    responses((status = 204, description = "Hostel deleted"))
)]
#[instrument(skip(state, auth))]
pub async fn delete_hostel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let college_id = own_college_id(&state, &auth).await?;
    HostelService::delete(&state.db, college_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

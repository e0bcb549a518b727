use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::resources::model::{
    Course, CourseRequest, Event, EventRequest, Faculty, FacultyRequest, GalleryItem,
    GalleryItemRequest, Hostel, HostelRequest,
};
use crate::utils::errors::AppError;

/// The caller's college profile id. Resource mutation always goes through
/// this lookup, so only college accounts with a profile can own resources.
pub async fn require_college_profile(db: &PgPool, user_id: Uuid) -> Result<Uuid, AppError> {
    sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM college_profiles WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::forbidden("College profile required"))
}

/// Ownership gate shared by every update and delete: the row must exist and
/// belong to the caller's college.
async fn assert_owner(
    db: &PgPool,
    table: &str,
    id: Uuid,
    college_id: Uuid,
) -> Result<(), AppError> {
    debug_assert!(matches!(
        table,
        "courses" | "events" | "gallery_items" | "faculties" | "hostels"
    ));
    let owner = sqlx::query_scalar::<_, Uuid>(&format!(
        "SELECT college_id FROM {table} WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::not_found("Resource not found"))?;

    if owner != college_id {
        return Err(AppError::forbidden("Resource belongs to another college"));
    }
    Ok(())
}

async fn delete_resource(
    db: &PgPool,
    table: &str,
    id: Uuid,
    college_id: Uuid,
) -> Result<(), AppError> {
    assert_owner(db, table, id, college_id).await?;
    sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

pub struct CourseService;

impl CourseService {
    #[instrument(skip(db))]
    pub async fn list_for_college(db: &PgPool, college_id: Uuid) -> Result<Vec<Course>, AppError> {
        let courses = sqlx::query_as::<_, Course>(
            "SELECT * FROM courses WHERE college_id = $1 ORDER BY main_stream, specialization",
        )
        .bind(college_id)
        .fetch_all(db)
        .await?;
        Ok(courses)
    }

    #[instrument(skip(db, request))]
    pub async fn create(
        db: &PgPool,
        college_id: Uuid,
        request: CourseRequest,
    ) -> Result<Course, AppError> {
        let course = sqlx::query_as::<_, Course>(
            "INSERT INTO courses
                 (college_id, main_stream, degree, level, specialization,
                  duration, fee, eligibility, description)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *",
        )
        .bind(college_id)
        .bind(&request.main_stream)
        .bind(&request.degree)
        .bind(&request.level)
        .bind(&request.specialization)
        .bind(&request.duration)
        .bind(request.fee)
        .bind(&request.eligibility)
        .bind(&request.description)
        .fetch_one(db)
        .await?;
        Ok(course)
    }

    #[instrument(skip(db, request))]
    pub async fn update(
        db: &PgPool,
        college_id: Uuid,
        id: Uuid,
        request: CourseRequest,
    ) -> Result<Course, AppError> {
        assert_owner(db, "courses", id, college_id).await?;
        let course = sqlx::query_as::<_, Course>(
            "UPDATE courses
             SET main_stream = $1, degree = $2, level = $3, specialization = $4,
                 duration = $5, fee = $6, eligibility = $7, description = $8,
                 updated_at = NOW()
             WHERE id = $9
             RETURNING *",
        )
        .bind(&request.main_stream)
        .bind(&request.degree)
        .bind(&request.level)
        .bind(&request.specialization)
        .bind(&request.duration)
        .bind(request.fee)
        .bind(&request.eligibility)
        .bind(&request.description)
        .bind(id)
        .fetch_one(db)
        .await?;
        Ok(course)
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, college_id: Uuid, id: Uuid) -> Result<(), AppError> {
        delete_resource(db, "courses", id, college_id).await
    }
}

pub struct EventService;

impl EventService {
    #[instrument(skip(db))]
    pub async fn list_for_college(db: &PgPool, college_id: Uuid) -> Result<Vec<Event>, AppError> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE college_id = $1 ORDER BY date DESC NULLS LAST",
        )
        .bind(college_id)
        .fetch_all(db)
        .await?;
        Ok(events)
    }

    #[instrument(skip(db, request))]
    pub async fn create(
        db: &PgPool,
        college_id: Uuid,
        request: EventRequest,
    ) -> Result<Event, AppError> {
        let event = sqlx::query_as::<_, Event>(
            "INSERT INTO events (college_id, name, date, location, description)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(college_id)
        .bind(&request.name)
        .bind(request.date)
        .bind(&request.location)
        .bind(&request.description)
        .fetch_one(db)
        .await?;
        Ok(event)
    }

    #[instrument(skip(db, request))]
    pub async fn update(
        db: &PgPool,
        college_id: Uuid,
        id: Uuid,
        request: EventRequest,
    ) -> Result<Event, AppError> {
        assert_owner(db, "events", id, college_id).await?;
        let event = sqlx::query_as::<_, Event>(
            "UPDATE events
             SET name = $1, date = $2, location = $3, description = $4
             WHERE id = $5
             RETURNING *",
        )
        .bind(&request.name)
        .bind(request.date)
        .bind(&request.location)
        .bind(&request.description)
        .bind(id)
        .fetch_one(db)
        .await?;
        Ok(event)
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, college_id: Uuid, id: Uuid) -> Result<(), AppError> {
        delete_resource(db, "events", id, college_id).await
    }
}

pub struct GalleryService;

impl GalleryService {
    #[instrument(skip(db))]
    pub async fn list_for_college(
        db: &PgPool,
        college_id: Uuid,
    ) -> Result<Vec<GalleryItem>, AppError> {
        let items = sqlx::query_as::<_, GalleryItem>(
            "SELECT * FROM gallery_items WHERE college_id = $1
             ORDER BY display_order, created_at",
        )
        .bind(college_id)
        .fetch_all(db)
        .await?;
        Ok(items)
    }

    #[instrument(skip(db, request))]
    pub async fn create(
        db: &PgPool,
        college_id: Uuid,
        request: GalleryItemRequest,
    ) -> Result<GalleryItem, AppError> {
        let item = sqlx::query_as::<_, GalleryItem>(
            "INSERT INTO gallery_items (college_id, media_type, title, description, display_order)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(college_id)
        .bind(&request.media_type)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.display_order.unwrap_or(0))
        .fetch_one(db)
        .await?;
        Ok(item)
    }

    #[instrument(skip(db, request))]
    pub async fn update(
        db: &PgPool,
        college_id: Uuid,
        id: Uuid,
        request: GalleryItemRequest,
    ) -> Result<GalleryItem, AppError> {
        assert_owner(db, "gallery_items", id, college_id).await?;
        let item = sqlx::query_as::<_, GalleryItem>(
            "UPDATE gallery_items
             SET media_type = $1, title = $2, description = $3, display_order = $4
             WHERE id = $5
             RETURNING *",
        )
        .bind(&request.media_type)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.display_order.unwrap_or(0))
        .bind(id)
        .fetch_one(db)
        .await?;
        Ok(item)
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, college_id: Uuid, id: Uuid) -> Result<(), AppError> {
        delete_resource(db, "gallery_items", id, college_id).await
    }
}

pub struct FacultyService;

impl FacultyService {
    #[instrument(skip(db))]
    pub async fn list_for_college(
        db: &PgPool,
        college_id: Uuid,
    ) -> Result<Vec<Faculty>, AppError> {
        let faculties = sqlx::query_as::<_, Faculty>(
            "SELECT * FROM faculties WHERE college_id = $1 ORDER BY display_order, name",
        )
        .bind(college_id)
        .fetch_all(db)
        .await?;
        Ok(faculties)
    }

    #[instrument(skip(db, request))]
    pub async fn create(
        db: &PgPool,
        college_id: Uuid,
        request: FacultyRequest,
    ) -> Result<Faculty, AppError> {
        let faculty = sqlx::query_as::<_, Faculty>(
            "INSERT INTO faculties
                 (college_id, name, designation, qualification, experience,
                  department, email, is_active, display_order)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *",
        )
        .bind(college_id)
        .bind(&request.name)
        .bind(&request.designation)
        .bind(&request.qualification)
        .bind(&request.experience)
        .bind(&request.department)
        .bind(&request.email)
        .bind(request.is_active.unwrap_or(true))
        .bind(request.display_order.unwrap_or(0))
        .fetch_one(db)
        .await?;
        Ok(faculty)
    }

    #[instrument(skip(db, request))]
    pub async fn update(
        db: &PgPool,
        college_id: Uuid,
        id: Uuid,
        request: FacultyRequest,
    ) -> Result<Faculty, AppError> {
        assert_owner(db, "faculties", id, college_id).await?;
        let faculty = sqlx::query_as::<_, Faculty>(
            "UPDATE faculties
             SET name = $1, designation = $2, qualification = $3, experience = $4,
                 department = $5, email = $6, is_active = $7, display_order = $8
             WHERE id = $9
             RETURNING *",
        )
        .bind(&request.name)
        .bind(&request.designation)
        .bind(&request.qualification)
        .bind(&request.experience)
        .bind(&request.department)
        .bind(&request.email)
        .bind(request.is_active.unwrap_or(true))
        .bind(request.display_order.unwrap_or(0))
        .bind(id)
        .fetch_one(db)
        .await?;
        Ok(faculty)
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, college_id: Uuid, id: Uuid) -> Result<(), AppError> {
        delete_resource(db, "faculties", id, college_id).await
    }
}

pub struct HostelService;

impl HostelService {
    #[instrument(skip(db))]
    pub async fn list_for_college(db: &PgPool, college_id: Uuid) -> Result<Vec<Hostel>, AppError> {
        let hostels = sqlx::query_as::<_, Hostel>(
            "SELECT * FROM hostels WHERE college_id = $1 ORDER BY name",
        )
        .bind(college_id)
        .fetch_all(db)
        .await?;
        Ok(hostels)
    }

    #[instrument(skip(db, request))]
    pub async fn create(
        db: &PgPool,
        college_id: Uuid,
        request: HostelRequest,
    ) -> Result<Hostel, AppError> {
        let hostel = sqlx::query_as::<_, Hostel>(
            "INSERT INTO hostels
                 (college_id, name, hostel_type, capacity, annual_fee, facilities, description)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(college_id)
        .bind(&request.name)
        .bind(&request.hostel_type)
        .bind(request.capacity)
        .bind(request.annual_fee)
        .bind(&request.facilities)
        .bind(&request.description)
        .fetch_one(db)
        .await?;
        Ok(hostel)
    }

    #[instrument(skip(db, request))]
    pub async fn update(
        db: &PgPool,
        college_id: Uuid,
        id: Uuid,
        request: HostelRequest,
    ) -> Result<Hostel, AppError> {
        assert_owner(db, "hostels", id, college_id).await?;
        let hostel = sqlx::query_as::<_, Hostel>(
            "UPDATE hostels
             SET name = $1, hostel_type = $2, capacity = $3, annual_fee = $4,
                 facilities = $5, description = $6
             WHERE id = $7
             RETURNING *",
        )
        .bind(&request.name)
        .bind(&request.hostel_type)
        .bind(request.capacity)
        .bind(request.annual_fee)
        .bind(&request.facilities)
        .bind(&request.description)
        .bind(id)
        .fetch_one(db)
        .await?;
        Ok(hostel)
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, college_id: Uuid, id: Uuid) -> Result<(), AppError> {
        delete_resource(db, "hostels", id, college_id).await
    }
}

use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::modules::consultants::service::ConsultantService;
use crate::modules::students::model::{
    STUDENT_COLUMNS, StudentFilterParams, StudentProfile, UpdateStudentProfileRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db))]
    pub async fn get_by_user(db: &PgPool, user_id: Uuid) -> Result<StudentProfile, AppError> {
        sqlx::query_as::<_, StudentProfile>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM student_profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("Student profile not found"))
    }

    /// Update the caller's student profile, recompute completion, and assign
    /// a consultant for the student's region when none is assigned yet.
    #[instrument(skip(state, request))]
    pub async fn update_own(
        state: &AppState,
        user_id: Uuid,
        request: UpdateStudentProfileRequest,
    ) -> Result<StudentProfile, AppError> {
        let current = Self::get_by_user(&state.db, user_id).await?;

        let mut merged = StudentProfile {
            date_of_birth: request.date_of_birth.or(current.date_of_birth),
            gender: request.gender.or(current.gender),
            address: request.address.or(current.address),
            country: request.country.or(current.country),
            state: request.state.or(current.state),
            district: request.district.or(current.district),
            pincode: request.pincode.or(current.pincode),
            education_level: request.education_level.or(current.education_level),
            school_college_name: request.school_college_name.or(current.school_college_name),
            percentage_or_grade: request.percentage_or_grade.or(current.percentage_or_grade),
            passing_year: request.passing_year.or(current.passing_year),
            interests: request.interests.or(current.interests),
            ..current
        };
        merged.profile_completed = merged.is_complete();

        // Assignment happens once; a consultant joining later does not
        // reshuffle students already on the books.
        if merged.assigned_consultant_id.is_none() {
            if let (Some(student_state), Some(district)) =
                (merged.state.as_deref(), merged.district.as_deref())
            {
                if !student_state.trim().is_empty() && !district.trim().is_empty() {
                    merged.assigned_consultant_id =
                        ConsultantService::find_for_region(&state.db, student_state, district)
                            .await?;
                    if let Some(consultant_id) = merged.assigned_consultant_id {
                        info!(
                            student_id = %merged.id,
                            consultant_id = %consultant_id,
                            "Student assigned to consultant"
                        );
                    }
                }
            }
        }

        let assigned_now =
            current.assigned_consultant_id.is_none() && merged.assigned_consultant_id.is_some();

        let mut tx = state.db.begin().await?;

        let updated = sqlx::query_as::<_, StudentProfile>(&format!(
            "UPDATE student_profiles
             SET date_of_birth = $1, gender = $2, address = $3, country = $4,
                 state = $5, district = $6, pincode = $7, education_level = $8,
                 school_college_name = $9, percentage_or_grade = $10, passing_year = $11,
                 interests = $12, assigned_consultant_id = $13, profile_completed = $14,
                 updated_at = NOW()
             WHERE id = $15
             RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(merged.date_of_birth)
        .bind(&merged.gender)
        .bind(&merged.address)
        .bind(&merged.country)
        .bind(&merged.state)
        .bind(&merged.district)
        .bind(&merged.pincode)
        .bind(&merged.education_level)
        .bind(&merged.school_college_name)
        .bind(&merged.percentage_or_grade)
        .bind(&merged.passing_year)
        .bind(&merged.interests)
        .bind(merged.assigned_consultant_id)
        .bind(merged.profile_completed)
        .bind(merged.id)
        .fetch_one(&mut *tx)
        .await?;

        if assigned_now {
            sqlx::query(
                "UPDATE consultant_profiles
                 SET total_students = total_students + 1, updated_at = NOW()
                 WHERE id = $1",
            )
            .bind(merged.assigned_consultant_id)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            "UPDATE users SET is_profile_complete = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(updated.profile_completed)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        filters: &StudentFilterParams,
    ) -> Result<(Vec<StudentProfile>, PaginationMeta), AppError> {
        let mut conditions: Vec<String> = Vec::new();

        if filters.state.is_some() {
            conditions.push(format!("state = ${}", conditions.len() + 1));
        }
        if filters.district.is_some() {
            conditions.push(format!("district = ${}", conditions.len() + 1));
        }
        if filters.assigned_consultant_id.is_some() {
            conditions.push(format!("assigned_consultant_id = ${}", conditions.len() + 1));
        }
        if filters.profile_completed.is_some() {
            conditions.push(format!("profile_completed = ${}", conditions.len() + 1));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM student_profiles{where_clause}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(state) = &filters.state {
            count_query = count_query.bind(state);
        }
        if let Some(district) = &filters.district {
            count_query = count_query.bind(district);
        }
        if let Some(consultant_id) = filters.assigned_consultant_id {
            count_query = count_query.bind(consultant_id);
        }
        if let Some(completed) = filters.profile_completed {
            count_query = count_query.bind(completed);
        }
        let total = count_query.fetch_one(db).await?;

        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let list_sql = format!(
            "SELECT {STUDENT_COLUMNS} FROM student_profiles{where_clause}
             ORDER BY created_at DESC
             LIMIT ${} OFFSET ${}",
            conditions.len() + 1,
            conditions.len() + 2,
        );
        let mut list_query = sqlx::query_as::<_, StudentProfile>(&list_sql);
        if let Some(state) = &filters.state {
            list_query = list_query.bind(state);
        }
        if let Some(district) = &filters.district {
            list_query = list_query.bind(district);
        }
        if let Some(consultant_id) = filters.assigned_consultant_id {
            list_query = list_query.bind(consultant_id);
        }
        if let Some(completed) = filters.profile_completed {
            list_query = list_query.bind(completed);
        }
        let profiles = list_query.bind(limit).bind(offset).fetch_all(db).await?;

        Ok((profiles, PaginationMeta::new(total, limit, offset)))
    }
}

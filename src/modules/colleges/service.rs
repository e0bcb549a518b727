use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::colleges::model::{
    COLLEGE_COLUMNS, COLLEGE_SUMMARY_COLUMNS, CollegeDetailResponse, CollegeProfile,
    CollegeSearchParams, CollegeSummary, UpdateCollegeProfileRequest,
};
use crate::modules::resources::model::{Course, Event, Faculty, GalleryItem, Hostel};
use crate::modules::users::model::UserType;
use crate::modules::users::service::ProfileService;
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;

pub struct CollegeService;

impl CollegeService {
    /// The caller's college profile. Accounts created before the profile
    /// materializer existed get one on first access.
    #[instrument(skip(db))]
    pub async fn get_or_create_own(
        db: &PgPool,
        user_id: Uuid,
    ) -> Result<CollegeProfile, AppError> {
        if let Some(profile) = Self::find_by_user(db, user_id).await? {
            return Ok(profile);
        }

        let name = sqlx::query_scalar::<_, Option<String>>(
            "SELECT name FROM users WHERE id = $1 AND user_type = 'college'",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("College account not found"))?;

        let mut tx = db.begin().await?;
        ProfileService::materialize(&mut tx, user_id, UserType::College, name.as_deref())
            .await?;
        tx.commit().await?;

        Self::find_by_user(db, user_id)
            .await?
            .ok_or_else(|| AppError::internal_error("College profile creation failed"))
    }

    async fn find_by_user(
        db: &PgPool,
        user_id: Uuid,
    ) -> Result<Option<CollegeProfile>, AppError> {
        let profile = sqlx::query_as::<_, CollegeProfile>(&format!(
            "SELECT {COLLEGE_COLUMNS} FROM college_profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(profile)
    }

    #[instrument(skip(db, request))]
    pub async fn update_own(
        db: &PgPool,
        user_id: Uuid,
        request: UpdateCollegeProfileRequest,
    ) -> Result<CollegeProfile, AppError> {
        let current = Self::get_or_create_own(db, user_id).await?;

        let mut merged = CollegeProfile {
            college_name: request.college_name.unwrap_or(current.college_name),
            official_registration_no: request
                .official_registration_no
                .or(current.official_registration_no),
            college_type: request.college_type.or(current.college_type),
            established_year: request.established_year.or(current.established_year),
            accreditation_body: request.accreditation_body.or(current.accreditation_body),
            country: request.country.unwrap_or(current.country),
            state: request.state.unwrap_or(current.state),
            district: request.district.unwrap_or(current.district),
            pin_code: request.pin_code.or(current.pin_code),
            address: request.address.unwrap_or(current.address),
            email: request.email.or(current.email),
            phone: request.phone.or(current.phone),
            website: request.website.or(current.website),
            about_college: request.about_college.or(current.about_college),
            contact_person: request.contact_person.or(current.contact_person),
            landline: request.landline.or(current.landline),
            ..current
        };

        let mut tx = db.begin().await?;

        let updated = sqlx::query_as::<_, CollegeProfile>(&format!(
            "UPDATE college_profiles
             SET college_name = $1, official_registration_no = $2, college_type = $3,
                 established_year = $4, accreditation_body = $5, country = $6,
                 state = $7, district = $8, pin_code = $9, address = $10, email = $11,
                 phone = $12, website = $13, about_college = $14, contact_person = $15,
                 landline = $16, updated_at = NOW()
             WHERE id = $17
             RETURNING {COLLEGE_COLUMNS}"
        ))
        .bind(&merged.college_name)
        .bind(&merged.official_registration_no)
        .bind(&merged.college_type)
        .bind(merged.established_year)
        .bind(&merged.accreditation_body)
        .bind(&merged.country)
        .bind(&merged.state)
        .bind(&merged.district)
        .bind(&merged.pin_code)
        .bind(&merged.address)
        .bind(&merged.email)
        .bind(&merged.phone)
        .bind(&merged.website)
        .bind(&merged.about_college)
        .bind(&merged.contact_person)
        .bind(&merged.landline)
        .bind(merged.id)
        .fetch_one(&mut *tx)
        .await?;

        merged = updated;

        sqlx::query(
            "UPDATE users SET is_profile_complete = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(merged.is_complete())
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(merged)
    }

    /// Public search across college profiles. All filters are optional and
    /// combine with AND; `main_stream` matches through the courses table.
    #[instrument(skip(db))]
    pub async fn search(
        db: &PgPool,
        params: &CollegeSearchParams,
    ) -> Result<(Vec<CollegeSummary>, PaginationMeta), AppError> {
        let mut conditions: Vec<String> = Vec::new();
        let mut text_binds: Vec<String> = Vec::new();
        let mut bool_binds: Vec<bool> = Vec::new();

        fn push_ilike(
            column: &str,
            value: &str,
            conditions: &mut Vec<String>,
            text_binds: &mut Vec<String>,
        ) {
            conditions.push(format!("{column} ILIKE ${}", conditions.len() + 1));
            text_binds.push(format!("%{value}%"));
        }

        if let Some(country) = &params.country {
            push_ilike("country", country, &mut conditions, &mut text_binds);
        }
        if let Some(state) = &params.state {
            push_ilike("state", state, &mut conditions, &mut text_binds);
        }
        if let Some(district) = &params.district {
            push_ilike("district", district, &mut conditions, &mut text_binds);
        }
        if let Some(college_type) = &params.college_type {
            conditions.push(format!("college_type = ${}", conditions.len() + 1));
            text_binds.push(college_type.clone());
        }
        if let Some(body) = &params.accreditation_body {
            push_ilike("accreditation_body", body, &mut conditions, &mut text_binds);
        }
        if let Some(main_stream) = &params.main_stream {
            conditions.push(format!(
                "EXISTS (SELECT 1 FROM courses c
                         WHERE c.college_id = college_profiles.id
                           AND c.main_stream ILIKE ${})",
                conditions.len() + 1
            ));
            text_binds.push(format!("%{main_stream}%"));
        }
        if let Some(search) = &params.search {
            conditions.push(format!(
                "(college_name ILIKE ${n} OR about_college ILIKE ${n})",
                n = conditions.len() + 1
            ));
            text_binds.push(format!("%{search}%"));
        }
        for (column, value) in [
            ("verified", params.verified),
            ("is_popular", params.is_popular),
            ("is_featured", params.is_featured),
        ] {
            if let Some(value) = value {
                conditions.push(format!("{column} = ${}", conditions.len() + 1));
                bool_binds.push(value);
            }
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM college_profiles{where_clause}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for bind in &text_binds {
            count_query = count_query.bind(bind);
        }
        for bind in &bool_binds {
            count_query = count_query.bind(bind);
        }
        let total = count_query.fetch_one(db).await?;

        let limit = params.pagination.limit();
        let offset = params.pagination.offset();

        let list_sql = format!(
            "SELECT {COLLEGE_SUMMARY_COLUMNS} FROM college_profiles{where_clause}
             ORDER BY is_featured DESC, is_popular DESC, college_name ASC
             LIMIT ${} OFFSET ${}",
            conditions.len() + 1,
            conditions.len() + 2,
        );
        let mut list_query = sqlx::query_as::<_, CollegeSummary>(&list_sql);
        for bind in &text_binds {
            list_query = list_query.bind(bind);
        }
        for bind in &bool_binds {
            list_query = list_query.bind(bind);
        }
        let colleges = list_query.bind(limit).bind(offset).fetch_all(db).await?;

        Ok((colleges, PaginationMeta::new(total, limit, offset)))
    }

    /// Public detail view keyed by the college code, with every resource
    /// collection inlined.
    #[instrument(skip(db))]
    pub async fn public_detail(
        db: &PgPool,
        college_code: &str,
    ) -> Result<CollegeDetailResponse, AppError> {
        let profile = sqlx::query_as::<_, CollegeProfile>(&format!(
            "SELECT {COLLEGE_COLUMNS} FROM college_profiles WHERE college_code = $1"
        ))
        .bind(college_code)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("College not found"))?;

        let courses = sqlx::query_as::<_, Course>(
            "SELECT * FROM courses WHERE college_id = $1 ORDER BY main_stream, specialization",
        )
        .bind(profile.id)
        .fetch_all(db)
        .await?;

        let events = sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE college_id = $1 ORDER BY date DESC NULLS LAST",
        )
        .bind(profile.id)
        .fetch_all(db)
        .await?;

        let gallery = sqlx::query_as::<_, GalleryItem>(
            "SELECT * FROM gallery_items WHERE college_id = $1 ORDER BY display_order, created_at",
        )
        .bind(profile.id)
        .fetch_all(db)
        .await?;

        let faculties = sqlx::query_as::<_, Faculty>(
            "SELECT * FROM faculties WHERE college_id = $1 AND is_active = TRUE
             ORDER BY display_order, name",
        )
        .bind(profile.id)
        .fetch_all(db)
        .await?;

        let hostels = sqlx::query_as::<_, Hostel>(
            "SELECT * FROM hostels WHERE college_id = $1 ORDER BY name",
        )
        .bind(profile.id)
        .fetch_all(db)
        .await?;

        Ok(CollegeDetailResponse {
            college: CollegeSummary {
                college_code: profile.college_code,
                college_name: profile.college_name,
                college_type: profile.college_type,
                accreditation_body: profile.accreditation_body,
                country: profile.country,
                state: profile.state,
                district: profile.district,
                website: profile.website,
                about_college: profile.about_college,
                verified: profile.verified,
                is_popular: profile.is_popular,
                is_featured: profile.is_featured,
            },
            established_year: profile.established_year,
            address: profile.address,
            email: profile.email,
            phone: profile.phone,
            courses,
            events,
            gallery,
            faculties,
            hostels,
        })
    }
}

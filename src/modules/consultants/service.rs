use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::modules::consultants::model::{
    CONSULTANT_COLUMNS, ConsultantFilterParams, ConsultantProfile, ConsultantType,
    UpdateConsultantProfileRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;

pub struct ConsultantService;

impl ConsultantService {
    #[instrument(skip(db))]
    pub async fn get_by_user(db: &PgPool, user_id: Uuid) -> Result<ConsultantProfile, AppError> {
        sqlx::query_as::<_, ConsultantProfile>(&format!(
            "SELECT {CONSULTANT_COLUMNS} FROM consultant_profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("Consultant profile not found"))
    }

    /// Update the caller's consultant profile, enforcing the tier rules:
    /// one state consultant per state, district consultants parented to
    /// their state's verified consultant.
    #[instrument(skip(state, request))]
    pub async fn update_own(
        state: &AppState,
        user_id: Uuid,
        request: UpdateConsultantProfileRequest,
    ) -> Result<ConsultantProfile, AppError> {
        let current = Self::get_by_user(&state.db, user_id).await?;

        let full_name = request.full_name.unwrap_or(current.full_name);
        let phone = request.phone.unwrap_or(current.phone);
        let address = request.address.or(current.address);
        let consultant_type = request.consultant_type.unwrap_or(current.consultant_type);
        let new_state = request.state.unwrap_or_else(|| current.state.clone());
        let district = request.district.or(current.district);

        // Auto-parenting only fills a missing link (or follows a state
        // change); an unrelated update must not clear an existing parent.
        let mut parent_consultant_id = current.parent_consultant_id;

        match consultant_type {
            ConsultantType::State => {
                if new_state.trim().is_empty() {
                    return Err(AppError::bad_request(
                        "State is required for a state consultant",
                    ));
                }
                parent_consultant_id = None;
                let taken = sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(
                         SELECT 1 FROM consultant_profiles
                         WHERE consultant_type = 'state' AND state = $1 AND id <> $2
                     )",
                )
                .bind(&new_state)
                .bind(current.id)
                .fetch_one(&state.db)
                .await?;
                if taken {
                    return Err(AppError::conflict(format!(
                        "A state consultant already exists for {new_state}"
                    )));
                }
            }
            ConsultantType::District => {
                if new_state.trim().is_empty() || district.as_deref().unwrap_or("").trim().is_empty()
                {
                    return Err(AppError::bad_request(
                        "State and district are required for a district consultant",
                    ));
                }
                if parent_consultant_id.is_none() || new_state != current.state {
                    parent_consultant_id =
                        Self::find_state_consultant(&state.db, &new_state, Some(current.id))
                            .await?;
                }
            }
            ConsultantType::Pending => {}
        }

        let updated = sqlx::query_as::<_, ConsultantProfile>(&format!(
            "UPDATE consultant_profiles
             SET full_name = $1, phone = $2, address = $3, consultant_type = $4,
                 state = $5, district = $6, parent_consultant_id = $7, updated_at = NOW()
             WHERE id = $8
             RETURNING {CONSULTANT_COLUMNS}"
        ))
        .bind(&full_name)
        .bind(&phone)
        .bind(&address)
        .bind(consultant_type)
        .bind(&new_state)
        .bind(&district)
        .bind(parent_consultant_id)
        .bind(current.id)
        .fetch_one(&state.db)
        .await;

        match updated {
            Ok(profile) => Ok(profile),
            // Lost a race against another state-consultant claim; the
            // partial unique index is the arbiter.
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AppError::conflict(format!(
                    "A state consultant already exists for {new_state}"
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The verified state consultant for `state`, if any.
    async fn find_state_consultant(
        db: &PgPool,
        state: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<Uuid>, AppError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM consultant_profiles
             WHERE consultant_type = 'state' AND state = $1 AND verified = TRUE
               AND ($2::uuid IS NULL OR id <> $2)
             LIMIT 1",
        )
        .bind(state)
        .bind(exclude)
        .fetch_optional(db)
        .await?;
        Ok(id)
    }

    /// Pick the consultant responsible for a student's region: the verified
    /// district consultant for (state, district) first, falling back to the
    /// verified state consultant, then to nobody.
    #[instrument(skip(db))]
    pub async fn find_for_region(
        db: &PgPool,
        state: &str,
        district: &str,
    ) -> Result<Option<Uuid>, AppError> {
        let district_consultant = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM consultant_profiles
             WHERE consultant_type = 'district' AND state = $1 AND district = $2
               AND verified = TRUE
             LIMIT 1",
        )
        .bind(state)
        .bind(district)
        .fetch_optional(db)
        .await?;

        if district_consultant.is_some() {
            return Ok(district_consultant);
        }

        Self::find_state_consultant(db, state, None).await
    }

    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        filters: &ConsultantFilterParams,
    ) -> Result<(Vec<ConsultantProfile>, PaginationMeta), AppError> {
        let mut conditions: Vec<String> = Vec::new();

        if filters.state.is_some() {
            conditions.push(format!("state = ${}", conditions.len() + 1));
        }
        if filters.district.is_some() {
            conditions.push(format!("district = ${}", conditions.len() + 1));
        }
        if filters.consultant_type.is_some() {
            conditions.push(format!("consultant_type = ${}", conditions.len() + 1));
        }
        if filters.verified.is_some() {
            conditions.push(format!("verified = ${}", conditions.len() + 1));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM consultant_profiles{where_clause}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(state) = &filters.state {
            count_query = count_query.bind(state);
        }
        if let Some(district) = &filters.district {
            count_query = count_query.bind(district);
        }
        if let Some(consultant_type) = filters.consultant_type {
            count_query = count_query.bind(consultant_type);
        }
        if let Some(verified) = filters.verified {
            count_query = count_query.bind(verified);
        }
        let total = count_query.fetch_one(db).await?;

        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let list_sql = format!(
            "SELECT {CONSULTANT_COLUMNS} FROM consultant_profiles{where_clause}
             ORDER BY created_at DESC
             LIMIT ${} OFFSET ${}",
            conditions.len() + 1,
            conditions.len() + 2,
        );
        let mut list_query = sqlx::query_as::<_, ConsultantProfile>(&list_sql);
        if let Some(state) = &filters.state {
            list_query = list_query.bind(state);
        }
        if let Some(district) = &filters.district {
            list_query = list_query.bind(district);
        }
        if let Some(consultant_type) = filters.consultant_type {
            list_query = list_query.bind(consultant_type);
        }
        if let Some(verified) = filters.verified {
            list_query = list_query.bind(verified);
        }
        let profiles = list_query.bind(limit).bind(offset).fetch_all(db).await?;

        Ok((profiles, PaginationMeta::new(total, limit, offset)))
    }

    /// Staff approval: marks the consultant verified and notifies them.
    #[instrument(skip(state))]
    pub async fn approve(
        state: &AppState,
        approver_id: Uuid,
        profile_id: Uuid,
    ) -> Result<ConsultantProfile, AppError> {
        let profile = sqlx::query_as::<_, ConsultantProfile>(&format!(
            "UPDATE consultant_profiles
             SET verified = TRUE, approved_by = $1, approved_at = $2, updated_at = NOW()
             WHERE id = $3
             RETURNING {CONSULTANT_COLUMNS}"
        ))
        .bind(approver_id)
        .bind(Utc::now())
        .bind(profile_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Consultant profile not found"))?;

        info!(consultant_id = %profile.id, approved_by = %approver_id, "Consultant approved");

        let email = sqlx::query_scalar::<_, String>(
            "SELECT email FROM users WHERE id = $1",
        )
        .bind(profile.user_id)
        .fetch_optional(&state.db)
        .await?;

        if let Some(email) = email {
            state
                .notifier
                .notify_user(
                    &email,
                    "Consultant account approved",
                    "Your consultant account has been approved. You can now receive student assignments.",
                )
                .await;
        }

        Ok(profile)
    }
}

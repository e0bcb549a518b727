use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::users::model::{USER_COLUMNS, User, UserFilterParams, UserType};
use crate::utils::codes::generate_unique_code;
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn get_by_id(db: &PgPool, user_id: Uuid) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

        Ok(user)
    }

    /// Staff listing with optional email/name substring and role filters.
    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        filters: &UserFilterParams,
    ) -> Result<(Vec<User>, PaginationMeta), AppError> {
        let mut conditions: Vec<String> = Vec::new();

        if filters.email.is_some() {
            conditions.push(format!("email ILIKE ${}", conditions.len() + 1));
        }
        if filters.name.is_some() {
            conditions.push(format!("name ILIKE ${}", conditions.len() + 1));
        }
        if filters.user_type.is_some() {
            conditions.push(format!("user_type = ${}", conditions.len() + 1));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM users{where_clause}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(email) = &filters.email {
            count_query = count_query.bind(format!("%{email}%"));
        }
        if let Some(name) = &filters.name {
            count_query = count_query.bind(format!("%{name}%"));
        }
        if let Some(user_type) = filters.user_type {
            count_query = count_query.bind(user_type);
        }
        let total = count_query.fetch_one(db).await?;

        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let list_sql = format!(
            "SELECT {USER_COLUMNS} FROM users{where_clause}
             ORDER BY created_at DESC
             LIMIT ${} OFFSET ${}",
            conditions.len() + 1,
            conditions.len() + 2,
        );
        let mut list_query = sqlx::query_as::<_, User>(&list_sql);
        if let Some(email) = &filters.email {
            list_query = list_query.bind(format!("%{email}%"));
        }
        if let Some(name) = &filters.name {
            list_query = list_query.bind(format!("%{name}%"));
        }
        if let Some(user_type) = filters.user_type {
            list_query = list_query.bind(user_type);
        }
        let users = list_query.bind(limit).bind(offset).fetch_all(db).await?;

        Ok((users, PaginationMeta::new(total, limit, offset)))
    }
}

/// Creates the role-specific profile row for a newly finalized account.
pub struct ProfileService;

impl ProfileService {
    /// Materialize the profile matching `user_type`, if the role has one.
    ///
    /// Idempotent: a second call for the same user is a no-op, so retrying a
    /// failed finalization cannot duplicate profiles. Runs inside the
    /// caller's transaction.
    #[instrument(skip(tx, name))]
    pub async fn materialize(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        user_type: UserType,
        name: Option<&str>,
    ) -> Result<(), AppError> {
        match user_type {
            UserType::Student => Self::create_student_profile(tx, user_id).await,
            UserType::Consultant => {
                Self::create_consultant_profile(tx, user_id, name).await
            }
            UserType::College => Self::create_college_profile(tx, user_id, name).await,
            UserType::Counsellor | UserType::Admin => Ok(()),
        }
    }

    async fn create_student_profile(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO student_profiles (user_id, student_code)
             VALUES ($1, $2)
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(generate_unique_code("STU"))
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn create_consultant_profile(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        name: Option<&str>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO consultant_profiles (user_id, consultant_code, full_name)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(generate_unique_code("CON"))
        .bind(name)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn create_college_profile(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        name: Option<&str>,
    ) -> Result<(), AppError> {
        // College codes are user-facing identifiers for the public search
        // surface, so collisions are checked before insert rather than
        // trusted to the random space.
        let college_code = loop {
            let candidate = generate_unique_code("COL");
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM college_profiles WHERE college_code = $1)",
            )
            .bind(&candidate)
            .fetch_one(&mut **tx)
            .await?;
            if !exists {
                break candidate;
            }
        };

        let college_name = name
            .map(str::to_owned)
            .unwrap_or_else(|| format!("College {}", &college_code[4..]));

        sqlx::query(
            "INSERT INTO college_profiles (user_id, college_code, college_name)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(&college_code)
        .bind(college_name)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

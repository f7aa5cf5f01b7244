//! PostgreSQL-backed profile repository over `users` joined with
//! `user_roles`.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use deskhive_application::{NewProfile, ProfileRepository, ProfileUpdate};
use deskhive_core::{AppError, AppResult, TenantId};
use deskhive_domain::{DepartmentId, Role, RoleName, UserId, UserProfile, UserStatus};

const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL implementation of the profile repository port.
#[derive(Clone)]
pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_by_id(&self, user_id: UserId) -> AppResult<UserProfile> {
        self.find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no profile for user '{user_id}'")))
    }
}

const PROFILE_COLUMNS: &str = r#"
    u.id, u.subject, u.company_id, u.department_id, u.full_name, u.email,
    u.status, r.id AS role_id, r.role_name, r.hierarchy_level
"#;

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    subject: Option<String>,
    company_id: Option<Uuid>,
    department_id: Option<Uuid>,
    full_name: String,
    email: String,
    status: String,
    role_id: Option<i32>,
    role_name: Option<String>,
    hierarchy_level: Option<i32>,
}

impl TryFrom<ProfileRow> for UserProfile {
    type Error = AppError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let role = match (row.role_id, row.role_name, row.hierarchy_level) {
            (Some(id), Some(name), Some(hierarchy_level)) => Some(Role {
                id,
                name: RoleName::from_str(&name)?,
                hierarchy_level,
            }),
            _ => None,
        };

        Ok(Self {
            id: UserId::from_uuid(row.id),
            subject: row.subject.unwrap_or_default(),
            company_id: row.company_id.map(TenantId::from_uuid),
            department_id: row.department_id.map(DepartmentId::from_uuid),
            role,
            full_name: row.full_name,
            email: row.email,
            status: UserStatus::from_str(&row.status)?,
        })
    }
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn find_by_subject(&self, subject: &str) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            r#"
            SELECT {PROFILE_COLUMNS}
            FROM users u
            LEFT JOIN user_roles r ON r.id = u.role_id
            WHERE u.subject = $1
            "#
        ))
        .bind(subject)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to resolve profile by subject: {error}"))
        })?;

        row.map(UserProfile::try_from).transpose()
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            r#"
            SELECT {PROFILE_COLUMNS}
            FROM users u
            LEFT JOIN user_roles r ON r.id = u.role_id
            WHERE u.id = $1
            "#
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve profile: {error}")))?;

        row.map(UserProfile::try_from).transpose()
    }

    async fn find_pending_by_email(&self, email: &str) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            r#"
            SELECT {PROFILE_COLUMNS}
            FROM users u
            LEFT JOIN user_roles r ON r.id = u.role_id
            WHERE u.email = $1 AND u.status = $2
            "#
        ))
        .bind(email)
        .bind(UserStatus::Pending.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to resolve pending invite: {error}"))
        })?;

        row.map(UserProfile::try_from).transpose()
    }

    async fn link_subject(&self, user_id: UserId, subject: &str) -> AppResult<UserProfile> {
        let updated = sqlx::query(
            r#"
            UPDATE users
            SET subject = $2, status = $3
            WHERE id = $1 AND subject IS NULL
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(subject)
        .bind(UserStatus::Active.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to link subject: {error}")))?;

        if updated.rows_affected() == 0 {
            return Err(AppError::Conflict(format!(
                "profile '{user_id}' is already linked to an identity"
            )));
        }

        self.fetch_by_id(user_id).await
    }

    async fn list_for_company(&self, company_id: TenantId) -> AppResult<Vec<UserProfile>> {
        let rows = sqlx::query_as::<_, ProfileRow>(&format!(
            r#"
            SELECT {PROFILE_COLUMNS}
            FROM users u
            LEFT JOIN user_roles r ON r.id = u.role_id
            WHERE u.company_id = $1
            ORDER BY u.full_name
            "#
        ))
        .bind(company_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list profiles: {error}")))?;

        rows.into_iter().map(UserProfile::try_from).collect()
    }

    async fn count_for_company(&self, company_id: TenantId) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM users
            WHERE company_id = $1
            "#,
        )
        .bind(company_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count profiles: {error}")))
    }

    async fn create(&self, input: NewProfile) -> AppResult<UserProfile> {
        let user_id = UserId::new();

        sqlx::query(
            r#"
            INSERT INTO users (id, company_id, department_id, role_id, full_name, email, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(input.company_id.as_uuid())
        .bind(input.department_id.map(|department| department.as_uuid()))
        .bind(input.role_id)
        .bind(&input.full_name)
        .bind(&input.email)
        .bind(UserStatus::Pending.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            // The partial unique index on pending emails backstops the
            // service-level duplicate check under concurrency.
            let is_duplicate = error
                .as_database_error()
                .and_then(|database_error| database_error.code())
                .is_some_and(|code| code == UNIQUE_VIOLATION);
            if is_duplicate {
                AppError::Conflict(format!(
                    "a pending invite already exists for '{}'",
                    input.email
                ))
            } else {
                AppError::Internal(format!("failed to create profile: {error}"))
            }
        })?;

        self.fetch_by_id(user_id).await
    }

    async fn update(&self, user_id: UserId, update: ProfileUpdate) -> AppResult<UserProfile> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(|error| AppError::Internal(format!("failed to begin transaction: {error}")))?;

        if let Some(role_id) = update.role_id {
            sqlx::query("UPDATE users SET role_id = $2 WHERE id = $1")
                .bind(user_id.as_uuid())
                .bind(role_id)
                .execute(&mut *transaction)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to update profile role: {error}"))
                })?;
        }

        if let Some(department_id) = update.department_id {
            sqlx::query("UPDATE users SET department_id = $2 WHERE id = $1")
                .bind(user_id.as_uuid())
                .bind(department_id.map(|department| department.as_uuid()))
                .execute(&mut *transaction)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to update profile department: {error}"))
                })?;
        }

        if let Some(status) = update.status {
            sqlx::query("UPDATE users SET status = $2 WHERE id = $1")
                .bind(user_id.as_uuid())
                .bind(status.as_str())
                .execute(&mut *transaction)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to update profile status: {error}"))
                })?;
        }

        transaction
            .commit()
            .await
            .map_err(|error| AppError::Internal(format!("failed to commit transaction: {error}")))?;

        self.fetch_by_id(user_id).await
    }
}

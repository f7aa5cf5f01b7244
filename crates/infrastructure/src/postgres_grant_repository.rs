//! PostgreSQL-backed grant ledger over `department_access_permissions`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use deskhive_application::{GrantRepository, NewGrant};
use deskhive_core::{AppError, AppResult};
use deskhive_domain::{AccessGrant, DepartmentId, GrantId, UserId};

const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL implementation of the grant repository port.
#[derive(Clone)]
pub struct PostgresGrantRepository {
    pool: PgPool,
}

impl PostgresGrantRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct GrantRow {
    id: Uuid,
    user_id: Uuid,
    target_department_id: Uuid,
    granted_by_user_id: Uuid,
    created_at: DateTime<Utc>,
}

impl From<GrantRow> for AccessGrant {
    fn from(row: GrantRow) -> Self {
        Self {
            id: GrantId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            target_department_id: DepartmentId::from_uuid(row.target_department_id),
            granted_by_user_id: UserId::from_uuid(row.granted_by_user_id),
            created_at: row.created_at,
        }
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .and_then(|database_error| database_error.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION)
}

#[async_trait]
impl GrantRepository for PostgresGrantRepository {
    async fn insert(&self, input: NewGrant) -> AppResult<AccessGrant> {
        let row = sqlx::query_as::<_, GrantRow>(
            r#"
            INSERT INTO department_access_permissions
                (id, user_id, target_department_id, granted_by_user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, target_department_id, granted_by_user_id, created_at
            "#,
        )
        .bind(GrantId::new().as_uuid())
        .bind(input.user_id.as_uuid())
        .bind(input.target_department_id.as_uuid())
        .bind(input.granted_by_user_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                AppError::Conflict("user already has access to this department".to_owned())
            } else {
                AppError::Internal(format!("failed to insert grant: {error}"))
            }
        })?;

        Ok(row.into())
    }

    async fn find(&self, grant_id: GrantId) -> AppResult<Option<AccessGrant>> {
        let row = sqlx::query_as::<_, GrantRow>(
            r#"
            SELECT id, user_id, target_department_id, granted_by_user_id, created_at
            FROM department_access_permissions
            WHERE id = $1
            "#,
        )
        .bind(grant_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve grant: {error}")))?;

        Ok(row.map(AccessGrant::from))
    }

    async fn delete(&self, grant_id: GrantId) -> AppResult<AccessGrant> {
        let row = sqlx::query_as::<_, GrantRow>(
            r#"
            DELETE FROM department_access_permissions
            WHERE id = $1
            RETURNING id, user_id, target_department_id, granted_by_user_id, created_at
            "#,
        )
        .bind(grant_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete grant: {error}")))?
        .ok_or_else(|| AppError::NotFound(format!("no grant '{grant_id}'")))?;

        Ok(row.into())
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<AccessGrant>> {
        let rows = sqlx::query_as::<_, GrantRow>(
            r#"
            SELECT id, user_id, target_department_id, granted_by_user_id, created_at
            FROM department_access_permissions
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list grants: {error}")))?;

        Ok(rows.into_iter().map(AccessGrant::from).collect())
    }
}

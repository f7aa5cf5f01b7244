//! PostgreSQL-backed department repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use deskhive_application::{DepartmentRepository, DepartmentUpdate, NewDepartment};
use deskhive_core::{AppError, AppResult, TenantId};
use deskhive_domain::{Department, DepartmentId};

/// PostgreSQL implementation of the department repository port.
#[derive(Clone)]
pub struct PostgresDepartmentRepository {
    pool: PgPool,
}

impl PostgresDepartmentRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DepartmentRow {
    id: Uuid,
    company_id: Uuid,
    name: String,
    parent_department_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl From<DepartmentRow> for Department {
    fn from(row: DepartmentRow) -> Self {
        Self {
            id: DepartmentId::from_uuid(row.id),
            company_id: TenantId::from_uuid(row.company_id),
            name: row.name,
            parent_department_id: row.parent_department_id.map(DepartmentId::from_uuid),
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl DepartmentRepository for PostgresDepartmentRepository {
    async fn list_for_company(&self, company_id: TenantId) -> AppResult<Vec<Department>> {
        let rows = sqlx::query_as::<_, DepartmentRow>(
            r#"
            SELECT id, company_id, name, parent_department_id, created_at
            FROM departments
            WHERE company_id = $1
            ORDER BY name
            "#,
        )
        .bind(company_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list departments: {error}")))?;

        Ok(rows.into_iter().map(Department::from).collect())
    }

    async fn count_for_company(&self, company_id: TenantId) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM departments
            WHERE company_id = $1
            "#,
        )
        .bind(company_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count departments: {error}")))
    }

    async fn find(&self, department_id: DepartmentId) -> AppResult<Option<Department>> {
        let row = sqlx::query_as::<_, DepartmentRow>(
            r#"
            SELECT id, company_id, name, parent_department_id, created_at
            FROM departments
            WHERE id = $1
            "#,
        )
        .bind(department_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve department: {error}")))?;

        Ok(row.map(Department::from))
    }

    async fn create(&self, input: NewDepartment) -> AppResult<Department> {
        let row = sqlx::query_as::<_, DepartmentRow>(
            r#"
            INSERT INTO departments (id, company_id, name, parent_department_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, company_id, name, parent_department_id, created_at
            "#,
        )
        .bind(DepartmentId::new().as_uuid())
        .bind(input.company_id.as_uuid())
        .bind(&input.name)
        .bind(input.parent_department_id.map(|parent| parent.as_uuid()))
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create department: {error}")))?;

        Ok(row.into())
    }

    async fn update(
        &self,
        department_id: DepartmentId,
        update: DepartmentUpdate,
    ) -> AppResult<Department> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(|error| AppError::Internal(format!("failed to begin transaction: {error}")))?;

        if let Some(name) = update.name {
            sqlx::query("UPDATE departments SET name = $2 WHERE id = $1")
                .bind(department_id.as_uuid())
                .bind(name)
                .execute(&mut *transaction)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to rename department: {error}"))
                })?;
        }

        if let Some(parent) = update.parent_department_id {
            sqlx::query("UPDATE departments SET parent_department_id = $2 WHERE id = $1")
                .bind(department_id.as_uuid())
                .bind(parent.map(|parent| parent.as_uuid()))
                .execute(&mut *transaction)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to re-parent department: {error}"))
                })?;
        }

        transaction
            .commit()
            .await
            .map_err(|error| AppError::Internal(format!("failed to commit transaction: {error}")))?;

        self.find(department_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no department '{department_id}'")))
    }
}

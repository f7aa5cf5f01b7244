//! PostgreSQL-backed tenant account repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use deskhive_application::TenantRepository;
use deskhive_core::{AppError, AppResult, TenantId};
use deskhive_domain::Company;

/// PostgreSQL implementation of the tenant repository port.
#[derive(Clone)]
pub struct PostgresTenantRepository {
    pool: PgPool,
}

impl PostgresTenantRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CompanyRow {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
}

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Self {
            id: TenantId::from_uuid(row.id),
            name: row.name,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl TenantRepository for PostgresTenantRepository {
    async fn list_all(&self) -> AppResult<Vec<Company>> {
        let rows = sqlx::query_as::<_, CompanyRow>(
            r#"
            SELECT id, name, created_at
            FROM companies
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list companies: {error}")))?;

        Ok(rows.into_iter().map(Company::from).collect())
    }

    async fn count_all(&self) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM companies")
            .fetch_one(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to count companies: {error}")))
    }

    async fn find(&self, company_id: TenantId) -> AppResult<Option<Company>> {
        let row = sqlx::query_as::<_, CompanyRow>(
            r#"
            SELECT id, name, created_at
            FROM companies
            WHERE id = $1
            "#,
        )
        .bind(company_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve company: {error}")))?;

        Ok(row.map(Company::from))
    }

    async fn create(&self, name: &str) -> AppResult<Company> {
        let row = sqlx::query_as::<_, CompanyRow>(
            r#"
            INSERT INTO companies (id, name)
            VALUES ($1, $2)
            RETURNING id, name, created_at
            "#,
        )
        .bind(TenantId::new().as_uuid())
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create company: {error}")))?;

        Ok(row.into())
    }

    async fn update_name(&self, company_id: TenantId, name: &str) -> AppResult<Company> {
        let row = sqlx::query_as::<_, CompanyRow>(
            r#"
            UPDATE companies
            SET name = $2
            WHERE id = $1
            RETURNING id, name, created_at
            "#,
        )
        .bind(company_id.as_uuid())
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to rename company: {error}")))?
        .ok_or_else(|| AppError::NotFound(format!("no company '{company_id}'")))?;

        Ok(row.into())
    }
}

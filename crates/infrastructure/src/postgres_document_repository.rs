//! PostgreSQL-backed document metadata repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use deskhive_application::{DocumentRepository, NewDocument};
use deskhive_core::{AppError, AppResult, TenantId};
use deskhive_domain::{DepartmentId, Document, DocumentId, UserId};

/// PostgreSQL implementation of the document repository port.
#[derive(Clone)]
pub struct PostgresDocumentRepository {
    pool: PgPool,
}

impl PostgresDocumentRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    company_id: Uuid,
    department_id: Option<Uuid>,
    name: String,
    storage_locator: String,
    file_type: String,
    file_size: i64,
    uploaded_by: Uuid,
    created_at: DateTime<Utc>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Self {
            id: DocumentId::from_uuid(row.id),
            company_id: TenantId::from_uuid(row.company_id),
            department_id: row.department_id.map(DepartmentId::from_uuid),
            name: row.name,
            storage_locator: row.storage_locator,
            file_type: row.file_type,
            file_size: row.file_size,
            uploaded_by: UserId::from_uuid(row.uploaded_by),
            created_at: row.created_at,
        }
    }
}

const DOCUMENT_COLUMNS: &str = r#"
    id, company_id, department_id, name, storage_locator, file_type,
    file_size, uploaded_by, created_at
"#;

fn department_uuids(department_ids: &[DepartmentId]) -> Vec<Uuid> {
    department_ids
        .iter()
        .map(|department| department.as_uuid())
        .collect()
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn list_all(&self) -> AppResult<Vec<Document>> {
        let rows = sqlx::query_as::<_, DocumentRow>(&format!(
            r#"
            SELECT {DOCUMENT_COLUMNS}
            FROM documents
            ORDER BY created_at DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list documents: {error}")))?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn list_for_company(&self, company_id: TenantId) -> AppResult<Vec<Document>> {
        let rows = sqlx::query_as::<_, DocumentRow>(&format!(
            r#"
            SELECT {DOCUMENT_COLUMNS}
            FROM documents
            WHERE company_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(company_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list documents: {error}")))?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn list_for_departments(
        &self,
        company_id: TenantId,
        department_ids: &[DepartmentId],
    ) -> AppResult<Vec<Document>> {
        let rows = sqlx::query_as::<_, DocumentRow>(&format!(
            r#"
            SELECT {DOCUMENT_COLUMNS}
            FROM documents
            WHERE company_id = $1
              AND (department_id = ANY($2) OR department_id IS NULL)
            ORDER BY created_at DESC
            "#
        ))
        .bind(company_id.as_uuid())
        .bind(department_uuids(department_ids))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list documents: {error}")))?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn count_all(&self) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM documents")
            .fetch_one(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to count documents: {error}")))
    }

    async fn count_for_company(&self, company_id: TenantId) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM documents
            WHERE company_id = $1
            "#,
        )
        .bind(company_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count documents: {error}")))
    }

    async fn count_for_departments(
        &self,
        company_id: TenantId,
        department_ids: &[DepartmentId],
    ) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM documents
            WHERE company_id = $1
              AND (department_id = ANY($2) OR department_id IS NULL)
            "#,
        )
        .bind(company_id.as_uuid())
        .bind(department_uuids(department_ids))
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count documents: {error}")))
    }

    async fn insert(&self, input: NewDocument) -> AppResult<Document> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            r#"
            INSERT INTO documents
                (id, company_id, department_id, name, storage_locator, file_type,
                 file_size, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {DOCUMENT_COLUMNS}
            "#
        ))
        .bind(DocumentId::new().as_uuid())
        .bind(input.company_id.as_uuid())
        .bind(input.department_id.map(|department| department.as_uuid()))
        .bind(&input.name)
        .bind(&input.storage_locator)
        .bind(&input.file_type)
        .bind(input.file_size)
        .bind(input.uploaded_by.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to register document: {error}")))?;

        Ok(row.into())
    }

    async fn find(&self, document_id: DocumentId) -> AppResult<Option<Document>> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            r#"
            SELECT {DOCUMENT_COLUMNS}
            FROM documents
            WHERE id = $1
            "#
        ))
        .bind(document_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve document: {error}")))?;

        Ok(row.map(Document::from))
    }
}

//! PostgreSQL-backed role taxonomy repository.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::PgPool;

use deskhive_application::RoleRepository;
use deskhive_core::{AppError, AppResult};
use deskhive_domain::{Role, RoleName};

/// PostgreSQL implementation of the role repository port.
#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RoleRow {
    id: i32,
    role_name: String,
    hierarchy_level: i32,
}

impl TryFrom<RoleRow> for Role {
    type Error = AppError;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: RoleName::from_str(&row.role_name)?,
            hierarchy_level: row.hierarchy_level,
        })
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, role_name, hierarchy_level
            FROM user_roles
            ORDER BY hierarchy_level
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        rows.into_iter().map(Role::try_from).collect()
    }

    async fn find_role(&self, role_id: i32) -> AppResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, role_name, hierarchy_level
            FROM user_roles
            WHERE id = $1
            "#,
        )
        .bind(role_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve role: {error}")))?;

        row.map(Role::try_from).transpose()
    }
}

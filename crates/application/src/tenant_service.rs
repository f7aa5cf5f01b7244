//! Tenant administration, per-scope dashboard counts, and tenant settings.

use std::sync::Arc;

use deskhive_core::{AppError, AppResult, TenantId};
use deskhive_domain::{AccessScope, Company, UserProfile};

use crate::access_service::{AccessService, require_manage_settings, require_platform_scope};
use crate::ports::{DepartmentRepository, DocumentRepository, ProfileRepository, TenantRepository};

/// Summary counts for the caller's visible slice of the platform.
///
/// `user_count` and `company_count` are `None` when the caller's scope does
/// not extend to those populations, so consumers can distinguish "zero" from
/// "not yours to count".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    /// Documents visible to the caller.
    pub document_count: i64,
    /// Departments visible to the caller.
    pub department_count: i64,
    /// Tenant users, when the caller manages users.
    pub user_count: Option<i64>,
    /// Tenants on the platform, for platform scope only.
    pub company_count: Option<i64>,
}

/// Application service for companies, dashboard, and settings.
#[derive(Clone)]
pub struct TenantService {
    tenants: Arc<dyn TenantRepository>,
    profiles: Arc<dyn ProfileRepository>,
    departments: Arc<dyn DepartmentRepository>,
    documents: Arc<dyn DocumentRepository>,
    access: AccessService,
}

impl TenantService {
    /// Creates a new tenant service.
    #[must_use]
    pub fn new(
        tenants: Arc<dyn TenantRepository>,
        profiles: Arc<dyn ProfileRepository>,
        departments: Arc<dyn DepartmentRepository>,
        documents: Arc<dyn DocumentRepository>,
        access: AccessService,
    ) -> Self {
        Self {
            tenants,
            profiles,
            departments,
            documents,
            access,
        }
    }

    /// Lists all tenants. Platform scope only.
    pub async fn list_companies(&self, actor: &UserProfile) -> AppResult<Vec<Company>> {
        let scope = self.access.scope_for_profile(actor).await?;
        require_platform_scope(&scope)?;

        self.tenants.list_all().await
    }

    /// Creates a tenant. Platform scope only.
    pub async fn create_company(&self, actor: &UserProfile, name: &str) -> AppResult<Company> {
        let scope = self.access.scope_for_profile(actor).await?;
        require_platform_scope(&scope)?;

        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "company name must not be empty".to_owned(),
            ));
        }

        self.tenants.create(name).await
    }

    /// Computes the dashboard counts for whatever slice of the platform the
    /// caller's scope covers.
    pub async fn dashboard(&self, actor: &UserProfile) -> AppResult<DashboardSummary> {
        let scope = self.access.scope_for_profile(actor).await?;

        if scope.platform_wide {
            return Ok(DashboardSummary {
                document_count: self.documents.count_all().await?,
                department_count: 0,
                user_count: None,
                company_count: Some(self.tenants.count_all().await?),
            });
        }

        let Some(company_id) = actor.company_id else {
            return Ok(DashboardSummary {
                document_count: 0,
                department_count: 0,
                user_count: None,
                company_count: None,
            });
        };

        let document_count = self.count_documents(company_id, &scope).await?;
        let department_count = if scope.company_wide {
            self.departments.count_for_company(company_id).await?
        } else {
            scope.department_ids.len() as i64
        };
        let user_count = if scope.can_manage_users {
            Some(self.profiles.count_for_company(company_id).await?)
        } else {
            None
        };

        Ok(DashboardSummary {
            document_count,
            department_count,
            user_count,
            company_count: None,
        })
    }

    /// Returns the tenant settings record (currently the company itself).
    /// Gated on settings-management permission.
    pub async fn settings(&self, actor: &UserProfile) -> AppResult<Company> {
        let (scope, company_id) = self.scoped_company(actor).await?;
        require_manage_settings(&scope)?;

        self.tenants
            .find(company_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no company '{company_id}'")))
    }

    /// Renames the actor's tenant. Gated on settings-management permission.
    pub async fn update_settings(&self, actor: &UserProfile, name: &str) -> AppResult<Company> {
        let (scope, company_id) = self.scoped_company(actor).await?;
        require_manage_settings(&scope)?;

        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "company name must not be empty".to_owned(),
            ));
        }

        self.tenants.update_name(company_id, name).await
    }

    async fn scoped_company(&self, actor: &UserProfile) -> AppResult<(AccessScope, TenantId)> {
        let company_id = actor.company_id.ok_or_else(|| {
            AppError::Forbidden("tenant settings require a company affiliation".to_owned())
        })?;
        let scope = self.access.scope_for_profile(actor).await?;
        Ok((scope, company_id))
    }

    async fn count_documents(&self, company_id: TenantId, scope: &AccessScope) -> AppResult<i64> {
        if scope.company_wide {
            return self.documents.count_for_company(company_id).await;
        }

        // Mirrors listing: scoped departments plus company-wide documents.
        let department_ids: Vec<_> = scope.department_ids.iter().copied().collect();
        self.documents
            .count_for_departments(company_id, &department_ids)
            .await
    }
}

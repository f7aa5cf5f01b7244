//! Department listing and management.

use std::collections::HashMap;
use std::sync::Arc;

use deskhive_core::{AppError, AppResult, TenantId};
use deskhive_domain::{Department, DepartmentId, UserProfile};

use crate::access_service::{AccessService, require_manage_departments};
use crate::ports::{DepartmentRepository, DepartmentUpdate, NewDepartment};

/// Input for creating a department.
#[derive(Debug, Clone)]
pub struct CreateDepartmentInput {
    /// Display name.
    pub name: String,
    /// Parent department for a subdivision.
    pub parent_department_id: Option<DepartmentId>,
}

/// Application service for departments.
#[derive(Clone)]
pub struct DepartmentService {
    departments: Arc<dyn DepartmentRepository>,
    access: AccessService,
}

impl DepartmentService {
    /// Creates a new department service.
    #[must_use]
    pub fn new(departments: Arc<dyn DepartmentRepository>, access: AccessService) -> Self {
        Self {
            departments,
            access,
        }
    }

    /// Lists the departments of the actor's company. Any tenant member may
    /// browse the directory; mutation is gated separately.
    pub async fn list_departments(&self, actor: &UserProfile) -> AppResult<Vec<Department>> {
        let company_id = require_company(actor)?;
        // Touch the scope so a restricted (unknown-role) profile is rejected.
        let scope = self.access.scope_for_profile(actor).await?;
        if !scope.platform_wide && !scope.company_wide && !scope.has_department_access() {
            return Ok(Vec::new());
        }

        self.departments.list_for_company(company_id).await
    }

    /// Creates a department; requires department-management permission.
    pub async fn create_department(
        &self,
        actor: &UserProfile,
        input: CreateDepartmentInput,
    ) -> AppResult<Department> {
        let company_id = require_company(actor)?;
        let scope = self.access.scope_for_profile(actor).await?;
        require_manage_departments(&scope)?;

        if input.name.trim().is_empty() {
            return Err(AppError::Validation(
                "department name must not be empty".to_owned(),
            ));
        }

        if let Some(parent_id) = input.parent_department_id {
            let parent = self
                .departments
                .find(parent_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("no department '{parent_id}'")))?;
            if parent.company_id != company_id {
                return Err(AppError::Validation(
                    "parent department belongs to another company".to_owned(),
                ));
            }
        }

        self.departments
            .create(NewDepartment {
                company_id,
                name: input.name,
                parent_department_id: input.parent_department_id,
            })
            .await
    }

    /// Renames and/or re-parents a department; requires department-management
    /// permission. Re-parenting that would make a department its own ancestor
    /// is rejected.
    pub async fn update_department(
        &self,
        actor: &UserProfile,
        department_id: DepartmentId,
        update: DepartmentUpdate,
    ) -> AppResult<Department> {
        let company_id = require_company(actor)?;
        let scope = self.access.scope_for_profile(actor).await?;
        require_manage_departments(&scope)?;

        let existing = self
            .departments
            .find(department_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no department '{department_id}'")))?;
        if existing.company_id != company_id {
            return Err(AppError::NotFound(format!(
                "no department '{department_id}'"
            )));
        }

        if let Some(name) = update.name.as_deref()
            && name.trim().is_empty()
        {
            return Err(AppError::Validation(
                "department name must not be empty".to_owned(),
            ));
        }

        if let Some(Some(new_parent)) = update.parent_department_id {
            self.reject_cycle(company_id, department_id, new_parent)
                .await?;
        }

        self.departments.update(department_id, update).await
    }

    /// Walks the ancestor chain from `new_parent`; the chain must never reach
    /// `department_id` or the forest would gain a cycle.
    async fn reject_cycle(
        &self,
        company_id: TenantId,
        department_id: DepartmentId,
        new_parent: DepartmentId,
    ) -> AppResult<()> {
        if new_parent == department_id {
            return Err(AppError::Validation(
                "a department cannot be its own parent".to_owned(),
            ));
        }

        let all = self.departments.list_for_company(company_id).await?;
        let parents: HashMap<DepartmentId, Option<DepartmentId>> = all
            .iter()
            .map(|department| (department.id, department.parent_department_id))
            .collect();

        if !parents.contains_key(&new_parent) {
            return Err(AppError::NotFound(format!("no department '{new_parent}'")));
        }

        let mut cursor = Some(new_parent);
        let mut hops = 0usize;
        while let Some(current) = cursor {
            if current == department_id {
                return Err(AppError::Validation(
                    "re-parenting would make the department its own ancestor".to_owned(),
                ));
            }
            hops += 1;
            if hops > parents.len() {
                // A pre-existing cycle in stored data; refuse to extend it.
                return Err(AppError::Internal(
                    "department parent chain does not terminate".to_owned(),
                ));
            }
            cursor = parents.get(&current).copied().flatten();
        }

        Ok(())
    }
}

fn require_company(actor: &UserProfile) -> AppResult<TenantId> {
    actor.company_id.ok_or_else(|| {
        AppError::Forbidden("department access requires a company affiliation".to_owned())
    })
}

//! In-memory port implementations shared by the service test modules.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use deskhive_core::{AppError, AppResult, PrincipalClaims, TenantId};
use deskhive_domain::{
    AccessGrant, Company, Department, DepartmentId, Document, DocumentId, GrantId, Role, RoleName,
    UserId, UserProfile, UserStatus,
};

use crate::ports::{
    DepartmentRepository, DepartmentUpdate, DocumentRepository, GrantRepository, IdentityProvider,
    NewDepartment, NewDocument, NewGrant, NewProfile, ProfileRepository, ProfileUpdate,
    RoleRepository, TenantRepository,
};

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Seeded role taxonomy matching the initial migration.
#[must_use]
pub fn seeded_roles() -> Vec<Role> {
    vec![
        Role {
            id: 1,
            name: RoleName::Superuser,
            hierarchy_level: 0,
        },
        Role {
            id: 2,
            name: RoleName::Master,
            hierarchy_level: 1,
        },
        Role {
            id: 3,
            name: RoleName::Manager,
            hierarchy_level: 2,
        },
        Role {
            id: 4,
            name: RoleName::Coordinator,
            hierarchy_level: 3,
        },
        Role {
            id: 5,
            name: RoleName::User,
            hierarchy_level: 4,
        },
    ]
}

#[derive(Default)]
pub struct FakeRoleRepository;

#[async_trait]
impl RoleRepository for FakeRoleRepository {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(seeded_roles())
    }

    async fn find_role(&self, role_id: i32) -> AppResult<Option<Role>> {
        Ok(seeded_roles().into_iter().find(|role| role.id == role_id))
    }
}

#[derive(Default)]
pub struct FakeProfileRepository {
    profiles: Mutex<Vec<UserProfile>>,
}

impl FakeProfileRepository {
    pub fn with_profiles(profiles: Vec<UserProfile>) -> Self {
        Self {
            profiles: Mutex::new(profiles),
        }
    }
}

#[async_trait]
impl ProfileRepository for FakeProfileRepository {
    async fn find_by_subject(&self, subject: &str) -> AppResult<Option<UserProfile>> {
        Ok(guard(&self.profiles)
            .iter()
            .find(|profile| profile.subject == subject)
            .cloned())
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserProfile>> {
        Ok(guard(&self.profiles)
            .iter()
            .find(|profile| profile.id == user_id)
            .cloned())
    }

    async fn find_pending_by_email(&self, email: &str) -> AppResult<Option<UserProfile>> {
        Ok(guard(&self.profiles)
            .iter()
            .find(|profile| profile.email == email && profile.status == UserStatus::Pending)
            .cloned())
    }

    async fn link_subject(&self, user_id: UserId, subject: &str) -> AppResult<UserProfile> {
        let mut profiles = guard(&self.profiles);
        let profile = profiles
            .iter_mut()
            .find(|profile| profile.id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("no profile for user '{user_id}'")))?;

        profile.subject = subject.to_owned();
        profile.status = UserStatus::Active;
        Ok(profile.clone())
    }

    async fn list_for_company(&self, company_id: TenantId) -> AppResult<Vec<UserProfile>> {
        Ok(guard(&self.profiles)
            .iter()
            .filter(|profile| profile.company_id == Some(company_id))
            .cloned()
            .collect())
    }

    async fn count_for_company(&self, company_id: TenantId) -> AppResult<i64> {
        Ok(self.list_for_company(company_id).await?.len() as i64)
    }

    async fn create(&self, input: NewProfile) -> AppResult<UserProfile> {
        let roles = seeded_roles();
        let profile = UserProfile {
            id: UserId::new(),
            subject: String::new(),
            company_id: Some(input.company_id),
            department_id: input.department_id,
            role: roles.into_iter().find(|role| role.id == input.role_id),
            full_name: input.full_name,
            email: input.email,
            status: UserStatus::Pending,
        };

        guard(&self.profiles).push(profile.clone());
        Ok(profile)
    }

    async fn update(&self, user_id: UserId, update: ProfileUpdate) -> AppResult<UserProfile> {
        let mut profiles = guard(&self.profiles);
        let profile = profiles
            .iter_mut()
            .find(|profile| profile.id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("no profile for user '{user_id}'")))?;

        if let Some(role_id) = update.role_id {
            profile.role = seeded_roles().into_iter().find(|role| role.id == role_id);
        }
        if let Some(department_id) = update.department_id {
            profile.department_id = department_id;
        }
        if let Some(status) = update.status {
            profile.status = status;
        }

        Ok(profile.clone())
    }
}

#[derive(Default)]
pub struct FakeGrantRepository {
    grants: Mutex<Vec<AccessGrant>>,
}

#[async_trait]
impl GrantRepository for FakeGrantRepository {
    async fn insert(&self, input: NewGrant) -> AppResult<AccessGrant> {
        let mut grants = guard(&self.grants);
        let duplicate = grants.iter().any(|grant| {
            grant.user_id == input.user_id
                && grant.target_department_id == input.target_department_id
        });
        if duplicate {
            return Err(AppError::Conflict(
                "user already has access to this department".to_owned(),
            ));
        }

        let grant = AccessGrant {
            id: GrantId::new(),
            user_id: input.user_id,
            target_department_id: input.target_department_id,
            granted_by_user_id: input.granted_by_user_id,
            created_at: Utc::now(),
        };
        grants.push(grant.clone());
        Ok(grant)
    }

    async fn find(&self, grant_id: GrantId) -> AppResult<Option<AccessGrant>> {
        Ok(guard(&self.grants)
            .iter()
            .find(|grant| grant.id == grant_id)
            .cloned())
    }

    async fn delete(&self, grant_id: GrantId) -> AppResult<AccessGrant> {
        let mut grants = guard(&self.grants);
        let index = grants
            .iter()
            .position(|grant| grant.id == grant_id)
            .ok_or_else(|| AppError::NotFound(format!("no grant '{grant_id}'")))?;

        Ok(grants.remove(index))
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<AccessGrant>> {
        Ok(guard(&self.grants)
            .iter()
            .filter(|grant| grant.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct FakeDepartmentRepository {
    departments: Mutex<Vec<Department>>,
}

impl FakeDepartmentRepository {
    pub fn with_departments(departments: Vec<Department>) -> Self {
        Self {
            departments: Mutex::new(departments),
        }
    }
}

#[async_trait]
impl DepartmentRepository for FakeDepartmentRepository {
    async fn list_for_company(&self, company_id: TenantId) -> AppResult<Vec<Department>> {
        Ok(guard(&self.departments)
            .iter()
            .filter(|department| department.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn count_for_company(&self, company_id: TenantId) -> AppResult<i64> {
        Ok(self.list_for_company(company_id).await?.len() as i64)
    }

    async fn find(&self, department_id: DepartmentId) -> AppResult<Option<Department>> {
        Ok(guard(&self.departments)
            .iter()
            .find(|department| department.id == department_id)
            .cloned())
    }

    async fn create(&self, input: NewDepartment) -> AppResult<Department> {
        let department = Department {
            id: DepartmentId::new(),
            company_id: input.company_id,
            name: input.name,
            parent_department_id: input.parent_department_id,
            created_at: Utc::now(),
        };
        guard(&self.departments).push(department.clone());
        Ok(department)
    }

    async fn update(
        &self,
        department_id: DepartmentId,
        update: DepartmentUpdate,
    ) -> AppResult<Department> {
        let mut departments = guard(&self.departments);
        let department = departments
            .iter_mut()
            .find(|department| department.id == department_id)
            .ok_or_else(|| AppError::NotFound(format!("no department '{department_id}'")))?;

        if let Some(name) = update.name {
            department.name = name;
        }
        if let Some(parent) = update.parent_department_id {
            department.parent_department_id = parent;
        }

        Ok(department.clone())
    }
}

#[derive(Default)]
pub struct FakeDocumentRepository {
    documents: Mutex<Vec<Document>>,
}

#[async_trait]
impl DocumentRepository for FakeDocumentRepository {
    async fn list_all(&self) -> AppResult<Vec<Document>> {
        Ok(guard(&self.documents).clone())
    }

    async fn list_for_company(&self, company_id: TenantId) -> AppResult<Vec<Document>> {
        Ok(guard(&self.documents)
            .iter()
            .filter(|document| document.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn list_for_departments(
        &self,
        company_id: TenantId,
        department_ids: &[DepartmentId],
    ) -> AppResult<Vec<Document>> {
        Ok(guard(&self.documents)
            .iter()
            .filter(|document| {
                document.company_id == company_id
                    && match document.department_id {
                        Some(department) => department_ids.contains(&department),
                        None => true,
                    }
            })
            .cloned()
            .collect())
    }

    async fn count_all(&self) -> AppResult<i64> {
        Ok(guard(&self.documents).len() as i64)
    }

    async fn count_for_company(&self, company_id: TenantId) -> AppResult<i64> {
        Ok(self.list_for_company(company_id).await?.len() as i64)
    }

    async fn count_for_departments(
        &self,
        company_id: TenantId,
        department_ids: &[DepartmentId],
    ) -> AppResult<i64> {
        Ok(self
            .list_for_departments(company_id, department_ids)
            .await?
            .len() as i64)
    }

    async fn insert(&self, input: NewDocument) -> AppResult<Document> {
        let document = Document {
            id: DocumentId::new(),
            company_id: input.company_id,
            department_id: input.department_id,
            name: input.name,
            storage_locator: input.storage_locator,
            file_type: input.file_type,
            file_size: input.file_size,
            uploaded_by: input.uploaded_by,
            created_at: Utc::now(),
        };
        guard(&self.documents).push(document.clone());
        Ok(document)
    }

    async fn find(&self, document_id: DocumentId) -> AppResult<Option<Document>> {
        Ok(guard(&self.documents)
            .iter()
            .find(|document| document.id == document_id)
            .cloned())
    }
}

#[derive(Default)]
pub struct FakeTenantRepository {
    companies: Mutex<Vec<Company>>,
}

impl FakeTenantRepository {
    pub fn with_companies(companies: Vec<Company>) -> Self {
        Self {
            companies: Mutex::new(companies),
        }
    }
}

#[async_trait]
impl TenantRepository for FakeTenantRepository {
    async fn list_all(&self) -> AppResult<Vec<Company>> {
        Ok(guard(&self.companies).clone())
    }

    async fn count_all(&self) -> AppResult<i64> {
        Ok(guard(&self.companies).len() as i64)
    }

    async fn find(&self, company_id: TenantId) -> AppResult<Option<Company>> {
        Ok(guard(&self.companies)
            .iter()
            .find(|company| company.id == company_id)
            .cloned())
    }

    async fn create(&self, name: &str) -> AppResult<Company> {
        let company = Company {
            id: TenantId::new(),
            name: name.to_owned(),
            created_at: Utc::now(),
        };
        guard(&self.companies).push(company.clone());
        Ok(company)
    }

    async fn update_name(&self, company_id: TenantId, name: &str) -> AppResult<Company> {
        let mut companies = guard(&self.companies);
        let company = companies
            .iter_mut()
            .find(|company| company.id == company_id)
            .ok_or_else(|| AppError::NotFound(format!("no company '{company_id}'")))?;

        company.name = name.to_owned();
        Ok(company.clone())
    }
}

/// Identity provider fake: a token map plus an outage switch for testing the
/// `Unavailable` path.
#[derive(Default)]
pub struct FakeIdentityProvider {
    tokens: Mutex<HashMap<String, PrincipalClaims>>,
    unavailable: Mutex<bool>,
}

impl FakeIdentityProvider {
    pub fn register_token(&self, token: &str, claims: PrincipalClaims) {
        guard(&self.tokens).insert(token.to_owned(), claims);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        *guard(&self.unavailable) = unavailable;
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn verify_token(&self, token: &str) -> AppResult<PrincipalClaims> {
        if *guard(&self.unavailable) {
            return Err(AppError::Unavailable(
                "identity provider unreachable".to_owned(),
            ));
        }

        guard(&self.tokens)
            .get(token)
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("invalid credential".to_owned()))
    }
}

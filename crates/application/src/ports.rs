//! Repository and provider ports implemented by the infrastructure crate.

use async_trait::async_trait;
use deskhive_core::{AppResult, PrincipalClaims, TenantId};
use deskhive_domain::{
    AccessGrant, Company, Department, DepartmentId, Document, DocumentId, GrantId, Role, UserId,
    UserProfile, UserStatus,
};

/// External identity provider port.
///
/// `verify_token` must distinguish an invalid credential (`Unauthorized`)
/// from a transport failure (`Unavailable`); the latter is retryable and must
/// never collapse into a denied login.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verifies a bearer token and returns the principal claims.
    async fn verify_token(&self, token: &str) -> AppResult<PrincipalClaims>;
}

/// Read port for the seeded role taxonomy.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Lists all seeded roles.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Finds a role by its record id.
    async fn find_role(&self, role_id: i32) -> AppResult<Option<Role>>;
}

/// Input for creating an invited (pending) profile.
#[derive(Debug, Clone)]
pub struct NewProfile {
    /// Owning tenant.
    pub company_id: TenantId,
    /// Home department, if assigned at invite time.
    pub department_id: Option<DepartmentId>,
    /// Role record id.
    pub role_id: i32,
    /// Display name.
    pub full_name: String,
    /// Contact email used to link the identity on first login.
    pub email: String,
}

/// Partial update for an existing profile. `None` means "leave unchanged";
/// `department_id` carries a nested option so the home department can be
/// cleared explicitly.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// New role record id.
    pub role_id: Option<i32>,
    /// New home department (`Some(None)` clears it).
    pub department_id: Option<Option<DepartmentId>>,
    /// New provisioning status.
    pub status: Option<UserStatus>,
}

/// Repository port for user profiles.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Finds the profile linked to an identity provider subject.
    async fn find_by_subject(&self, subject: &str) -> AppResult<Option<UserProfile>>;

    /// Finds a profile by id.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserProfile>>;

    /// Finds a pending (invited, unlinked) profile by email.
    async fn find_pending_by_email(&self, email: &str) -> AppResult<Option<UserProfile>>;

    /// Links an identity provider subject to a pending profile and activates it.
    async fn link_subject(&self, user_id: UserId, subject: &str) -> AppResult<UserProfile>;

    /// Lists profiles of one tenant, joined with their roles.
    async fn list_for_company(&self, company_id: TenantId) -> AppResult<Vec<UserProfile>>;

    /// Counts profiles of one tenant.
    async fn count_for_company(&self, company_id: TenantId) -> AppResult<i64>;

    /// Creates a pending profile from an invite.
    async fn create(&self, input: NewProfile) -> AppResult<UserProfile>;

    /// Applies a partial update to a profile.
    async fn update(&self, user_id: UserId, update: ProfileUpdate) -> AppResult<UserProfile>;
}

/// Input for creating an access grant.
#[derive(Debug, Clone)]
pub struct NewGrant {
    /// User receiving visibility.
    pub user_id: UserId,
    /// Department made visible.
    pub target_department_id: DepartmentId,
    /// User creating the grant.
    pub granted_by_user_id: UserId,
}

/// Repository port for the grant ledger.
#[async_trait]
pub trait GrantRepository: Send + Sync {
    /// Inserts a grant. Fails with `Conflict` when the
    /// (user, target department) pair already exists.
    async fn insert(&self, input: NewGrant) -> AppResult<AccessGrant>;

    /// Finds a grant by id.
    async fn find(&self, grant_id: GrantId) -> AppResult<Option<AccessGrant>>;

    /// Deletes a grant, returning the removed row. Fails with `NotFound`
    /// when the grant is absent.
    async fn delete(&self, grant_id: GrantId) -> AppResult<AccessGrant>;

    /// Lists grants held by one user.
    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<AccessGrant>>;
}

/// Input for creating a department.
#[derive(Debug, Clone)]
pub struct NewDepartment {
    /// Owning tenant.
    pub company_id: TenantId,
    /// Display name.
    pub name: String,
    /// Parent department, when creating a subdivision.
    pub parent_department_id: Option<DepartmentId>,
}

/// Partial update for a department.
#[derive(Debug, Clone, Default)]
pub struct DepartmentUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New parent (`Some(None)` detaches the department to the forest root).
    pub parent_department_id: Option<Option<DepartmentId>>,
}

/// Repository port for departments.
#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    /// Lists departments of one tenant.
    async fn list_for_company(&self, company_id: TenantId) -> AppResult<Vec<Department>>;

    /// Counts departments of one tenant.
    async fn count_for_company(&self, company_id: TenantId) -> AppResult<i64>;

    /// Finds a department by id.
    async fn find(&self, department_id: DepartmentId) -> AppResult<Option<Department>>;

    /// Creates a department.
    async fn create(&self, input: NewDepartment) -> AppResult<Department>;

    /// Applies a partial update. Fails with `NotFound` when absent.
    async fn update(
        &self,
        department_id: DepartmentId,
        update: DepartmentUpdate,
    ) -> AppResult<Department>;
}

/// Input for registering uploaded document metadata.
#[derive(Debug, Clone)]
pub struct NewDocument {
    /// Owning tenant.
    pub company_id: TenantId,
    /// Scoping department; `None` registers a company-wide document.
    pub department_id: Option<DepartmentId>,
    /// Display name.
    pub name: String,
    /// Object storage path.
    pub storage_locator: String,
    /// MIME type.
    pub file_type: String,
    /// File size in bytes.
    pub file_size: i64,
    /// Uploading profile.
    pub uploaded_by: UserId,
}

/// Repository port for document metadata.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Lists all documents across tenants (platform scope only).
    async fn list_all(&self) -> AppResult<Vec<Document>>;

    /// Lists all documents of one tenant, including company-wide ones.
    async fn list_for_company(&self, company_id: TenantId) -> AppResult<Vec<Document>>;

    /// Lists documents scoped to the given departments of one tenant, plus
    /// the tenant's company-wide documents (no department).
    async fn list_for_departments(
        &self,
        company_id: TenantId,
        department_ids: &[DepartmentId],
    ) -> AppResult<Vec<Document>>;

    /// Counts all documents across tenants.
    async fn count_all(&self) -> AppResult<i64>;

    /// Counts all documents of one tenant.
    async fn count_for_company(&self, company_id: TenantId) -> AppResult<i64>;

    /// Counts documents scoped to the given departments of one tenant, plus
    /// the tenant's company-wide documents (no department).
    async fn count_for_departments(
        &self,
        company_id: TenantId,
        department_ids: &[DepartmentId],
    ) -> AppResult<i64>;

    /// Registers uploaded document metadata.
    async fn insert(&self, input: NewDocument) -> AppResult<Document>;

    /// Finds a document by id.
    async fn find(&self, document_id: DocumentId) -> AppResult<Option<Document>>;
}

/// Repository port for tenant accounts.
#[async_trait]
pub trait TenantRepository: Send + Sync {
    /// Lists all tenants (platform scope only).
    async fn list_all(&self) -> AppResult<Vec<Company>>;

    /// Counts all tenants.
    async fn count_all(&self) -> AppResult<i64>;

    /// Finds a tenant by id.
    async fn find(&self, company_id: TenantId) -> AppResult<Option<Company>>;

    /// Creates a tenant.
    async fn create(&self, name: &str) -> AppResult<Company>;

    /// Renames a tenant. Fails with `NotFound` when absent.
    async fn update_name(&self, company_id: TenantId, name: &str) -> AppResult<Company>;
}

//! Application services orchestrating the domain model over repository ports.

#![forbid(unsafe_code)]

pub mod access_service;
pub mod department_service;
pub mod directory_service;
pub mod document_service;
pub mod grant_service;
pub mod ports;
pub mod profile_service;
pub mod resolution;
pub mod scope_cache;
pub mod tenant_service;

#[cfg(test)]
pub(crate) mod fakes;

pub use access_service::{
    AccessService, require_department_in_scope, require_manage_departments, require_manage_settings,
    require_manage_users, require_platform_scope,
};
pub use department_service::{CreateDepartmentInput, DepartmentService};
pub use directory_service::{DirectoryService, InviteUserInput};
pub use document_service::{DocumentService, RegisterDocumentInput};
pub use grant_service::GrantService;
pub use ports::{
    DepartmentRepository, DepartmentUpdate, DocumentRepository, GrantRepository, IdentityProvider,
    NewDepartment, NewDocument, NewGrant, NewProfile, ProfileRepository, ProfileUpdate,
    RoleRepository, TenantRepository,
};
pub use profile_service::{LoginOutcome, ProfileService, profile_not_found, require_provisioned};
pub use resolution::{
    CompletionStatus, ResolutionTicket, ResolvedSession, SessionResolution, SessionResolver,
};
pub use scope_cache::ScopeCache;
pub use tenant_service::{DashboardSummary, TenantService};

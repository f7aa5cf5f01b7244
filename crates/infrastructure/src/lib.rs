//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_identity_provider;
mod postgres_department_repository;
mod postgres_document_repository;
mod postgres_grant_repository;
mod postgres_profile_repository;
mod postgres_role_repository;
mod postgres_tenant_repository;

pub use http_identity_provider::HttpIdentityProvider;
pub use postgres_department_repository::PostgresDepartmentRepository;
pub use postgres_document_repository::PostgresDocumentRepository;
pub use postgres_grant_repository::PostgresGrantRepository;
pub use postgres_profile_repository::PostgresProfileRepository;
pub use postgres_role_repository::PostgresRoleRepository;
pub use postgres_tenant_repository::PostgresTenantRepository;

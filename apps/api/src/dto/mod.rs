//! Request and response payloads with TypeScript type exports.

mod auth;
mod common;
mod departments;
mod directory;
mod documents;
mod grants;
mod tenancy;

use deskhive_core::AppError;
use deskhive_domain::DepartmentId;
use uuid::Uuid;

pub use auth::{AuthLoginRequest, SessionResponse};
pub use common::{AccessScopeResponse, HealthResponse, RoleResponse, UserProfileResponse};
pub use departments::{CreateDepartmentRequest, DepartmentResponse, UpdateDepartmentRequest};
pub use directory::{InviteUserRequest, UpdateUserRequest};
pub use documents::{DocumentResponse, RegisterDocumentRequest};
pub use grants::{CreateGrantRequest, GrantResponse};
pub use tenancy::{
    CompanyResponse, CreateCompanyRequest, DashboardResponse, UpdateSettingsRequest,
};

pub(crate) fn parse_department_id(value: &str) -> Result<DepartmentId, AppError> {
    Uuid::parse_str(value)
        .map(DepartmentId::from_uuid)
        .map_err(|error| AppError::Validation(format!("invalid department id '{value}': {error}")))
}

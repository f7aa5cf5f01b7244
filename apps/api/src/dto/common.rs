use deskhive_domain::{AccessScope, Role, UserProfile};
use serde::Serialize;
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// API representation of a role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub id: i32,
    pub name: String,
    /// Lower values carry broader privilege.
    pub hierarchy_level: i32,
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            name: role.name.as_str().to_owned(),
            hierarchy_level: role.hierarchy_level,
        }
    }
}

/// API representation of a tenant user profile.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-profile-response.ts"
)]
pub struct UserProfileResponse {
    pub id: String,
    pub company_id: Option<String>,
    pub department_id: Option<String>,
    pub role: Option<RoleResponse>,
    pub full_name: String,
    pub email: String,
    pub status: String,
}

impl From<UserProfile> for UserProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id.to_string(),
            company_id: profile.company_id.map(|id| id.to_string()),
            department_id: profile.department_id.map(|id| id.to_string()),
            role: profile.role.map(RoleResponse::from),
            full_name: profile.full_name,
            email: profile.email,
            status: profile.status.as_str().to_owned(),
        }
    }
}

/// API representation of a resolved access scope.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/access-scope-response.ts"
)]
pub struct AccessScopeResponse {
    pub platform_wide: bool,
    pub company_wide: bool,
    pub department_ids: Vec<String>,
    pub can_manage_users: bool,
    pub can_manage_departments: bool,
    pub can_manage_settings: bool,
}

impl From<AccessScope> for AccessScopeResponse {
    fn from(scope: AccessScope) -> Self {
        Self {
            platform_wide: scope.platform_wide,
            company_wide: scope.company_wide,
            department_ids: scope
                .department_ids
                .iter()
                .map(|id| id.to_string())
                .collect(),
            can_manage_users: scope.can_manage_users,
            can_manage_departments: scope.can_manage_departments,
            can_manage_settings: scope.can_manage_settings,
        }
    }
}

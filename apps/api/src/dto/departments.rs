use deskhive_core::AppError;
use deskhive_domain::Department;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use deskhive_application::DepartmentUpdate;

use super::parse_department_id;

/// API representation of a department.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/department-response.ts"
)]
pub struct DepartmentResponse {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub parent_department_id: Option<String>,
    pub created_at: String,
}

impl From<Department> for DepartmentResponse {
    fn from(department: Department) -> Self {
        Self {
            id: department.id.to_string(),
            company_id: department.company_id.to_string(),
            name: department.name,
            parent_department_id: department.parent_department_id.map(|id| id.to_string()),
            created_at: department.created_at.to_rfc3339(),
        }
    }
}

/// Incoming payload for creating a department.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-department-request.ts"
)]
pub struct CreateDepartmentRequest {
    pub name: String,
    pub parent_department_id: Option<String>,
}

/// Incoming payload for a partial department update. `detach_parent` moves
/// the department to the forest root; an absent `parent_department_id` means
/// "no change".
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-department-request.ts"
)]
pub struct UpdateDepartmentRequest {
    pub name: Option<String>,
    pub parent_department_id: Option<String>,
    #[serde(default)]
    pub detach_parent: bool,
}

impl TryFrom<UpdateDepartmentRequest> for DepartmentUpdate {
    type Error = AppError;

    fn try_from(request: UpdateDepartmentRequest) -> Result<Self, Self::Error> {
        let parent_department_id = if request.detach_parent {
            Some(None)
        } else {
            request
                .parent_department_id
                .as_deref()
                .map(parse_department_id)
                .transpose()?
                .map(Some)
        };

        Ok(Self {
            name: request.name,
            parent_department_id,
        })
    }
}

use deskhive_domain::Company;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use deskhive_application::DashboardSummary;

/// API representation of a tenant.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/company-response.ts"
)]
pub struct CompanyResponse {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

impl From<Company> for CompanyResponse {
    fn from(company: Company) -> Self {
        Self {
            id: company.id.to_string(),
            name: company.name,
            created_at: company.created_at.to_rfc3339(),
        }
    }
}

/// Incoming payload for creating a tenant.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-company-request.ts"
)]
pub struct CreateCompanyRequest {
    pub name: String,
}

/// Incoming payload for updating tenant settings.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-settings-request.ts"
)]
pub struct UpdateSettingsRequest {
    pub name: String,
}

/// Per-scope dashboard counts. Optional counts are absent when the caller's
/// scope does not extend to that population.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/dashboard-response.ts"
)]
pub struct DashboardResponse {
    pub document_count: i64,
    pub department_count: i64,
    pub user_count: Option<i64>,
    pub company_count: Option<i64>,
}

impl From<DashboardSummary> for DashboardResponse {
    fn from(summary: DashboardSummary) -> Self {
        Self {
            document_count: summary.document_count,
            department_count: summary.department_count,
            user_count: summary.user_count,
            company_count: summary.company_count,
        }
    }
}

use deskhive_domain::AccessGrant;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of an access grant.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/grant-response.ts"
)]
pub struct GrantResponse {
    pub id: String,
    pub user_id: String,
    pub target_department_id: String,
    pub granted_by_user_id: String,
    pub created_at: String,
}

impl From<AccessGrant> for GrantResponse {
    fn from(grant: AccessGrant) -> Self {
        Self {
            id: grant.id.to_string(),
            user_id: grant.user_id.to_string(),
            target_department_id: grant.target_department_id.to_string(),
            granted_by_user_id: grant.granted_by_user_id.to_string(),
            created_at: grant.created_at.to_rfc3339(),
        }
    }
}

/// Incoming payload for granting department visibility to a user.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-grant-request.ts"
)]
pub struct CreateGrantRequest {
    pub department_id: String,
}

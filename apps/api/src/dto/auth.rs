use serde::{Deserialize, Serialize};
use ts_rs::TS;

use deskhive_application::ResolvedSession;

use super::{AccessScopeResponse, UserProfileResponse};

/// Incoming payload for provider-token login.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/auth-login-request.ts"
)]
pub struct AuthLoginRequest {
    pub provider_token: String,
}

/// Session payload for login and `/auth/me`.
///
/// `provisioned: false` means the principal authenticated but has no tenant
/// profile yet; `display_name`/`email` then carry the verified claims so the
/// frontend can show a setup affordance.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/session-response.ts"
)]
pub struct SessionResponse {
    pub provisioned: bool,
    pub profile: Option<UserProfileResponse>,
    pub scope: Option<AccessScopeResponse>,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl From<ResolvedSession> for SessionResponse {
    fn from(resolved: ResolvedSession) -> Self {
        match resolved {
            ResolvedSession::Provisioned { profile, scope } => Self {
                provisioned: true,
                profile: Some(profile.into()),
                scope: Some(scope.into()),
                display_name: None,
                email: None,
            },
            ResolvedSession::Unprovisioned { claims } => Self {
                provisioned: false,
                profile: None,
                scope: None,
                display_name: Some(claims.display_name().to_owned()),
                email: claims.email().map(ToOwned::to_owned),
            },
        }
    }
}

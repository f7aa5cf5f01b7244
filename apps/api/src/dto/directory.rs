use std::str::FromStr;

use deskhive_core::AppError;
use deskhive_domain::UserStatus;
use serde::Deserialize;
use ts_rs::TS;

use deskhive_application::{InviteUserInput, ProfileUpdate};

use super::parse_department_id;

/// Incoming payload for inviting a user.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/invite-user-request.ts"
)]
pub struct InviteUserRequest {
    pub email: String,
    pub full_name: String,
    pub role_id: i32,
    pub department_id: Option<String>,
}

impl TryFrom<InviteUserRequest> for InviteUserInput {
    type Error = AppError;

    fn try_from(request: InviteUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            email: request.email,
            full_name: request.full_name,
            role_id: request.role_id,
            department_id: request
                .department_id
                .as_deref()
                .map(parse_department_id)
                .transpose()?,
        })
    }
}

/// Incoming payload for a partial user update.
///
/// Omitted fields are left unchanged; `clear_department` detaches the home
/// department explicitly since an absent `department_id` means "no change".
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-user-request.ts"
)]
pub struct UpdateUserRequest {
    pub role_id: Option<i32>,
    pub department_id: Option<String>,
    #[serde(default)]
    pub clear_department: bool,
    /// New status, spelled as the storage strings ("active", "pending").
    pub status: Option<String>,
}

impl TryFrom<UpdateUserRequest> for ProfileUpdate {
    type Error = AppError;

    fn try_from(request: UpdateUserRequest) -> Result<Self, Self::Error> {
        let department_id = if request.clear_department {
            Some(None)
        } else {
            request
                .department_id
                .as_deref()
                .map(parse_department_id)
                .transpose()?
                .map(Some)
        };

        Ok(Self {
            role_id: request.role_id,
            department_id,
            status: request
                .status
                .as_deref()
                .map(UserStatus::from_str)
                .transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use deskhive_application::ProfileUpdate;
    use deskhive_domain::{DepartmentId, UserStatus};

    use super::UpdateUserRequest;

    #[test]
    fn omitted_fields_leave_the_profile_unchanged() {
        let request = UpdateUserRequest {
            role_id: None,
            department_id: None,
            clear_department: false,
            status: None,
        };

        let update = ProfileUpdate::try_from(request);
        assert!(matches!(
            update,
            Ok(ProfileUpdate {
                role_id: None,
                department_id: None,
                status: None,
            })
        ));
    }

    #[test]
    fn clear_department_maps_to_an_explicit_detach() {
        let request = UpdateUserRequest {
            role_id: None,
            department_id: None,
            clear_department: true,
            status: None,
        };

        let update = ProfileUpdate::try_from(request);
        assert!(matches!(
            update,
            Ok(ProfileUpdate {
                department_id: Some(None),
                ..
            })
        ));
    }

    #[test]
    fn department_and_status_parse_from_strings() {
        let department_id = DepartmentId::new();
        let request = UpdateUserRequest {
            role_id: Some(4),
            department_id: Some(department_id.to_string()),
            clear_department: false,
            status: Some("active".to_owned()),
        };

        let update = ProfileUpdate::try_from(request);
        assert!(matches!(
            update,
            Ok(ProfileUpdate {
                role_id: Some(4),
                department_id: Some(Some(parsed)),
                status: Some(UserStatus::Active),
            }) if parsed == department_id
        ));
    }

    #[test]
    fn status_casing_follows_the_storage_strings() {
        let request = UpdateUserRequest {
            role_id: None,
            department_id: None,
            clear_department: false,
            status: Some("ACTIVE".to_owned()),
        };

        assert!(ProfileUpdate::try_from(request).is_err());
    }

    #[test]
    fn malformed_department_id_is_rejected() {
        let request = UpdateUserRequest {
            role_id: None,
            department_id: Some("not-a-uuid".to_owned()),
            clear_department: false,
            status: None,
        };

        assert!(ProfileUpdate::try_from(request).is_err());
    }
}

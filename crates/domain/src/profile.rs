use std::fmt::{Display, Formatter};
use std::str::FromStr;

use deskhive_core::{AppError, TenantId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::department::DepartmentId;
use crate::role::{RESTRICTED_LEVEL, Role};

/// Unique identifier for a user profile record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random user identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a user identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for UserId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Provisioning state of a profile. Profiles are never deleted; deactivation
/// happens through this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Profile is active and may sign in.
    Active,
    /// Profile was invited but has not completed setup.
    Pending,
}

impl UserStatus {
    /// Returns the storage string for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
        }
    }
}

impl FromStr for UserStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "pending" => Ok(Self::Pending),
            _ => Err(AppError::Validation(format!(
                "unknown user status '{value}'"
            ))),
        }
    }
}

/// A tenant-scoped user profile joined with its role record.
///
/// `company_id` is absent only for platform administrators; `role` is absent
/// when the profile references a role record that no longer resolves, which
/// is treated as the most restrictive level everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Stable profile id.
    pub id: UserId,
    /// Subject claim linking this profile to the identity provider.
    pub subject: String,
    /// Owning tenant; `None` for platform-scope profiles.
    pub company_id: Option<TenantId>,
    /// Home department, if the profile is assigned to one.
    pub department_id: Option<DepartmentId>,
    /// Resolved role record.
    pub role: Option<Role>,
    /// Display name.
    pub full_name: String,
    /// Contact email.
    pub email: String,
    /// Provisioning state.
    pub status: UserStatus,
}

impl UserProfile {
    /// Returns the effective hierarchy level, falling back to the most
    /// restrictive level when no role resolves.
    #[must_use]
    pub fn hierarchy_level(&self) -> i32 {
        self.role
            .as_ref()
            .map_or(RESTRICTED_LEVEL, |role| role.hierarchy_level)
    }

    /// Returns whether this profile's role meets a required hierarchy level.
    /// A profile without a resolved role meets no threshold.
    #[must_use]
    pub fn is_at_least(&self, required_level: i32) -> bool {
        self.role
            .as_ref()
            .is_some_and(|role| role.is_at_least(required_level))
    }
}

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::department::DepartmentId;
use crate::profile::UserId;

/// Unique identifier for an access grant record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GrantId(Uuid);

impl GrantId {
    /// Creates a new random grant identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a grant identifier from an existing UUID value.
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

impl Default for GrantId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for GrantId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Explicit, additive visibility of one user into one department outside
/// their home hierarchy scope. Unique on (user_id, target_department_id);
/// grants are either present or absent, with no soft delete and no expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
    /// Stable grant id.
    pub id: GrantId,
    /// User receiving visibility.
    pub user_id: UserId,
    /// Department made visible.
    pub target_department_id: DepartmentId,
    /// User that created the grant.
    pub granted_by_user_id: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

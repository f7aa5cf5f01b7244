use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use deskhive_core::TenantId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a department record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DepartmentId(Uuid);

impl DepartmentId {
    /// Creates a new random department identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a department identifier from an existing UUID value.
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

impl Default for DepartmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for DepartmentId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A tenant-scoped department. Departments form a forest: zero or one parent,
/// no cycles (enforced at the service layer when re-parenting).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Stable department id.
    pub id: DepartmentId,
    /// Owning tenant.
    pub company_id: TenantId,
    /// Display name.
    pub name: String,
    /// Parent department, when this department is a subdivision.
    pub parent_department_id: Option<DepartmentId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

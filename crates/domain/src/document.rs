use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use deskhive_core::TenantId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::department::DepartmentId;
use crate::profile::UserId;

/// Unique identifier for a document record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Creates a new random document identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a document identifier from an existing UUID value.
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

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for DocumentId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Stored document metadata. The file body lives in external object storage
/// behind `storage_locator`; `department_id = None` marks a company-wide
/// document visible only at master level and above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Stable document id.
    pub id: DocumentId,
    /// Owning tenant.
    pub company_id: TenantId,
    /// Scoping department; `None` marks a company-wide document.
    pub department_id: Option<DepartmentId>,
    /// Display name.
    pub name: String,
    /// Object storage path for the file body.
    pub storage_locator: String,
    /// MIME type recorded at upload time.
    pub file_type: String,
    /// File size in bytes recorded at upload time.
    pub file_size: i64,
    /// Profile that registered the upload.
    pub uploaded_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

use chrono::{DateTime, Utc};
use deskhive_core::TenantId;
use serde::{Deserialize, Serialize};

/// A tenant account: the top-level isolation boundary for all data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Stable tenant id.
    pub id: TenantId,
    /// Display name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

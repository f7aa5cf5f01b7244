//! Role hierarchy model.
//!
//! Hierarchy levels are inverted relative to numeric magnitude: a LOWER
//! `hierarchy_level` means BROADER privilege (0 = platform admin, 4 = plain
//! user). Every comparison goes through the named predicates below; call
//! sites never compare raw integers, so the inversion lives in one place.

use std::str::FromStr;

use deskhive_core::AppError;
use serde::{Deserialize, Serialize};

/// Hierarchy level at or below which a role may manage users.
pub const MANAGE_USERS_MAX_LEVEL: i32 = 2;

/// Hierarchy level at or below which a role may manage departments.
pub const MANAGE_DEPARTMENTS_MAX_LEVEL: i32 = 1;

/// Hierarchy level at or below which a role may manage tenant settings.
pub const MANAGE_SETTINGS_MAX_LEVEL: i32 = 1;

/// Level assigned to a missing or unknown role: more restrictive than any
/// seeded role, so an unresolvable role fails closed.
pub const RESTRICTED_LEVEL: i32 = i32::MAX;

/// Built-in role taxonomy, seeded once at platform setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleName {
    /// Platform administrator with no tenant affiliation.
    Superuser,
    /// Tenant-wide administrator.
    Master,
    /// Department-scope manager.
    Manager,
    /// Department-scope coordinator.
    Coordinator,
    /// Self-scope member.
    User,
}

impl RoleName {
    /// Returns a stable storage value for this role name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Superuser => "SUPERUSER",
            Self::Master => "MASTER",
            Self::Manager => "MANAGER",
            Self::Coordinator => "COORDINATOR",
            Self::User => "USER",
        }
    }
}

impl FromStr for RoleName {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "SUPERUSER" => Ok(Self::Superuser),
            "MASTER" => Ok(Self::Master),
            "MANAGER" => Ok(Self::Manager),
            "COORDINATOR" => Ok(Self::Coordinator),
            "USER" => Ok(Self::User),
            _ => Err(AppError::Validation(format!(
                "unknown role name '{value}'"
            ))),
        }
    }
}

/// Relative privilege between two roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOrdering {
    /// The left role carries broader privilege.
    Higher,
    /// Both roles carry the same privilege.
    Equal,
    /// The left role carries narrower privilege.
    Lower,
}

/// A seeded role record: name plus hierarchy rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Stable role record id.
    pub id: i32,
    /// Role taxonomy name.
    pub name: RoleName,
    /// Hierarchy rank; lower value = broader privilege.
    pub hierarchy_level: i32,
}

impl Role {
    /// Compares privilege against another role.
    ///
    /// `Higher` means `self` outranks `other`, which is the case when
    /// `self.hierarchy_level` is numerically SMALLER.
    #[must_use]
    pub fn compare_level(&self, other: &Role) -> LevelOrdering {
        match self.hierarchy_level.cmp(&other.hierarchy_level) {
            std::cmp::Ordering::Less => LevelOrdering::Higher,
            std::cmp::Ordering::Equal => LevelOrdering::Equal,
            std::cmp::Ordering::Greater => LevelOrdering::Lower,
        }
    }

    /// Returns whether this role meets a required hierarchy level.
    ///
    /// True when `hierarchy_level <= required_level` (lower rank wins).
    #[must_use]
    pub fn is_at_least(&self, required_level: i32) -> bool {
        self.hierarchy_level <= required_level
    }
}

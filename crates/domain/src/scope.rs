//! Access scope resolution.
//!
//! `resolve_scope` is the single place privilege is derived from a profile;
//! consumers thread the resulting [`AccessScope`] through their queries and
//! never re-derive visibility from role names or raw hierarchy levels.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::department::DepartmentId;
use crate::grant::AccessGrant;
use crate::profile::UserProfile;
use crate::role::{
    MANAGE_DEPARTMENTS_MAX_LEVEL, MANAGE_SETTINGS_MAX_LEVEL, MANAGE_USERS_MAX_LEVEL, RoleName,
};

/// Computed visibility and management permissions for one resolved profile.
///
/// Consumers must check `platform_wide` and `company_wide` before consulting
/// `department_ids`: company-wide access subsumes all departments and leaves
/// the set empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessScope {
    /// Cross-tenant visibility; true only for platform administrators.
    pub platform_wide: bool,
    /// Whole-tenant visibility; true for tenant masters.
    pub company_wide: bool,
    /// Visible departments: home department plus granted departments.
    pub department_ids: BTreeSet<DepartmentId>,
    /// May manage users (invite, edit role/department/status).
    pub can_manage_users: bool,
    /// May manage departments (create, rename, re-parent).
    pub can_manage_departments: bool,
    /// May manage tenant settings.
    pub can_manage_settings: bool,
}

impl AccessScope {
    /// The empty, fully-restricted scope. Used for unknown roles and as the
    /// fail-closed default; a fetch failure must never produce this value.
    #[must_use]
    pub fn restricted() -> Self {
        Self {
            platform_wide: false,
            company_wide: false,
            department_ids: BTreeSet::new(),
            can_manage_users: false,
            can_manage_departments: false,
            can_manage_settings: false,
        }
    }

    /// Returns whether the scope covers a department.
    ///
    /// Company-wide access covers every department of the tenant; platform
    /// scope operates outside tenant data entirely and covers none.
    #[must_use]
    pub fn covers_department(&self, department_id: DepartmentId) -> bool {
        self.company_wide || self.department_ids.contains(&department_id)
    }

    /// Returns whether the scope authorizes any department-scoped records.
    #[must_use]
    pub fn has_department_access(&self) -> bool {
        self.company_wide || !self.department_ids.is_empty()
    }
}

/// Resolves the access scope for a profile and its grant ledger entries.
///
/// Pure and synchronous; callers must pass only grants where
/// `grant.user_id == profile.id`.
#[must_use]
pub fn resolve_scope(profile: &UserProfile, grants: &[AccessGrant]) -> AccessScope {
    let Some(role) = profile.role.as_ref() else {
        // Unknown role fails closed to the most restrictive scope.
        return AccessScope::restricted();
    };

    match role.name {
        RoleName::Superuser => AccessScope {
            // Platform admins operate outside tenant scope entirely; grants
            // present in the ledger for them are ignored, not merged.
            platform_wide: true,
            ..AccessScope::restricted()
        },
        RoleName::Master => AccessScope {
            company_wide: true,
            department_ids: BTreeSet::new(),
            platform_wide: false,
            can_manage_users: true,
            can_manage_departments: true,
            can_manage_settings: true,
        },
        RoleName::Manager | RoleName::Coordinator | RoleName::User => {
            let mut department_ids = BTreeSet::new();
            if let Some(home) = profile.department_id {
                department_ids.insert(home);
            }
            for grant in grants {
                department_ids.insert(grant.target_department_id);
            }

            AccessScope {
                platform_wide: false,
                company_wide: false,
                department_ids,
                can_manage_users: role.is_at_least(MANAGE_USERS_MAX_LEVEL),
                can_manage_departments: role.is_at_least(MANAGE_DEPARTMENTS_MAX_LEVEL),
                can_manage_settings: role.is_at_least(MANAGE_SETTINGS_MAX_LEVEL),
            }
        }
    }
}

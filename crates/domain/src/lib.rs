//! Domain types for Deskhive: roles, profiles, departments, documents,
//! access grants, and the access scope resolver.

#![forbid(unsafe_code)]

mod company;
mod department;
mod document;
mod grant;
mod profile;
mod role;
mod scope;

pub use company::Company;
pub use department::{Department, DepartmentId};
pub use document::{Document, DocumentId};
pub use grant::{AccessGrant, GrantId};
pub use profile::{UserId, UserProfile, UserStatus};
pub use role::{
    LevelOrdering, MANAGE_DEPARTMENTS_MAX_LEVEL, MANAGE_SETTINGS_MAX_LEVEL,
    MANAGE_USERS_MAX_LEVEL, RESTRICTED_LEVEL, Role, RoleName,
};
pub use scope::{AccessScope, resolve_scope};

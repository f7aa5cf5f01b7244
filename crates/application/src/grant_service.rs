//! Grant ledger operations: grant, revoke, list.
//!
//! Every mutation is checked against the actor's resolved scope and
//! invalidates the affected user's cached scope so the next resolution sees
//! the ledger change.

use std::sync::Arc;

use deskhive_core::{AppError, AppResult};
use deskhive_domain::{AccessGrant, DepartmentId, GrantId, UserId, UserProfile};

use crate::access_service::{
    AccessService, require_department_in_scope, require_manage_users,
};
use crate::ports::{GrantRepository, NewGrant, ProfileRepository};

/// Application service for the grant ledger.
#[derive(Clone)]
pub struct GrantService {
    grants: Arc<dyn GrantRepository>,
    profiles: Arc<dyn ProfileRepository>,
    access: AccessService,
}

impl GrantService {
    /// Creates a new grant service.
    #[must_use]
    pub fn new(
        grants: Arc<dyn GrantRepository>,
        profiles: Arc<dyn ProfileRepository>,
        access: AccessService,
    ) -> Self {
        Self {
            grants,
            profiles,
            access,
        }
    }

    /// Grants a user visibility into a department.
    ///
    /// The actor must hold user-management permission and the target
    /// department must already lie within the actor's own scope. Fails with
    /// `Conflict` when the (user, department) pair already exists.
    pub async fn grant(
        &self,
        actor: &UserProfile,
        user_id: UserId,
        target_department_id: DepartmentId,
    ) -> AppResult<AccessGrant> {
        let actor_scope = self.access.scope_for_profile(actor).await?;
        require_manage_users(&actor_scope)?;
        require_department_in_scope(&actor_scope, target_department_id)?;

        let target = self
            .profiles
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no profile for user '{user_id}'")))?;

        if target.company_id != actor.company_id {
            return Err(AppError::Validation(
                "cannot grant access to a user of another company".to_owned(),
            ));
        }

        let grant = self
            .grants
            .insert(NewGrant {
                user_id,
                target_department_id,
                granted_by_user_id: actor.id,
            })
            .await?;

        self.access.invalidate(user_id);
        Ok(grant)
    }

    /// Revokes a grant by id.
    ///
    /// Revoking a grant that does not exist is an error (`NotFound`), not a
    /// silent no-op: the caller is acting on a stale view and should refresh.
    pub async fn revoke(&self, actor: &UserProfile, grant_id: GrantId) -> AppResult<()> {
        let actor_scope = self.access.scope_for_profile(actor).await?;
        require_manage_users(&actor_scope)?;

        let grant = self
            .grants
            .find(grant_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no grant '{grant_id}'")))?;
        require_department_in_scope(&actor_scope, grant.target_department_id)?;

        let removed = self.grants.delete(grant_id).await?;
        self.access.invalidate(removed.user_id);
        Ok(())
    }

    /// Lists grants held by a user. Callers may inspect their own ledger;
    /// inspecting another user's requires user-management permission.
    pub async fn list_for_user(
        &self,
        actor: &UserProfile,
        user_id: UserId,
    ) -> AppResult<Vec<AccessGrant>> {
        if actor.id != user_id {
            let actor_scope = self.access.scope_for_profile(actor).await?;
            require_manage_users(&actor_scope)?;
        }

        self.grants.list_for_user(user_id).await
    }
}

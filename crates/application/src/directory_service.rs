//! Tenant user directory: listing, invites, and profile management.

use std::sync::Arc;

use deskhive_core::{AppError, AppResult, TenantId};
use deskhive_domain::{Role, UserId, UserProfile};

use crate::access_service::{AccessService, require_manage_users};
use crate::ports::{NewProfile, ProfileRepository, ProfileUpdate, RoleRepository};

/// Input for inviting a new user into the actor's company.
#[derive(Debug, Clone)]
pub struct InviteUserInput {
    /// Contact email; used to link the identity on first login.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Role record id to assign.
    pub role_id: i32,
    /// Home department, if assigned at invite time.
    pub department_id: Option<deskhive_domain::DepartmentId>,
}

/// Application service for the user directory.
#[derive(Clone)]
pub struct DirectoryService {
    profiles: Arc<dyn ProfileRepository>,
    roles: Arc<dyn RoleRepository>,
    access: AccessService,
}

impl DirectoryService {
    /// Creates a new directory service.
    #[must_use]
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        roles: Arc<dyn RoleRepository>,
        access: AccessService,
    ) -> Self {
        Self {
            profiles,
            roles,
            access,
        }
    }

    /// Lists the users of the actor's company, joined with their roles.
    /// Gated on user-management permission.
    pub async fn list_users(&self, actor: &UserProfile) -> AppResult<Vec<UserProfile>> {
        let company_id = require_company(actor)?;
        let scope = self.access.scope_for_profile(actor).await?;
        require_manage_users(&scope)?;

        self.profiles.list_for_company(company_id).await
    }

    /// Lists the seeded role taxonomy.
    pub async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.roles.list_roles().await
    }

    /// Creates a pending profile for an invitee.
    ///
    /// The assigned role may not outrank the actor's own.
    pub async fn invite_user(
        &self,
        actor: &UserProfile,
        input: InviteUserInput,
    ) -> AppResult<UserProfile> {
        let company_id = require_company(actor)?;
        let scope = self.access.scope_for_profile(actor).await?;
        require_manage_users(&scope)?;

        let email = input.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::Validation(
                "invite email must be a valid address".to_owned(),
            ));
        }
        if input.full_name.trim().is_empty() {
            return Err(AppError::Validation(
                "invite full name must not be empty".to_owned(),
            ));
        }

        let role = self.require_assignable_role(actor, input.role_id).await?;

        if self.profiles.find_pending_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "an invite for '{email}' is already pending"
            )));
        }

        self.profiles
            .create(NewProfile {
                company_id,
                department_id: input.department_id,
                role_id: role.id,
                full_name: input.full_name,
                email,
            })
            .await
    }

    /// Applies a partial update to a user in the actor's company.
    ///
    /// The actor must outrank (or equal) both the target's current role and
    /// any newly assigned role; the cached scope of the target is invalidated
    /// because a role or department change rewrites their visibility.
    pub async fn update_user(
        &self,
        actor: &UserProfile,
        user_id: UserId,
        update: ProfileUpdate,
    ) -> AppResult<UserProfile> {
        let company_id = require_company(actor)?;
        let scope = self.access.scope_for_profile(actor).await?;
        require_manage_users(&scope)?;

        let target = self
            .profiles
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no profile for user '{user_id}'")))?;
        if target.company_id != Some(company_id) {
            return Err(AppError::NotFound(format!(
                "no profile for user '{user_id}'"
            )));
        }

        if !actor.is_at_least(target.hierarchy_level()) {
            return Err(AppError::Forbidden(
                "cannot modify a user with broader privilege than your own".to_owned(),
            ));
        }

        if let Some(role_id) = update.role_id {
            self.require_assignable_role(actor, role_id).await?;
        }

        let updated = self.profiles.update(user_id, update).await?;
        self.access.invalidate(user_id);
        Ok(updated)
    }

    async fn require_assignable_role(&self, actor: &UserProfile, role_id: i32) -> AppResult<Role> {
        let role = self
            .roles
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::Validation(format!("unknown role id {role_id}")))?;

        if !actor.is_at_least(role.hierarchy_level) {
            return Err(AppError::Forbidden(
                "cannot assign a role with broader privilege than your own".to_owned(),
            ));
        }

        Ok(role)
    }
}

fn require_company(actor: &UserProfile) -> AppResult<TenantId> {
    actor.company_id.ok_or_else(|| {
        AppError::Forbidden("user directory access requires a company affiliation".to_owned())
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use deskhive_core::{AppError, TenantId};
    use deskhive_domain::{Role, RoleName, UserId, UserProfile, UserStatus};

    use crate::access_service::AccessService;
    use crate::fakes::{FakeGrantRepository, FakeProfileRepository, FakeRoleRepository};
    use crate::ports::ProfileUpdate;
    use crate::scope_cache::ScopeCache;

    use super::{DirectoryService, InviteUserInput};

    fn profile(company_id: TenantId, name: RoleName, level: i32, role_id: i32) -> UserProfile {
        UserProfile {
            id: UserId::new(),
            subject: format!("subject-{}", UserId::new()),
            company_id: Some(company_id),
            department_id: None,
            role: Some(Role {
                id: role_id,
                name,
                hierarchy_level: level,
            }),
            full_name: "Test".to_owned(),
            email: format!("{}@example.com", UserId::new()),
            status: UserStatus::Active,
        }
    }

    fn service_with(profiles: Vec<UserProfile>) -> DirectoryService {
        let repository = Arc::new(FakeProfileRepository::with_profiles(profiles));
        let access = AccessService::new(
            repository.clone(),
            Arc::new(FakeGrantRepository::default()),
            ScopeCache::new(),
        );
        DirectoryService::new(repository, Arc::new(FakeRoleRepository), access)
    }

    fn invite(email: &str, role_id: i32) -> InviteUserInput {
        InviteUserInput {
            email: email.to_owned(),
            full_name: "Invitee".to_owned(),
            role_id,
            department_id: None,
        }
    }

    #[tokio::test]
    async fn manager_lists_company_users() {
        let company_id = TenantId::new();
        let manager = profile(company_id, RoleName::Manager, 2, 3);
        let member = profile(company_id, RoleName::User, 4, 5);
        let outsider = profile(TenantId::new(), RoleName::User, 4, 5);
        let service = service_with(vec![manager.clone(), member, outsider]);

        let listed = service.list_users(&manager).await;
        assert!(matches!(listed, Ok(users) if users.len() == 2));
    }

    #[tokio::test]
    async fn coordinator_cannot_list_users() {
        let company_id = TenantId::new();
        let coordinator = profile(company_id, RoleName::Coordinator, 3, 4);
        let service = service_with(vec![coordinator.clone()]);

        let listed = service.list_users(&coordinator).await;
        assert!(matches!(listed, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn manager_invites_user_with_lower_role() {
        let company_id = TenantId::new();
        let manager = profile(company_id, RoleName::Manager, 2, 3);
        let service = service_with(vec![manager.clone()]);

        let invited = service
            .invite_user(&manager, invite("new@example.com", 5))
            .await;
        assert!(matches!(invited, Ok(profile) if profile.status == UserStatus::Pending));
    }

    #[tokio::test]
    async fn manager_cannot_invite_a_master() {
        let company_id = TenantId::new();
        let manager = profile(company_id, RoleName::Manager, 2, 3);
        let service = service_with(vec![manager.clone()]);

        // Role id 2 is MASTER (hierarchy level 1).
        let invited = service
            .invite_user(&manager, invite("boss@example.com", 2))
            .await;
        assert!(matches!(invited, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn duplicate_pending_invite_conflicts() {
        let company_id = TenantId::new();
        let master = profile(company_id, RoleName::Master, 1, 2);
        let service = service_with(vec![master.clone()]);

        let first = service
            .invite_user(&master, invite("again@example.com", 5))
            .await;
        assert!(first.is_ok());

        let second = service
            .invite_user(&master, invite("again@example.com", 5))
            .await;
        assert!(matches!(second, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn invalid_invite_email_is_rejected() {
        let company_id = TenantId::new();
        let master = profile(company_id, RoleName::Master, 1, 2);
        let service = service_with(vec![master.clone()]);

        let invited = service.invite_user(&master, invite("no-at-sign", 5)).await;
        assert!(matches!(invited, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn manager_cannot_modify_a_master() {
        let company_id = TenantId::new();
        let manager = profile(company_id, RoleName::Manager, 2, 3);
        let master = profile(company_id, RoleName::Master, 1, 2);
        let service = service_with(vec![manager.clone(), master.clone()]);

        let result = service
            .update_user(
                &manager,
                master.id,
                ProfileUpdate {
                    status: Some(UserStatus::Pending),
                    ..ProfileUpdate::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn master_updates_member_role() {
        let company_id = TenantId::new();
        let master = profile(company_id, RoleName::Master, 1, 2);
        let member = profile(company_id, RoleName::User, 4, 5);
        let service = service_with(vec![master.clone(), member.clone()]);

        let result = service
            .update_user(
                &master,
                member.id,
                ProfileUpdate {
                    role_id: Some(4),
                    ..ProfileUpdate::default()
                },
            )
            .await;
        assert!(
            matches!(result, Ok(updated) if updated.role.map(|role| role.name) == Some(RoleName::Coordinator))
        );
    }

    #[tokio::test]
    async fn users_of_other_companies_are_invisible_to_update() {
        let master = profile(TenantId::new(), RoleName::Master, 1, 2);
        let outsider = profile(TenantId::new(), RoleName::User, 4, 5);
        let service = service_with(vec![master.clone(), outsider.clone()]);

        let result = service
            .update_user(
                &master,
                outsider.id,
                ProfileUpdate {
                    status: Some(UserStatus::Active),
                    ..ProfileUpdate::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}

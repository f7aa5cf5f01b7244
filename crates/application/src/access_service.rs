//! Scope resolution over the grant ledger, with caching.

use std::sync::Arc;

use deskhive_core::{AppError, AppResult};
use deskhive_domain::{
    AccessScope, DepartmentId, RoleName, UserId, UserProfile, resolve_scope,
};

use crate::ports::{GrantRepository, ProfileRepository};
use crate::scope_cache::ScopeCache;

/// Resolves and caches access scopes for profiles.
#[derive(Clone)]
pub struct AccessService {
    profiles: Arc<dyn ProfileRepository>,
    grants: Arc<dyn GrantRepository>,
    cache: ScopeCache,
}

impl AccessService {
    /// Creates a new access service.
    #[must_use]
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        grants: Arc<dyn GrantRepository>,
        cache: ScopeCache,
    ) -> Self {
        Self {
            profiles,
            grants,
            cache,
        }
    }

    /// Resolves the scope for a profile, using the cache when warm.
    ///
    /// Grants are fetched only for department-scope roles; platform and
    /// tenant-wide roles ignore the ledger by definition.
    pub async fn scope_for_profile(&self, profile: &UserProfile) -> AppResult<AccessScope> {
        if let Some(scope) = self.cache.get(profile.id) {
            return Ok(scope);
        }

        let grants = match profile.role.as_ref().map(|role| role.name) {
            Some(RoleName::Manager | RoleName::Coordinator | RoleName::User) => {
                self.grants.list_for_user(profile.id).await?
            }
            _ => Vec::new(),
        };

        let scope = resolve_scope(profile, &grants);
        self.cache.store(profile.id, scope.clone());
        Ok(scope)
    }

    /// Resolves the scope for a user id. Fails with `NotFound` when the
    /// profile does not exist.
    pub async fn scope_for_user(&self, user_id: UserId) -> AppResult<AccessScope> {
        let profile = self
            .profiles
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no profile for user '{user_id}'")))?;

        self.scope_for_profile(&profile).await
    }

    /// Drops the cached scope for a user after a visibility-changing event.
    pub fn invalidate(&self, user_id: UserId) {
        self.cache.invalidate(user_id);
    }
}

/// Requires user-management permission on a scope.
pub fn require_manage_users(scope: &AccessScope) -> AppResult<()> {
    if scope.can_manage_users {
        return Ok(());
    }

    Err(AppError::Forbidden(
        "user management permission required".to_owned(),
    ))
}

/// Requires department-management permission on a scope.
pub fn require_manage_departments(scope: &AccessScope) -> AppResult<()> {
    if scope.can_manage_departments {
        return Ok(());
    }

    Err(AppError::Forbidden(
        "department management permission required".to_owned(),
    ))
}

/// Requires settings-management permission on a scope.
pub fn require_manage_settings(scope: &AccessScope) -> AppResult<()> {
    if scope.can_manage_settings {
        return Ok(());
    }

    Err(AppError::Forbidden(
        "settings management permission required".to_owned(),
    ))
}

/// Requires platform-wide scope.
pub fn require_platform_scope(scope: &AccessScope) -> AppResult<()> {
    if scope.platform_wide {
        return Ok(());
    }

    Err(AppError::Forbidden("platform scope required".to_owned()))
}

/// Requires that a scope covers a department.
pub fn require_department_in_scope(
    scope: &AccessScope,
    department_id: DepartmentId,
) -> AppResult<()> {
    if scope.covers_department(department_id) {
        return Ok(());
    }

    Err(AppError::Forbidden(format!(
        "department '{department_id}' is outside the caller's scope"
    )))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use deskhive_core::TenantId;
    use deskhive_domain::{DepartmentId, Role, RoleName, UserProfile, UserStatus};

    use crate::fakes::{FakeGrantRepository, FakeProfileRepository};
    use crate::ports::{GrantRepository, NewGrant};
    use crate::scope_cache::ScopeCache;

    use super::AccessService;

    fn department_profile(level: i32, name: RoleName) -> UserProfile {
        UserProfile {
            id: deskhive_domain::UserId::new(),
            subject: format!("subject-{level}"),
            company_id: Some(TenantId::new()),
            department_id: Some(DepartmentId::new()),
            role: Some(Role {
                id: level,
                name,
                hierarchy_level: level,
            }),
            full_name: "Test".to_owned(),
            email: "test@example.com".to_owned(),
            status: UserStatus::Active,
        }
    }

    fn service_with(
        profiles: Arc<FakeProfileRepository>,
        grants: Arc<FakeGrantRepository>,
    ) -> AccessService {
        AccessService::new(profiles, grants, ScopeCache::new())
    }

    #[tokio::test]
    async fn resolved_scope_includes_granted_departments() {
        let profile = department_profile(3, RoleName::Coordinator);
        let granted = DepartmentId::new();
        let grants = Arc::new(FakeGrantRepository::default());
        let inserted = grants
            .insert(NewGrant {
                user_id: profile.id,
                target_department_id: granted,
                granted_by_user_id: deskhive_domain::UserId::new(),
            })
            .await;
        assert!(inserted.is_ok());

        let profiles = Arc::new(FakeProfileRepository::with_profiles(vec![profile.clone()]));
        let service = service_with(profiles, grants);

        let scope = service.scope_for_profile(&profile).await;
        assert!(scope.is_ok());
        let scope = match scope {
            Ok(scope) => scope,
            Err(error) => panic!("scope resolution failed: {error}"),
        };
        assert!(scope.covers_department(granted));
        assert_eq!(scope.department_ids.len(), 2);
    }

    #[tokio::test]
    async fn cached_scope_is_reused_until_invalidated() {
        let profile = department_profile(4, RoleName::User);
        let grants = Arc::new(FakeGrantRepository::default());
        let profiles = Arc::new(FakeProfileRepository::with_profiles(vec![profile.clone()]));
        let service = service_with(profiles, grants.clone());

        let first = service.scope_for_profile(&profile).await;
        assert!(first.is_ok());

        // A grant added behind the cache is invisible until invalidation.
        let granted = DepartmentId::new();
        let inserted = grants
            .insert(NewGrant {
                user_id: profile.id,
                target_department_id: granted,
                granted_by_user_id: deskhive_domain::UserId::new(),
            })
            .await;
        assert!(inserted.is_ok());

        let stale = service.scope_for_profile(&profile).await;
        assert!(matches!(stale, Ok(scope) if !scope.covers_department(granted)));

        service.invalidate(profile.id);
        let fresh = service.scope_for_profile(&profile).await;
        assert!(matches!(fresh, Ok(scope) if scope.covers_department(granted)));
    }

    #[tokio::test]
    async fn scope_for_unknown_user_is_not_found() {
        let service = service_with(
            Arc::new(FakeProfileRepository::default()),
            Arc::new(FakeGrantRepository::default()),
        );

        let result = service.scope_for_user(deskhive_domain::UserId::new()).await;
        assert!(matches!(result, Err(deskhive_core::AppError::NotFound(_))));
    }
}

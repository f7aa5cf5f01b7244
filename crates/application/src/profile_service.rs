//! Identity and profile resolution.
//!
//! Login verifies the provider token, loads the tenant profile for the
//! subject, resolves the access scope, and commits the outcome through the
//! session resolution state machine so a re-login always supersedes any
//! still-in-flight attempt.

use std::sync::Arc;

use deskhive_core::{AppError, AppResult};
use deskhive_domain::{AccessScope, UserProfile};

use crate::access_service::AccessService;
use crate::ports::{IdentityProvider, ProfileRepository};
use crate::resolution::{CompletionStatus, ResolvedSession, SessionResolver};

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// This attempt is authoritative for the session.
    Resolved(ResolvedSession),
    /// A newer attempt for the same session superseded this one.
    Superseded,
}

/// Application service for principal/profile resolution.
#[derive(Clone)]
pub struct ProfileService {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileRepository>,
    access: AccessService,
    resolver: SessionResolver,
}

impl ProfileService {
    /// Creates a new profile service.
    #[must_use]
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileRepository>,
        access: AccessService,
        resolver: SessionResolver,
    ) -> Self {
        Self {
            identity,
            profiles,
            access,
            resolver,
        }
    }

    /// Verifies a provider token and resolves the session.
    ///
    /// Verification or store failures propagate as errors and roll the
    /// attempt back; they are never collapsed into an empty scope.
    pub async fn login(&self, session_key: &str, provider_token: &str) -> AppResult<LoginOutcome> {
        let ticket = self.resolver.begin(session_key);

        let resolved = match self.resolve_principal(provider_token).await {
            Ok(resolved) => resolved,
            Err(error) => {
                self.resolver.abandon(&ticket);
                return Err(error);
            }
        };

        match self.resolver.complete(&ticket, resolved.clone()) {
            CompletionStatus::Applied => Ok(LoginOutcome::Resolved(resolved)),
            CompletionStatus::Superseded => Ok(LoginOutcome::Superseded),
        }
    }

    /// Resolves the profile and scope for an already-authenticated subject.
    /// Returns `None` when the principal has no tenant profile yet.
    pub async fn session_for_subject(
        &self,
        subject: &str,
    ) -> AppResult<Option<(UserProfile, AccessScope)>> {
        let Some(profile) = self.profiles.find_by_subject(subject).await? else {
            return Ok(None);
        };

        let scope = self.access.scope_for_profile(&profile).await?;
        Ok(Some((profile, scope)))
    }

    /// Forgets the resolution state for a session key (logout).
    pub fn clear_session(&self, session_key: &str) {
        self.resolver.clear(session_key);
    }

    async fn resolve_principal(&self, provider_token: &str) -> AppResult<ResolvedSession> {
        let claims = self.identity.verify_token(provider_token).await?;

        if let Some(profile) = self.profiles.find_by_subject(claims.subject()).await? {
            let scope = self.access.scope_for_profile(&profile).await?;
            return Ok(ResolvedSession::Provisioned { profile, scope });
        }

        // First login after an invite: link the pending profile by verified
        // email and activate it.
        if let Some(email) = claims.email()
            && let Some(pending) = self.profiles.find_pending_by_email(email).await?
        {
            let profile = self
                .profiles
                .link_subject(pending.id, claims.subject())
                .await?;
            self.access.invalidate(profile.id);
            let scope = self.access.scope_for_profile(&profile).await?;
            return Ok(ResolvedSession::Provisioned { profile, scope });
        }

        Ok(ResolvedSession::Unprovisioned { claims })
    }
}

/// Maps a missing-profile state to the error consumers surface when a
/// provisioned profile is strictly required.
pub fn profile_not_found(subject: &str) -> AppError {
    AppError::NotFound(format!(
        "no tenant profile provisioned for subject '{subject}'"
    ))
}

/// Convenience: requires a provisioned session, mapping `None` to
/// `ProfileNotFound`.
pub fn require_provisioned(
    subject: &str,
    session: Option<(UserProfile, AccessScope)>,
) -> AppResult<(UserProfile, AccessScope)> {
    session.ok_or_else(|| profile_not_found(subject))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use deskhive_core::{AppError, PrincipalClaims, TenantId};
    use deskhive_domain::{DepartmentId, Role, RoleName, UserId, UserProfile, UserStatus};

    use crate::access_service::AccessService;
    use crate::fakes::{FakeGrantRepository, FakeIdentityProvider, FakeProfileRepository};
    use crate::resolution::{ResolvedSession, SessionResolution, SessionResolver};
    use crate::scope_cache::ScopeCache;

    use super::{LoginOutcome, ProfileService};

    fn coordinator(subject: &str, department_id: DepartmentId) -> UserProfile {
        UserProfile {
            id: UserId::new(),
            subject: subject.to_owned(),
            company_id: Some(TenantId::new()),
            department_id: Some(department_id),
            role: Some(Role {
                id: 4,
                name: RoleName::Coordinator,
                hierarchy_level: 3,
            }),
            full_name: "Coordinator".to_owned(),
            email: "coordinator@example.com".to_owned(),
            status: UserStatus::Active,
        }
    }

    fn build_service(
        identity: Arc<FakeIdentityProvider>,
        profiles: Arc<FakeProfileRepository>,
        resolver: SessionResolver,
    ) -> ProfileService {
        let access = AccessService::new(
            profiles.clone(),
            Arc::new(FakeGrantRepository::default()),
            ScopeCache::new(),
        );
        ProfileService::new(identity, profiles, access, resolver)
    }

    #[tokio::test]
    async fn login_resolves_provisioned_profile_with_scope() {
        let department_id = DepartmentId::new();
        let profile = coordinator("subject-1", department_id);
        let identity = Arc::new(FakeIdentityProvider::default());
        identity.register_token(
            "token-1",
            PrincipalClaims::new("subject-1", "Coordinator", None),
        );
        let profiles = Arc::new(FakeProfileRepository::with_profiles(vec![profile]));
        let service = build_service(identity, profiles, SessionResolver::new());

        let outcome = service.login("session-1", "token-1").await;

        match outcome {
            Ok(LoginOutcome::Resolved(ResolvedSession::Provisioned { scope, .. })) => {
                assert!(scope.covers_department(department_id));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn login_without_profile_resolves_unprovisioned() {
        let identity = Arc::new(FakeIdentityProvider::default());
        identity.register_token("token-1", PrincipalClaims::new("ghost", "Ghost", None));
        let service = build_service(
            identity,
            Arc::new(FakeProfileRepository::default()),
            SessionResolver::new(),
        );

        let outcome = service.login("session-1", "token-1").await;

        assert!(matches!(
            outcome,
            Ok(LoginOutcome::Resolved(ResolvedSession::Unprovisioned { .. }))
        ));
    }

    #[tokio::test]
    async fn relogin_supersedes_prior_inflight_attempt() {
        let department_id = DepartmentId::new();
        let identity = Arc::new(FakeIdentityProvider::default());
        identity.register_token("token-a", PrincipalClaims::new("user-a", "A", None));
        identity.register_token("token-b", PrincipalClaims::new("user-b", "B", None));
        let profiles = Arc::new(FakeProfileRepository::with_profiles(vec![
            coordinator("user-a", department_id),
            coordinator("user-b", department_id),
        ]));
        let resolver = SessionResolver::new();
        let service = build_service(identity, profiles, resolver.clone());

        // Model the slow stale fetch: attempt A begins first but its
        // completion lands after attempt B's.
        let stale_ticket = resolver.begin("session-1");
        let outcome_b = service.login("session-1", "token-b").await;
        assert!(matches!(outcome_b, Ok(LoginOutcome::Resolved(_))));

        let stale_outcome = resolver.complete(
            &stale_ticket,
            ResolvedSession::Unprovisioned {
                claims: PrincipalClaims::new("user-a", "A", None),
            },
        );
        assert_eq!(stale_outcome, crate::resolution::CompletionStatus::Superseded);

        match resolver.current("session-1") {
            SessionResolution::Resolved(ResolvedSession::Provisioned { profile, .. }) => {
                assert_eq!(profile.subject, "user-b");
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[tokio::test]
    async fn provider_outage_propagates_and_resets_resolution() {
        let identity = Arc::new(FakeIdentityProvider::default());
        identity.set_unavailable(true);
        let resolver = SessionResolver::new();
        let service = build_service(
            identity,
            Arc::new(FakeProfileRepository::default()),
            resolver.clone(),
        );

        let outcome = service.login("session-1", "token-1").await;

        assert!(matches!(outcome, Err(AppError::Unavailable(_))));
        assert_eq!(resolver.current("session-1"), SessionResolution::Unresolved);
    }

    #[tokio::test]
    async fn invalid_token_is_unauthorized() {
        let identity = Arc::new(FakeIdentityProvider::default());
        let service = build_service(
            identity,
            Arc::new(FakeProfileRepository::default()),
            SessionResolver::new(),
        );

        let outcome = service.login("session-1", "bogus").await;
        assert!(matches!(outcome, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn first_login_links_pending_invite_by_email() {
        let department_id = DepartmentId::new();
        let mut invited = coordinator("", department_id);
        invited.subject = String::new();
        invited.status = UserStatus::Pending;
        invited.email = "invitee@example.com".to_owned();

        let identity = Arc::new(FakeIdentityProvider::default());
        identity.register_token(
            "token-1",
            PrincipalClaims::new(
                "new-subject",
                "Invitee",
                Some("invitee@example.com".to_owned()),
            ),
        );
        let profiles = Arc::new(FakeProfileRepository::with_profiles(vec![invited]));
        let service = build_service(identity, profiles.clone(), SessionResolver::new());

        let outcome = service.login("session-1", "token-1").await;

        match outcome {
            Ok(LoginOutcome::Resolved(ResolvedSession::Provisioned { profile, .. })) => {
                assert_eq!(profile.subject, "new-subject");
                assert_eq!(profile.status, UserStatus::Active);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}

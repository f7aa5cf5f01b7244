//! Session resolution state machine.
//!
//! Each session key moves `Unresolved → Resolving(seq) → Resolved`, with one
//! terminal transition per resolution attempt. Attempts carry a monotonically
//! increasing sequence number; only the completion holding the latest number
//! is applied, so a slow stale fetch can never overwrite a fresher outcome
//! (last-write-wins on re-login).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use deskhive_core::PrincipalClaims;
use deskhive_domain::{AccessScope, UserProfile};

/// Terminal outcome of one resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSession {
    /// Principal has a tenant profile; scope is resolved alongside it.
    Provisioned {
        /// The resolved profile.
        profile: UserProfile,
        /// The scope computed for the profile.
        scope: AccessScope,
    },
    /// Principal authenticated but has no tenant profile yet.
    Unprovisioned {
        /// Verified claims, kept for the setup affordance upstream.
        claims: PrincipalClaims,
    },
}

/// Observable resolution state for one session key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionResolution {
    /// No resolution attempt has started.
    Unresolved,
    /// An attempt with the given sequence number is in flight.
    Resolving(u64),
    /// The latest attempt reached its terminal state.
    Resolved(ResolvedSession),
}

/// Result of applying a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    /// The completion was the latest attempt and is now authoritative.
    Applied,
    /// A newer attempt superseded this one; the outcome was discarded.
    Superseded,
}

/// Handle for one in-flight resolution attempt.
#[derive(Debug)]
pub struct ResolutionTicket {
    key: String,
    seq: u64,
}

#[derive(Default)]
struct ResolutionSlot {
    latest_seq: u64,
    applied_seq: Option<u64>,
    abandoned_seq: Option<u64>,
    state: Option<ResolvedSession>,
}

/// Tracks session resolution per session key.
#[derive(Clone, Default)]
pub struct SessionResolver {
    slots: Arc<Mutex<HashMap<String, ResolutionSlot>>>,
}

impl SessionResolver {
    /// Creates an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a resolution attempt for a session key, superseding any attempt
    /// still in flight for the same key.
    pub fn begin(&self, key: &str) -> ResolutionTicket {
        let mut slots = self.lock();
        let slot = slots.entry(key.to_owned()).or_default();
        slot.latest_seq += 1;

        ResolutionTicket {
            key: key.to_owned(),
            seq: slot.latest_seq,
        }
    }

    /// Applies the outcome of an attempt. Discarded when a newer attempt has
    /// begun, or when this attempt already completed once.
    pub fn complete(&self, ticket: &ResolutionTicket, outcome: ResolvedSession) -> CompletionStatus {
        let mut slots = self.lock();
        let Some(slot) = slots.get_mut(&ticket.key) else {
            return CompletionStatus::Superseded;
        };

        if ticket.seq != slot.latest_seq
            || slot.applied_seq == Some(ticket.seq)
            || slot.abandoned_seq == Some(ticket.seq)
        {
            return CompletionStatus::Superseded;
        }

        slot.applied_seq = Some(ticket.seq);
        slot.state = Some(outcome);
        CompletionStatus::Applied
    }

    /// Abandons a failed attempt. Resets to `Unresolved` only when the
    /// attempt is still the latest; a superseding attempt is left alone.
    /// The sequence counter is preserved so a late completion of the
    /// abandoned attempt can never collide with a future one.
    pub fn abandon(&self, ticket: &ResolutionTicket) {
        let mut slots = self.lock();
        if let Some(slot) = slots.get_mut(&ticket.key)
            && ticket.seq == slot.latest_seq
            && slot.applied_seq != Some(ticket.seq)
        {
            slot.abandoned_seq = Some(ticket.seq);
            slot.state = None;
        }
    }

    /// Returns the current state for a session key.
    #[must_use]
    pub fn current(&self, key: &str) -> SessionResolution {
        let slots = self.lock();
        let Some(slot) = slots.get(key) else {
            return SessionResolution::Unresolved;
        };

        if slot.abandoned_seq == Some(slot.latest_seq) {
            return SessionResolution::Unresolved;
        }

        match (&slot.state, slot.applied_seq) {
            (Some(state), Some(applied)) if applied == slot.latest_seq => {
                SessionResolution::Resolved(state.clone())
            }
            _ if slot.latest_seq > 0 => SessionResolution::Resolving(slot.latest_seq),
            _ => SessionResolution::Unresolved,
        }
    }

    /// Forgets a session key entirely (logout).
    pub fn clear(&self, key: &str) {
        self.lock().remove(key);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, ResolutionSlot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use deskhive_core::PrincipalClaims;

    use super::{CompletionStatus, ResolvedSession, SessionResolution, SessionResolver};

    fn unprovisioned(subject: &str) -> ResolvedSession {
        ResolvedSession::Unprovisioned {
            claims: PrincipalClaims::new(subject, "Test", None),
        }
    }

    #[test]
    fn single_attempt_resolves() {
        let resolver = SessionResolver::new();
        let ticket = resolver.begin("session-1");

        assert_eq!(resolver.current("session-1"), SessionResolution::Resolving(1));
        assert_eq!(
            resolver.complete(&ticket, unprovisioned("alice")),
            CompletionStatus::Applied
        );
        assert!(matches!(
            resolver.current("session-1"),
            SessionResolution::Resolved(_)
        ));
    }

    #[test]
    fn stale_attempt_never_overwrites_newer_outcome() {
        let resolver = SessionResolver::new();
        let stale = resolver.begin("session-1");
        let fresh = resolver.begin("session-1");

        assert_eq!(
            resolver.complete(&fresh, unprovisioned("fresh-user")),
            CompletionStatus::Applied
        );
        // The stale attempt finishes late; its outcome must be discarded.
        assert_eq!(
            resolver.complete(&stale, unprovisioned("stale-user")),
            CompletionStatus::Superseded
        );

        match resolver.current("session-1") {
            SessionResolution::Resolved(ResolvedSession::Unprovisioned { claims }) => {
                assert_eq!(claims.subject(), "fresh-user");
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[test]
    fn stale_completion_before_fresh_one_is_also_discarded() {
        let resolver = SessionResolver::new();
        let stale = resolver.begin("session-1");
        let fresh = resolver.begin("session-1");

        assert_eq!(
            resolver.complete(&stale, unprovisioned("stale-user")),
            CompletionStatus::Superseded
        );
        assert_eq!(resolver.current("session-1"), SessionResolution::Resolving(2));
        assert_eq!(
            resolver.complete(&fresh, unprovisioned("fresh-user")),
            CompletionStatus::Applied
        );
    }

    #[test]
    fn attempt_admits_exactly_one_terminal_transition() {
        let resolver = SessionResolver::new();
        let ticket = resolver.begin("session-1");

        assert_eq!(
            resolver.complete(&ticket, unprovisioned("first")),
            CompletionStatus::Applied
        );
        assert_eq!(
            resolver.complete(&ticket, unprovisioned("second")),
            CompletionStatus::Superseded
        );
    }

    #[test]
    fn abandoned_attempt_resets_to_unresolved() {
        let resolver = SessionResolver::new();
        let ticket = resolver.begin("session-1");

        resolver.abandon(&ticket);
        assert_eq!(resolver.current("session-1"), SessionResolution::Unresolved);
    }

    #[test]
    fn abandon_of_superseded_attempt_leaves_newer_attempt_running() {
        let resolver = SessionResolver::new();
        let stale = resolver.begin("session-1");
        let _fresh = resolver.begin("session-1");

        resolver.abandon(&stale);
        assert_eq!(resolver.current("session-1"), SessionResolution::Resolving(2));
    }

    #[test]
    fn late_completion_of_abandoned_attempt_is_discarded() {
        let resolver = SessionResolver::new();
        let ticket = resolver.begin("session-1");

        resolver.abandon(&ticket);
        assert_eq!(
            resolver.complete(&ticket, unprovisioned("ghost")),
            CompletionStatus::Superseded
        );
        assert_eq!(resolver.current("session-1"), SessionResolution::Unresolved);
    }

    #[test]
    fn keys_resolve_independently() {
        let resolver = SessionResolver::new();
        let first = resolver.begin("session-1");
        let _second = resolver.begin("session-2");

        assert_eq!(
            resolver.complete(&first, unprovisioned("alice")),
            CompletionStatus::Applied
        );
        assert_eq!(resolver.current("session-2"), SessionResolution::Resolving(1));
    }
}

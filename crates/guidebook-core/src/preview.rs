//! Role preview state
//!
//! A session-scoped container holding an optional role override. The
//! override only changes what is *rendered*; authorization never reads it
//! (see [`crate::guard`]).
//!
//! # State machine
//!
//! ```text
//!             enter(r)                 enter(r2)
//! Inactive ───────────▶ Previewing(r) ───────────▶ Previewing(r2)
//!    ▲                       │
//!    └───────── exit ────────┘
//! ```

use crate::error::RoleError;
use crate::role::Role;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Current preview state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "PreviewSnapshot", try_from = "PreviewSnapshot")]
pub enum PreviewState {
    /// No override active
    #[default]
    Inactive,
    /// Rendering as the given role
    Previewing(Role),
}

impl PreviewState {
    /// True iff an override is active
    #[inline]
    #[must_use]
    pub fn is_preview_mode(self) -> bool {
        matches!(self, Self::Previewing(_))
    }

    /// The override role, if any
    #[inline]
    #[must_use]
    pub fn effective_role(self) -> Option<Role> {
        match self {
            Self::Inactive => None,
            Self::Previewing(role) => Some(role),
        }
    }

    /// Override if previewing, else `real`
    #[inline]
    #[must_use]
    pub fn resolve(self, real: Role) -> Role {
        self.effective_role().unwrap_or(real)
    }
}

/// Wire shape of [`PreviewState`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreviewSnapshot {
    is_preview_mode: bool,
    effective_role: Option<Role>,
}

impl From<PreviewState> for PreviewSnapshot {
    fn from(state: PreviewState) -> Self {
        Self {
            is_preview_mode: state.is_preview_mode(),
            effective_role: state.effective_role(),
        }
    }
}

impl TryFrom<PreviewSnapshot> for PreviewState {
    type Error = String;

    fn try_from(snapshot: PreviewSnapshot) -> Result<Self, Self::Error> {
        match (snapshot.is_preview_mode, snapshot.effective_role) {
            (false, None) => Ok(Self::Inactive),
            (true, Some(role)) => Ok(Self::Previewing(role)),
            (flag, role) => Err(format!(
                "inconsistent preview state: isPreviewMode={flag}, effectiveRole={role:?}"
            )),
        }
    }
}

/// Handle returned by [`RolePreviewStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(PreviewState) + Send + Sync>;

#[derive(Default)]
struct StoreInner {
    state: RwLock<PreviewState>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_id: AtomicU64,
}

/// Shared preview state for one client session
///
/// Clones share state: a transition made through one handle is visible to
/// every other handle as soon as the call returns.
#[derive(Clone, Default)]
pub struct RolePreviewStore {
    inner: Arc<StoreInner>,
}

impl RolePreviewStore {
    /// Create store in the `Inactive` state
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start previewing as `role`, replacing any active override
    pub fn enter_preview_mode(&self, role: Role) {
        tracing::debug!(role = %role, "entering role preview");
        self.transition(PreviewState::Previewing(role));
    }

    /// Parse and enter preview; unknown roles leave state unchanged
    ///
    /// # Errors
    /// `RoleError::InvalidRole` if `role` is not a known role identifier
    pub fn enter_preview_mode_str(&self, role: &str) -> Result<(), RoleError> {
        let parsed = role.parse::<Role>().map_err(|e| {
            tracing::warn!(role, "rejected preview for unknown role");
            e
        })?;
        self.enter_preview_mode(parsed);
        Ok(())
    }

    /// Leave preview mode; no-op when inactive
    pub fn exit_preview_mode(&self) {
        tracing::debug!("exiting role preview");
        self.transition(PreviewState::Inactive);
    }

    /// Return to the initial state at session end
    pub fn reset(&self) {
        self.transition(PreviewState::Inactive);
    }

    /// Role to render as: the override if previewing, else `real_role`
    #[inline]
    #[must_use]
    pub fn effective_role(&self, real_role: Role) -> Role {
        self.state().resolve(real_role)
    }

    /// True iff an override is active
    #[inline]
    #[must_use]
    pub fn is_preview_mode(&self) -> bool {
        self.state().is_preview_mode()
    }

    /// Snapshot of the current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> PreviewState {
        *self.inner.state.read()
    }

    /// Register a listener called with the new state after each change
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(PreviewState) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener; returns whether it was registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.inner.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    fn transition(&self, next: PreviewState) {
        let changed = {
            let mut state = self.inner.state.write();
            if *state == next {
                false
            } else {
                *state = next;
                true
            }
        };
        if !changed {
            return;
        }

        // Listeners run without any lock held so they may read the store.
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .lock()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener(next);
        }
    }
}

impl fmt::Debug for RolePreviewStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RolePreviewStore")
            .field("state", &self.state())
            .field("listeners", &self.inner.listeners.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn starts_inactive() {
        let store = RolePreviewStore::new();
        assert!(!store.is_preview_mode());
        assert_eq!(store.state(), PreviewState::Inactive);
        assert_eq!(store.effective_role(Role::Dispatcher), Role::Dispatcher);
    }

    #[test]
    fn last_enter_wins() {
        let store = RolePreviewStore::new();
        store.enter_preview_mode(Role::BranchStaff);
        store.enter_preview_mode(Role::CentralKitchen);
        assert_eq!(store.effective_role(Role::Admin), Role::CentralKitchen);
    }

    #[test]
    fn exit_when_inactive_is_noop() {
        let store = RolePreviewStore::new();
        store.exit_preview_mode();
        assert!(!store.is_preview_mode());
    }

    #[test]
    fn invalid_role_string_is_rejected() {
        let store = RolePreviewStore::new();
        store.enter_preview_mode(Role::Dispatcher);
        let err = store.enter_preview_mode_str("superuser").unwrap_err();
        assert_eq!(err, RoleError::InvalidRole("superuser".to_string()));
        assert_eq!(store.state(), PreviewState::Previewing(Role::Dispatcher));

        store.enter_preview_mode_str("branch_staff").unwrap();
        assert_eq!(store.state(), PreviewState::Previewing(Role::BranchStaff));
    }

    #[test]
    fn clones_share_state() {
        let store = RolePreviewStore::new();
        let banner_handle = store.clone();
        store.enter_preview_mode(Role::BranchManager);
        assert!(banner_handle.is_preview_mode());
        banner_handle.exit_preview_mode();
        assert!(!store.is_preview_mode());
    }

    #[test]
    fn listeners_fire_on_change_only() {
        let store = RolePreviewStore::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let id = store.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        store.exit_preview_mode();
        store.enter_preview_mode(Role::BranchStaff);
        store.enter_preview_mode(Role::BranchStaff);
        store.enter_preview_mode(Role::Dispatcher);
        store.exit_preview_mode();
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.enter_preview_mode(Role::Admin);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn listener_can_read_store() {
        let store = RolePreviewStore::new();
        let observed = Arc::new(Mutex::new(None));
        let (handle, sink) = (store.clone(), Arc::clone(&observed));
        store.subscribe(move |state| {
            assert_eq!(handle.state(), state);
            *sink.lock() = Some(state);
        });
        store.enter_preview_mode(Role::OperationsLead);
        assert_eq!(
            *observed.lock(),
            Some(PreviewState::Previewing(Role::OperationsLead))
        );
    }

    #[test]
    fn serializes_as_flag_and_role() {
        let json = serde_json::to_value(PreviewState::Previewing(Role::BranchStaff)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "isPreviewMode": true, "effectiveRole": "branch_staff" })
        );
        let json = serde_json::to_value(PreviewState::Inactive).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "isPreviewMode": false, "effectiveRole": null })
        );
    }

    #[test]
    fn rejects_inconsistent_snapshot() {
        let bad = serde_json::json!({ "isPreviewMode": true, "effectiveRole": null });
        assert!(serde_json::from_value::<PreviewState>(bad).is_err());
        let bad = serde_json::json!({ "isPreviewMode": false, "effectiveRole": "admin" });
        assert!(serde_json::from_value::<PreviewState>(bad).is_err());
    }
}

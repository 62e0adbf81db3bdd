//! Admin protection
//!
//! Authorization is decided from the *real* authenticated role only. The
//! preview override is accepted as an argument so that callers can pass
//! whatever they hold, but it never influences the outcome: preview mode
//! changes what is rendered, not what is permitted.

use crate::config::GuidebookConfig;
use crate::error::AccessDenied;
use crate::preview::PreviewState;
use crate::role::{Capability, Role};
use serde::{Deserialize, Serialize};

/// Why access was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// No authenticated session
    Unauthenticated,
    /// Real role lacks the capability
    InsufficientRole,
}

/// Outcome of [`can_access`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum AccessDecision {
    /// Show the protected content
    Granted,
    /// Refuse, with reason
    Denied(DenialReason),
}

impl AccessDecision {
    /// True iff granted
    #[inline]
    #[must_use]
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }

    /// Denial reason, if denied
    #[inline]
    #[must_use]
    pub fn reason(self) -> Option<DenialReason> {
        match self {
            Self::Granted => None,
            Self::Denied(reason) => Some(reason),
        }
    }
}

/// Decide whether protected content requiring `required` may be shown
///
/// `preview` is deliberately ignored for the decision; it is only recorded
/// in the trace event.
#[must_use]
pub fn can_access(
    real_role: Option<Role>,
    preview: &PreviewState,
    required: Capability,
) -> AccessDecision {
    let decision = match real_role {
        None => AccessDecision::Denied(DenialReason::Unauthenticated),
        Some(role) if role.has(required) => AccessDecision::Granted,
        Some(_) => AccessDecision::Denied(DenialReason::InsufficientRole),
    };
    tracing::debug!(
        real_role = ?real_role,
        previewing = ?preview.effective_role(),
        required = %required,
        ?decision,
        "access decision"
    );
    decision
}

/// [`can_access`] as a `Result`, carrying the role and capability on denial
pub fn authorize(
    real_role: Option<Role>,
    preview: &PreviewState,
    required: Capability,
) -> Result<Role, AccessDenied> {
    match (real_role, can_access(real_role, preview, required)) {
        (Some(role), AccessDecision::Granted) => Ok(role),
        (Some(role), AccessDecision::Denied(_)) => {
            Err(AccessDenied::InsufficientRole { role, required })
        }
        (None, _) => Err(AccessDenied::Unauthenticated),
    }
}

/// What the guarded route should do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GuardOutcome {
    /// Render the protected content
    Render,
    /// Navigate away
    Redirect {
        /// Target path
        to: String,
        /// Why the user is being sent away
        reason: DenialReason,
    },
}

/// Route guard mapping access decisions to render-or-redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminProtection {
    login_path: String,
    fallback_path: String,
}

impl AdminProtection {
    /// Guard with explicit redirect targets
    #[must_use]
    pub fn new(login_path: impl Into<String>, fallback_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
            fallback_path: fallback_path.into(),
        }
    }

    /// Guard using the configured paths
    #[must_use]
    pub fn from_config(config: &GuidebookConfig) -> Self {
        Self::new(config.login_path.clone(), config.fallback_path.clone())
    }

    /// Decide for one render
    #[must_use]
    pub fn check(
        &self,
        real_role: Option<Role>,
        preview: &PreviewState,
        required: Capability,
    ) -> GuardOutcome {
        match can_access(real_role, preview, required) {
            AccessDecision::Granted => GuardOutcome::Render,
            AccessDecision::Denied(reason) => {
                tracing::warn!(real_role = ?real_role, required = %required, ?reason, "access denied");
                GuardOutcome::Redirect {
                    to: self.redirect_for(reason).to_string(),
                    reason,
                }
            }
        }
    }

    /// Redirect target for a denial reason
    #[inline]
    #[must_use]
    pub fn redirect_for(&self, reason: DenialReason) -> &str {
        match reason {
            DenialReason::Unauthenticated => &self.login_path,
            DenialReason::InsufficientRole => &self.fallback_path,
        }
    }
}

impl Default for AdminProtection {
    fn default() -> Self {
        Self::from_config(&GuidebookConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_is_denied() {
        assert_eq!(
            can_access(None, &PreviewState::Inactive, Capability::ViewDashboard),
            AccessDecision::Denied(DenialReason::Unauthenticated)
        );
    }

    #[test]
    fn unauthenticated_preview_does_not_grant() {
        let preview = PreviewState::Previewing(Role::Admin);
        assert_eq!(
            can_access(None, &preview, Capability::ViewDashboard).reason(),
            Some(DenialReason::Unauthenticated)
        );
    }

    #[test]
    fn admin_is_granted_everything() {
        for cap in Capability::ALL {
            assert!(can_access(Some(Role::Admin), &PreviewState::Inactive, cap).is_granted());
        }
    }

    #[test]
    fn admin_previewing_staff_keeps_admin_access() {
        let preview = PreviewState::Previewing(Role::BranchStaff);
        assert!(can_access(Some(Role::Admin), &preview, Capability::AdminPanel).is_granted());
    }

    #[test]
    fn authorize_carries_details() {
        assert_eq!(
            authorize(Some(Role::BranchStaff), &PreviewState::Inactive, Capability::PrintReports),
            Err(AccessDenied::InsufficientRole {
                role: Role::BranchStaff,
                required: Capability::PrintReports,
            })
        );
        assert_eq!(
            authorize(None, &PreviewState::Inactive, Capability::ViewDashboard),
            Err(AccessDenied::Unauthenticated)
        );
        assert_eq!(
            authorize(Some(Role::BranchManager), &PreviewState::Inactive, Capability::PrintReports),
            Ok(Role::BranchManager)
        );
    }

    #[test]
    fn guard_redirects() {
        let guard = AdminProtection::new("/signin", "/dashboard");
        assert_eq!(
            guard.check(None, &PreviewState::Inactive, Capability::AdminPanel),
            GuardOutcome::Redirect {
                to: "/signin".to_string(),
                reason: DenialReason::Unauthenticated,
            }
        );
        assert_eq!(
            guard.check(Some(Role::Dispatcher), &PreviewState::Inactive, Capability::AdminPanel),
            GuardOutcome::Redirect {
                to: "/dashboard".to_string(),
                reason: DenialReason::InsufficientRole,
            }
        );
        assert_eq!(
            guard.check(Some(Role::Admin), &PreviewState::Inactive, Capability::AdminPanel),
            GuardOutcome::Render
        );
    }

    #[test]
    fn decision_serializes_with_reason() {
        let json = serde_json::to_value(AccessDecision::Denied(DenialReason::InsufficientRole))
            .unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "decision": "denied", "reason": "insufficient_role" })
        );
    }
}

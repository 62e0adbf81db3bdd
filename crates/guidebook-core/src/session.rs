//! Session provider seam
//!
//! The authentication provider lives outside this crate. It is consumed
//! through [`SessionProvider`] and never mutated here.

use crate::role::Role;
use std::fmt;

/// Source of the real authenticated role
pub trait SessionProvider: Send + Sync + fmt::Debug {
    /// Real role of the signed-in user, `None` when signed out
    fn real_role(&self) -> Option<Role>;

    /// Display name of the signed-in user
    fn user_name(&self) -> Option<String> {
        None
    }

    /// Whether a user is signed in
    fn is_authenticated(&self) -> bool {
        self.real_role().is_some()
    }
}

/// Session with a fixed user, for tools and tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticSession {
    role: Option<Role>,
    user_name: Option<String>,
}

impl StaticSession {
    /// Signed-in session
    #[must_use]
    pub fn authenticated(user_name: impl Into<String>, role: Role) -> Self {
        Self {
            role: Some(role),
            user_name: Some(user_name.into()),
        }
    }

    /// Signed-out session
    #[inline]
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Session from an optional role, with no user name
    #[inline]
    #[must_use]
    pub fn from_role(role: Option<Role>) -> Self {
        Self {
            role,
            user_name: None,
        }
    }
}

impl SessionProvider for StaticSession {
    fn real_role(&self) -> Option<Role> {
        self.role
    }

    fn user_name(&self) -> Option<String> {
        self.user_name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_is_not_authenticated() {
        let session = StaticSession::anonymous();
        assert!(!session.is_authenticated());
        assert_eq!(session.user_name(), None);
    }

    #[test]
    fn authenticated_reports_role() {
        let session = StaticSession::authenticated("Layla", Role::BranchManager);
        assert!(session.is_authenticated());
        assert_eq!(session.real_role(), Some(Role::BranchManager));
        assert_eq!(session.user_name().as_deref(), Some("Layla"));
    }
}

//! Preview banner view model

use crate::preview::RolePreviewStore;
use crate::role::Role;
use serde::Serialize;

/// Label of the banner's only action
pub const EXIT_ACTION_LABEL: &str = "Exit preview";

/// What the banner shows while a preview is active
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BannerView {
    /// Role being previewed
    pub role: Role,
    /// Display label of that role
    pub role_label: &'static str,
    /// Banner text
    pub message: String,
    /// Label of the exit affordance
    pub exit_label: &'static str,
}

/// Banner bound to a preview store
#[derive(Debug, Clone)]
pub struct RolePreviewBanner {
    store: RolePreviewStore,
}

impl RolePreviewBanner {
    /// Bind to a store
    #[inline]
    #[must_use]
    pub fn new(store: RolePreviewStore) -> Self {
        Self { store }
    }

    /// Banner content, or `None` when no preview is active
    #[must_use]
    pub fn view(&self) -> Option<BannerView> {
        let role = self.store.state().effective_role()?;
        Some(BannerView {
            role,
            role_label: role.display_name(),
            message: format!("Previewing as {}", role.display_name()),
            exit_label: EXIT_ACTION_LABEL,
        })
    }

    /// The exit affordance
    pub fn exit(&self) {
        self.store.exit_preview_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_when_inactive() {
        let banner = RolePreviewBanner::new(RolePreviewStore::new());
        assert_eq!(banner.view(), None);
    }

    #[test]
    fn shows_display_label() {
        let store = RolePreviewStore::new();
        let banner = RolePreviewBanner::new(store.clone());
        store.enter_preview_mode(Role::CentralKitchen);

        let view = banner.view().unwrap();
        assert_eq!(view.role, Role::CentralKitchen);
        assert_eq!(view.role_label, "Central Kitchen");
        assert_eq!(view.message, "Previewing as Central Kitchen");
    }

    #[test]
    fn exit_clears_store() {
        let store = RolePreviewStore::new();
        let banner = RolePreviewBanner::new(store.clone());
        store.enter_preview_mode(Role::BranchStaff);
        banner.exit();
        assert!(!store.is_preview_mode());
        assert_eq!(banner.view(), None);
    }
}

//! Layout composition
//!
//! [`Providers`] assembles the per-session context: the session provider, a
//! fresh preview store, the date service and the guard. [`AdminLayout`]
//! renders protected pages from that context.

use crate::banner::{BannerView, RolePreviewBanner};
use crate::config::GuidebookConfig;
use crate::date_key::{DateKeyService, SystemClock};
use crate::error::{AccessDenied, ConfigError};
use crate::guard::{authorize, can_access, AccessDecision, AdminProtection, DenialReason, GuardOutcome};
use crate::preview::RolePreviewStore;
use crate::role::{Capability, Role};
use crate::session::SessionProvider;
use serde::Serialize;
use std::sync::Arc;

/// Builds one [`AppContext`] per client session
#[derive(Debug, Clone)]
pub struct Providers {
    config: GuidebookConfig,
    dates: DateKeyService,
}

impl Providers {
    /// Providers using the configured clock and patterns
    ///
    /// # Errors
    /// `ConfigError::Invalid` when the configuration fails validation
    pub fn new(config: GuidebookConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let dates = config.date_service()?;
        Ok(Self { config, dates })
    }

    /// Providers with an explicit date service
    #[must_use]
    pub fn with_dates(config: GuidebookConfig, dates: DateKeyService) -> Self {
        Self { config, dates }
    }

    /// Start a session context; preview state always starts inactive
    pub fn mount(&self, session: impl SessionProvider + 'static) -> AppContext {
        tracing::info!(real_role = ?session.real_role(), "session started");
        AppContext {
            session: Arc::new(session),
            preview: RolePreviewStore::new(),
            dates: self.dates.clone(),
            guard: AdminProtection::from_config(&self.config),
        }
    }
}

impl Default for Providers {
    fn default() -> Self {
        let config = GuidebookConfig::default();
        let dates = config.date_service_with(SystemClock);
        Self::with_dates(config, dates)
    }
}

/// Everything a page needs for one client session
#[derive(Debug, Clone)]
pub struct AppContext {
    session: Arc<dyn SessionProvider>,
    preview: RolePreviewStore,
    dates: DateKeyService,
    guard: AdminProtection,
}

impl AppContext {
    /// Real authenticated role
    #[inline]
    #[must_use]
    pub fn real_role(&self) -> Option<Role> {
        self.session.real_role()
    }

    /// Role to render as
    #[inline]
    #[must_use]
    pub fn effective_role(&self) -> Option<Role> {
        self.real_role().map(|real| self.preview.effective_role(real))
    }

    /// Shared preview store
    #[inline]
    #[must_use]
    pub fn preview(&self) -> &RolePreviewStore {
        &self.preview
    }

    /// Date service
    #[inline]
    #[must_use]
    pub fn dates(&self) -> &DateKeyService {
        &self.dates
    }

    /// Banner bound to this session's store
    #[must_use]
    pub fn banner(&self) -> RolePreviewBanner {
        RolePreviewBanner::new(self.preview.clone())
    }

    /// Access decision for the real role
    #[must_use]
    pub fn can_access(&self, required: Capability) -> AccessDecision {
        can_access(self.real_role(), &self.preview.state(), required)
    }

    /// Start previewing as `target`
    ///
    /// Only real roles holding [`Capability::PreviewRoles`] may preview.
    ///
    /// # Errors
    /// `AccessDenied` when signed out or lacking the capability; the store
    /// is left untouched.
    pub fn request_preview(&self, target: Role) -> Result<(), AccessDenied> {
        authorize(self.real_role(), &self.preview.state(), Capability::PreviewRoles)?;
        self.preview.enter_preview_mode(target);
        Ok(())
    }

    /// Leave preview mode
    pub fn exit_preview(&self) {
        self.preview.exit_preview_mode();
    }

    /// Discard session-scoped state
    pub fn end_session(&self) {
        tracing::info!("session ended");
        self.preview.reset();
    }

    fn guard_outcome(&self, required: Capability) -> GuardOutcome {
        self.guard
            .check(self.real_role(), &self.preview.state(), required)
    }
}

/// Rendered page frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    /// Signed-in user's display name
    pub user_name: Option<String>,
    /// Role the session is authorized as
    pub real_role: Role,
    /// Role the page renders as
    pub effective_role: Role,
    /// Preview banner, shown only while previewing
    pub banner: Option<BannerView>,
}

/// Result of rendering a layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum LayoutView {
    /// Protected content with its frame
    Page(PageView),
    /// Navigate away instead of rendering
    Redirect {
        /// Target path
        to: String,
        /// Why rendering was refused
        reason: DenialReason,
    },
}

/// Layout wrapping pages that require a capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminLayout {
    required: Capability,
}

impl AdminLayout {
    /// Layout requiring `required`
    #[inline]
    #[must_use]
    pub fn new(required: Capability) -> Self {
        Self { required }
    }

    /// Layout for the admin panel
    #[inline]
    #[must_use]
    pub fn admin() -> Self {
        Self::new(Capability::AdminPanel)
    }

    /// Render for the given session context
    #[must_use]
    pub fn render(&self, ctx: &AppContext) -> LayoutView {
        match (ctx.guard_outcome(self.required), ctx.real_role()) {
            (GuardOutcome::Render, Some(real_role)) => LayoutView::Page(PageView {
                user_name: ctx.session.user_name(),
                real_role,
                effective_role: ctx.preview.effective_role(real_role),
                banner: ctx.banner().view(),
            }),
            (GuardOutcome::Redirect { to, reason }, _) => LayoutView::Redirect { to, reason },
            // Render is only produced for an authenticated role.
            (GuardOutcome::Render, None) => LayoutView::Redirect {
                to: ctx.guard.redirect_for(DenialReason::Unauthenticated).to_string(),
                reason: DenialReason::Unauthenticated,
            },
        }
    }
}

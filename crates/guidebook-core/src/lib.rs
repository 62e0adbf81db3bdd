//! Guidebook Core
//!
//! Session state and access policy behind the Mikana Branch Guidebook:
//! - **Roles**: closed role set with exhaustive labels and capability sets
//! - **Date keys**: day-scoped checklist keys and display formatting
//! - **Role preview**: a per-session override that changes what is rendered
//! - **Admin protection**: access decisions from the real role only
//!
//! # Architecture
//!
//! ```text
//! SessionProvider ──real role──▶ AdminProtection ──▶ Render | Redirect
//!        │                              ▲
//!        └──▶ RolePreviewStore ──effective role──▶ views, RolePreviewBanner
//!
//! DateKeyService ──checklist key──▶ ChecklistStore
//! ```
//!
//! # Example
//!
//! ```rust
//! use guidebook_core::prelude::*;
//!
//! let ctx = Providers::default().mount(StaticSession::authenticated("Noor", Role::Admin));
//! ctx.request_preview(Role::BranchStaff).unwrap();
//!
//! // Rendering follows the preview, authorization does not.
//! assert_eq!(ctx.effective_role(), Some(Role::BranchStaff));
//! assert!(ctx.can_access(Capability::AdminPanel).is_granted());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod banner;
pub mod checklist;
pub mod config;
pub mod date_key;
pub mod error;
pub mod guard;
pub mod layout;
pub mod preview;
pub mod role;
pub mod session;

// Re-exports for convenience
pub use banner::{BannerView, RolePreviewBanner};
pub use checklist::{ChecklistProgress, ChecklistState, ChecklistStore, MemoryChecklistStore};
pub use config::GuidebookConfig;
pub use date_key::{
    Clock, DateInput, DateKeyService, FixedClock, OffsetClock, SystemClock, MAX_OFFSET_MINUTES,
};
pub use error::{
    AccessDenied, ChecklistError, ConfigError, DateError, GuidebookError, GuidebookResult,
    RoleError,
};
pub use guard::{can_access, AccessDecision, AdminProtection, DenialReason, GuardOutcome};
pub use layout::{AdminLayout, AppContext, LayoutView, PageView, Providers};
pub use preview::{PreviewState, RolePreviewStore, SubscriptionId};
pub use role::{Capability, Role};
pub use session::{SessionProvider, StaticSession};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the guidebook core
    pub use crate::{
        can_access, AccessDecision, AdminLayout, AppContext, Capability, DateKeyService,
        GuidebookConfig, LayoutView, PreviewState, Providers, Role, RolePreviewStore,
        SessionProvider, StaticSession,
    };
}

//! Error types for the Guidebook core
//!
//! Provides error handling for:
//! - Role and capability parsing
//! - Access decisions (unauthenticated / insufficient role)
//! - Date parsing and formatting
//! - Configuration loading
//! - Checklist persistence

use crate::role::{Capability, Role};
use std::path::PathBuf;

/// Errors parsing roles and capabilities from untyped input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoleError {
    /// Value is outside the closed role enumeration
    #[error("invalid role: '{0}'")]
    InvalidRole(String),

    /// Value is outside the closed capability enumeration
    #[error("invalid capability: '{0}'")]
    InvalidCapability(String),
}

/// Reasons an access decision was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    /// No authenticated session
    #[error("not authenticated")]
    Unauthenticated,

    /// Real role lacks the required capability
    #[error("role '{role}' lacks capability '{required}'")]
    InsufficientRole {
        /// The real authenticated role
        role: Role,
        /// The capability that was required
        required: Capability,
    },
}

/// Errors during date parsing and formatting
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    /// Input could not be parsed as a date or instant
    #[error("invalid date input: '{0}'")]
    InvalidInput(String),

    /// Display pattern contains an unsupported specifier
    #[error("invalid date pattern: '{0}'")]
    InvalidPattern(String),
}

/// Errors loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("io error reading {path}: {source}")]
    Io {
        /// File that failed to read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or schema error
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Semantically invalid value
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors reading or writing checklist state
#[derive(Debug, thiserror::Error)]
pub enum ChecklistError {
    /// Stored document is not valid checklist JSON
    #[error("checklist serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backing store failure
    #[error("checklist storage error: {0}")]
    Storage(String),
}

/// Combined guidebook error
#[derive(Debug, thiserror::Error)]
pub enum GuidebookError {
    /// Role or capability parsing failed
    #[error("role error: {0}")]
    Role(#[from] RoleError),

    /// Access was denied
    #[error("access denied: {0}")]
    Access(#[from] AccessDenied),

    /// Date parsing or formatting failed
    #[error("date error: {0}")]
    Date(#[from] DateError),

    /// Configuration could not be loaded
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Checklist persistence failed
    #[error("checklist error: {0}")]
    Checklist(#[from] ChecklistError),
}

impl GuidebookError {
    /// Whether the failure should send the user to the login page
    #[inline]
    #[must_use]
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Access(AccessDenied::Unauthenticated))
    }
}

/// Result type alias for guidebook operations
pub type GuidebookResult<T> = Result<T, GuidebookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_error_display() {
        let err = RoleError::InvalidRole("chef".to_string());
        assert_eq!(err.to_string(), "invalid role: 'chef'");
    }

    #[test]
    fn access_denied_display() {
        let err = AccessDenied::InsufficientRole {
            role: Role::BranchStaff,
            required: Capability::AdminPanel,
        };
        assert_eq!(
            err.to_string(),
            "role 'branch_staff' lacks capability 'admin_panel'"
        );
    }

    #[test]
    fn config_io_error_names_path() {
        let err = ConfigError::io_error(
            "/etc/guidebook.toml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert_eq!(err.to_string(), "io error reading /etc/guidebook.toml: missing");
        let err: GuidebookError = err.into();
        assert!(matches!(err, GuidebookError::Config(ConfigError::Io { .. })));
    }

    #[test]
    fn error_conversions() {
        let err: GuidebookError = AccessDenied::Unauthenticated.into();
        assert!(err.requires_login());

        let err: GuidebookError = DateError::InvalidInput("x".to_string()).into();
        assert!(matches!(err, GuidebookError::Date(_)));
        assert!(!err.requires_login());
    }
}

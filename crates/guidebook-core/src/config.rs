//! Guidebook configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! login_path = "/login"
//! fallback_path = "/"
//! date_pattern = "%B %-d, %Y"
//! time_pattern = "%H:%M"
//! utc_offset_minutes = 240
//! ```

use crate::date_key::{
    validate_pattern, Clock, DateKeyService, OffsetClock, SystemClock, DEFAULT_DATE_PATTERN,
    DEFAULT_TIME_PATTERN, MAX_OFFSET_MINUTES,
};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Guidebook configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuidebookConfig {
    /// Redirect target for unauthenticated users
    pub login_path: String,
    /// Redirect target for authenticated users lacking a capability
    pub fallback_path: String,
    /// Default strftime pattern for dates
    pub date_pattern: String,
    /// Default strftime pattern for times
    pub time_pattern: String,
    /// Pin the local day boundary to this offset; system zone when absent
    pub utc_offset_minutes: Option<i32>,
}

impl GuidebookConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With login path
    #[inline]
    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// With fallback path
    #[inline]
    #[must_use]
    pub fn with_fallback_path(mut self, path: impl Into<String>) -> Self {
        self.fallback_path = path.into();
        self
    }

    /// With date pattern
    #[inline]
    #[must_use]
    pub fn with_date_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.date_pattern = pattern.into();
        self
    }

    /// With fixed UTC offset
    #[inline]
    #[must_use]
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = Some(minutes);
        self
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded guidebook config");
        Ok(config)
    }

    /// Check semantic constraints
    ///
    /// # Errors
    /// `ConfigError::Invalid` naming the first offending field
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("login_path", &self.login_path),
            ("fallback_path", &self.fallback_path),
        ] {
            if !value.starts_with('/') {
                return Err(ConfigError::Invalid(format!(
                    "{field} must be an absolute path, got '{value}'"
                )));
            }
        }
        for (field, value) in [
            ("date_pattern", &self.date_pattern),
            ("time_pattern", &self.time_pattern),
        ] {
            validate_pattern(value)
                .map_err(|_| ConfigError::Invalid(format!("{field} is not a valid pattern: '{value}'")))?;
        }
        if let Some(minutes) = self.utc_offset_minutes {
            offset_clock(minutes)?;
        }
        Ok(())
    }

    /// Build the date service this configuration describes
    ///
    /// # Errors
    /// `ConfigError::Invalid` when `utc_offset_minutes` exceeds
    /// [`MAX_OFFSET_MINUTES`]
    pub fn date_service(&self) -> Result<DateKeyService, ConfigError> {
        Ok(match self.utc_offset_minutes {
            Some(minutes) => self.date_service_with(offset_clock(minutes)?),
            None => self.date_service_with(SystemClock),
        })
    }

    /// Build a date service over an explicit clock, keeping configured patterns
    #[must_use]
    pub fn date_service_with(&self, clock: impl Clock + 'static) -> DateKeyService {
        DateKeyService::with_clock(clock)
            .with_date_pattern(self.date_pattern.clone())
            .with_time_pattern(self.time_pattern.clone())
    }
}

fn offset_clock(minutes: i32) -> Result<OffsetClock, ConfigError> {
    OffsetClock::from_minutes(minutes).ok_or_else(|| {
        ConfigError::Invalid(format!(
            "utc_offset_minutes out of range (max {MAX_OFFSET_MINUTES}): {minutes}"
        ))
    })
}

impl Default for GuidebookConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            fallback_path: "/".to_string(),
            date_pattern: DEFAULT_DATE_PATTERN.to_string(),
            time_pattern: DEFAULT_TIME_PATTERN.to_string(),
            utc_offset_minutes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = GuidebookConfig::from_toml_str("").unwrap();
        assert_eq!(config, GuidebookConfig::default());
    }

    #[test]
    fn partial_toml_overrides() {
        let config = GuidebookConfig::from_toml_str(
            "login_path = \"/auth/signin\"\nutc_offset_minutes = 240\n",
        )
        .unwrap();
        assert_eq!(config.login_path, "/auth/signin");
        assert_eq!(config.fallback_path, "/");
        assert_eq!(config.utc_offset_minutes, Some(240));
    }

    #[test]
    fn unknown_field_is_parse_error() {
        let err = GuidebookConfig::from_toml_str("colour = \"blue\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn relative_path_is_invalid() {
        let err = GuidebookConfig::new()
            .with_login_path("login")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("login_path"));
    }

    #[test]
    fn offset_out_of_range_is_invalid() {
        let config = GuidebookConfig::new().with_utc_offset_minutes(19 * 60);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn offset_near_a_day_is_invalid() {
        let config = GuidebookConfig::new().with_utc_offset_minutes(23 * 60);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        let config = GuidebookConfig::new().with_utc_offset_minutes(-MAX_OFFSET_MINUTES);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn date_service_rejects_out_of_range_offset() {
        let config = GuidebookConfig::new().with_utc_offset_minutes(25 * 60);
        assert!(matches!(config.date_service(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn date_service_uses_offset_clock() {
        let config = GuidebookConfig::new().with_utc_offset_minutes(240);
        let dates = config.date_service().unwrap();
        assert!(format!("{:?}", dates.clock()).contains("OffsetClock"));
    }

    #[test]
    fn bad_pattern_is_invalid() {
        let config = GuidebookConfig::new().with_date_pattern("%Q");
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}

//! Date keys and display formatting
//!
//! Day-scoped keys are derived from a [`Clock`] so that every call within the
//! same local calendar day yields the same key. The clock is injected; tests
//! pin it with [`FixedClock`].

use crate::error::DateError;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, Utc};
use std::fmt::{self, Write as _};
use std::sync::Arc;

/// Format of day keys (`YYYY-MM-DD`)
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Default display pattern, e.g. `March 1, 2024`
pub const DEFAULT_DATE_PATTERN: &str = "%B %-d, %Y";

/// Default time pattern, 24-hour `HH:MM`
pub const DEFAULT_TIME_PATTERN: &str = "%H:%M";

/// Prefix of checklist storage keys
pub const CHECKLIST_KEY_PREFIX: &str = "checklist";

/// Largest accepted UTC offset, in minutes
pub const MAX_OFFSET_MINUTES: i32 = 18 * 60;

/// Source of local wall-clock time
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current local date and time
    fn now(&self) -> NaiveDateTime;

    /// Convert an absolute instant to this clock's local wall time
    fn to_local(&self, instant: DateTime<Utc>) -> NaiveDateTime;

    /// Current local calendar day
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Reads the operating system clock and time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn to_local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&Local).naive_local()
    }
}

/// System time viewed through a fixed UTC offset
#[derive(Debug, Clone, Copy)]
pub struct OffsetClock {
    offset: FixedOffset,
}

impl OffsetClock {
    /// Create clock at `minutes` east of UTC; `None` beyond [`MAX_OFFSET_MINUTES`]
    #[must_use]
    pub fn from_minutes(minutes: i32) -> Option<Self> {
        if minutes.unsigned_abs() > MAX_OFFSET_MINUTES.unsigned_abs() {
            return None;
        }
        FixedOffset::east_opt(minutes * 60).map(|offset| Self { offset })
    }
}

impl Clock for OffsetClock {
    fn now(&self) -> NaiveDateTime {
        self.to_local(Utc::now())
    }

    fn to_local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.offset).naive_local()
    }
}

/// Clock frozen at one local instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: NaiveDateTime,
    offset: FixedOffset,
}

impl FixedClock {
    /// Freeze at `now`, interpreting instants in UTC
    #[must_use]
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now,
            offset: Utc.fix(),
        }
    }

    /// Freeze at midnight of `date`
    #[must_use]
    pub fn at_date(date: NaiveDate) -> Self {
        Self::new(date.and_time(chrono::NaiveTime::MIN))
    }

    /// Interpret absolute instants with this offset
    #[must_use]
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }

    fn to_local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.offset).naive_local()
    }
}

/// Value accepted by the formatting functions
#[derive(Debug, Clone, Copy)]
pub enum DateInput<'a> {
    /// Absolute instant, shown in the clock's local time
    Instant(DateTime<Utc>),
    /// Local wall-clock time
    Local(NaiveDateTime),
    /// Calendar day, treated as local midnight
    Date(NaiveDate),
    /// Text to parse
    Text(&'a str),
}

impl From<DateTime<Utc>> for DateInput<'_> {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Instant(value)
    }
}

impl From<DateTime<FixedOffset>> for DateInput<'_> {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::Instant(value.with_timezone(&Utc))
    }
}

impl From<NaiveDateTime> for DateInput<'_> {
    fn from(value: NaiveDateTime) -> Self {
        Self::Local(value)
    }
}

impl From<NaiveDate> for DateInput<'_> {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

/// Derives day keys, checklist keys and display strings from a clock
#[derive(Debug, Clone)]
pub struct DateKeyService {
    clock: Arc<dyn Clock>,
    date_pattern: String,
    time_pattern: String,
}

impl DateKeyService {
    /// Service over the system clock with default patterns
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Service over a specific clock
    #[must_use]
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Arc::new(clock),
            date_pattern: DEFAULT_DATE_PATTERN.to_string(),
            time_pattern: DEFAULT_TIME_PATTERN.to_string(),
        }
    }

    /// Override the default date display pattern
    #[must_use]
    pub fn with_date_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.date_pattern = pattern.into();
        self
    }

    /// Override the default time display pattern
    #[must_use]
    pub fn with_time_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.time_pattern = pattern.into();
        self
    }

    /// Underlying clock
    #[inline]
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Current local calendar day as `YYYY-MM-DD`
    #[must_use]
    pub fn daily_key(&self) -> String {
        self.clock.today().format(DAY_KEY_FORMAT).to_string()
    }

    /// Storage key for one branch, role and day
    ///
    /// Produces `checklist_{branch_slug}_{role_id}_{date}`, where `date`
    /// defaults to [`daily_key`](Self::daily_key). Identifiers are not
    /// escaped: callers must keep `_` out of them where it would make two
    /// keys collide.
    #[must_use]
    pub fn checklist_storage_key(
        &self,
        branch_slug: &str,
        role_id: &str,
        date: Option<&str>,
    ) -> String {
        let date = match date {
            Some(d) => d.to_string(),
            None => self.daily_key(),
        };
        format!("{CHECKLIST_KEY_PREFIX}_{branch_slug}_{role_id}_{date}")
    }

    /// Like [`checklist_storage_key`](Self::checklist_storage_key) but
    /// rejects empty identifiers and dates that are not `YYYY-MM-DD`
    pub fn try_checklist_storage_key(
        &self,
        branch_slug: &str,
        role_id: &str,
        date: Option<&str>,
    ) -> Result<String, DateError> {
        if branch_slug.is_empty() {
            return Err(DateError::InvalidInput("empty branch slug".to_string()));
        }
        if role_id.is_empty() {
            return Err(DateError::InvalidInput("empty role id".to_string()));
        }
        if let Some(d) = date {
            // chrono accepts unpadded fields; keys must be canonical.
            let canonical = NaiveDate::parse_from_str(d, DAY_KEY_FORMAT)
                .map(|parsed| parsed.format(DAY_KEY_FORMAT).to_string() == d)
                .unwrap_or(false);
            if !canonical {
                return Err(DateError::InvalidInput(d.to_string()));
            }
        }
        Ok(self.checklist_storage_key(branch_slug, role_id, date))
    }

    /// True iff `date_string` equals today's day key
    #[inline]
    #[must_use]
    pub fn is_today(&self, date_string: &str) -> bool {
        date_string == self.daily_key()
    }

    /// Format a date for display
    ///
    /// `pattern` uses strftime specifiers and defaults to a long date such
    /// as `March 1, 2024`.
    ///
    /// # Errors
    /// - `DateError::InvalidInput` if text input cannot be parsed
    /// - `DateError::InvalidPattern` if the pattern cannot be rendered
    pub fn format_date<'a>(
        &self,
        input: impl Into<DateInput<'a>>,
        pattern: Option<&str>,
    ) -> Result<String, DateError> {
        let local = self.resolve(input.into())?;
        render(local, pattern.unwrap_or(&self.date_pattern))
    }

    /// Format the time of day, 24-hour `HH:MM` by default
    pub fn format_time<'a>(&self, input: impl Into<DateInput<'a>>) -> Result<String, DateError> {
        let local = self.resolve(input.into())?;
        render(local, &self.time_pattern)
    }

    fn resolve(&self, input: DateInput<'_>) -> Result<NaiveDateTime, DateError> {
        match input {
            DateInput::Instant(instant) => Ok(self.clock.to_local(instant)),
            DateInput::Local(local) => Ok(local),
            DateInput::Date(date) => Ok(date.and_time(chrono::NaiveTime::MIN)),
            DateInput::Text(text) => self.parse_text(text),
        }
    }

    fn parse_text(&self, text: &str) -> Result<NaiveDateTime, DateError> {
        let trimmed = text.trim();
        if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(self.clock.to_local(instant.with_timezone(&Utc)));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
            if let Ok(local) = NaiveDateTime::parse_from_str(trimmed, fmt) {
                return Ok(local);
            }
        }
        NaiveDate::parse_from_str(trimmed, DAY_KEY_FORMAT)
            .map(|d| d.and_time(chrono::NaiveTime::MIN))
            .map_err(|_| {
                tracing::debug!(input = text, "unparseable date input");
                DateError::InvalidInput(text.to_string())
            })
    }
}

impl Default for DateKeyService {
    fn default() -> Self {
        Self::new()
    }
}

/// Check a strftime pattern without rendering it
pub fn validate_pattern(pattern: &str) -> Result<(), DateError> {
    if pattern.is_empty() || StrftimeItems::new(pattern).any(|i| matches!(i, Item::Error)) {
        return Err(DateError::InvalidPattern(pattern.to_string()));
    }
    Ok(())
}

fn render(local: NaiveDateTime, pattern: &str) -> Result<String, DateError> {
    validate_pattern(pattern)?;
    let mut out = String::new();
    // Offset specifiers have nothing to render on a naive value and fail here.
    write!(out, "{}", local.format_with_items(StrftimeItems::new(pattern)))
        .map_err(|_| DateError::InvalidPattern(pattern.to_string()))?;
    Ok(out)
}

//! Day-scoped checklist state
//!
//! Checklist documents are addressed by the keys from
//! [`DateKeyService::checklist_storage_key`]. Storage itself sits behind
//! [`ChecklistStore`]; [`MemoryChecklistStore`] keeps serialized JSON the way
//! browser local storage would.

use crate::date_key::{DateKeyService, CHECKLIST_KEY_PREFIX};
use crate::error::ChecklistError;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Completion state of one checklist for one day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistState {
    /// Item id to completed flag
    pub items: BTreeMap<String, bool>,
    /// Last modification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ChecklistState {
    /// Empty checklist
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checklist with every item pending
    #[must_use]
    pub fn with_items<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: ids.into_iter().map(|id| (id.into(), false)).collect(),
            updated_at: None,
        }
    }

    /// Mark an item done or pending, adding it if unknown
    pub fn set(&mut self, item: impl Into<String>, done: bool, at: DateTime<Utc>) {
        self.items.insert(item.into(), done);
        self.updated_at = Some(at);
    }

    /// Flip an item; returns the new value
    pub fn toggle(&mut self, item: &str, at: DateTime<Utc>) -> bool {
        let done = !self.is_done(item);
        self.set(item, done, at);
        done
    }

    /// Whether an item is completed
    #[inline]
    #[must_use]
    pub fn is_done(&self, item: &str) -> bool {
        self.items.get(item).copied().unwrap_or(false)
    }

    /// Completion summary
    #[must_use]
    pub fn progress(&self) -> ChecklistProgress {
        let total = self.items.len();
        let completed = self.items.values().filter(|done| **done).count();
        ChecklistProgress::new(completed, total)
    }
}

/// Completed / total counts with a rounded percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChecklistProgress {
    /// Items done
    pub completed: usize,
    /// Items in the checklist
    pub total: usize,
    /// `completed / total`, rounded to the nearest percent
    pub percent: u8,
}

impl ChecklistProgress {
    /// Summarize counts; an empty list is 0%
    #[must_use]
    pub fn new(completed: usize, total: usize) -> Self {
        let percent = if total == 0 {
            0
        } else {
            let rounded = (completed.min(total) * 100 + total / 2) / total;
            u8::try_from(rounded).unwrap_or(100)
        };
        Self {
            completed,
            total,
            percent,
        }
    }

    /// Every item done (and at least one item exists)
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// Persistence for checklist documents
pub trait ChecklistStore: Send + Sync {
    /// Read the document at `key`
    fn load(&self, key: &str) -> Result<Option<ChecklistState>, ChecklistError>;

    /// Write the document at `key`
    fn save(&self, key: &str, state: &ChecklistState) -> Result<(), ChecklistError>;

    /// Delete the document at `key`; returns whether it existed
    fn remove(&self, key: &str) -> Result<bool, ChecklistError>;
}

/// In-process store of serialized checklist documents
#[derive(Debug, Default)]
pub struct MemoryChecklistStore {
    docs: DashMap<String, String>,
}

impl MemoryChecklistStore {
    /// Empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw text at `key`, bypassing serialization
    pub fn insert_raw(&self, key: impl Into<String>, text: impl Into<String>) {
        self.docs.insert(key.into(), text.into());
    }

    /// Stored keys, sorted
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.docs.iter().map(|e| e.key().clone()).collect();
        keys.sort_unstable();
        keys
    }

    /// Number of stored documents
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// True if nothing is stored
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Drop checklist documents dated before `day` (`YYYY-MM-DD`)
    ///
    /// Keys that do not follow the checklist scheme are kept.
    pub fn purge_before(&self, day: &str) -> usize {
        let before = self.docs.len();
        self.docs
            .retain(|key, _| key_date(key).map_or(true, |date| date >= day));
        let purged = before - self.docs.len();
        if purged > 0 {
            tracing::debug!(purged, day, "purged stale checklist documents");
        }
        purged
    }
}

impl ChecklistStore for MemoryChecklistStore {
    fn load(&self, key: &str) -> Result<Option<ChecklistState>, ChecklistError> {
        match self.docs.get(key) {
            Some(text) => Ok(Some(serde_json::from_str(text.value())?)),
            None => Ok(None),
        }
    }

    fn save(&self, key: &str, state: &ChecklistState) -> Result<(), ChecklistError> {
        let text = serde_json::to_string(state)?;
        self.docs.insert(key.to_string(), text);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, ChecklistError> {
        Ok(self.docs.remove(key).is_some())
    }
}

/// Date suffix of a checklist key, if it follows the scheme
fn key_date(key: &str) -> Option<&str> {
    let rest = key.strip_prefix(CHECKLIST_KEY_PREFIX)?.strip_prefix('_')?;
    rest.rsplit_once('_').map(|(_, date)| date)
}

/// Load today's checklist for a branch and role, or a fresh one
///
/// Returns the storage key alongside the state so callers can save back.
pub fn checklist_for_today(
    dates: &DateKeyService,
    store: &dyn ChecklistStore,
    branch_slug: &str,
    role_id: &str,
    template: &[&str],
) -> Result<(String, ChecklistState), ChecklistError> {
    let key = dates.checklist_storage_key(branch_slug, role_id, None);
    let state = match store.load(&key)? {
        Some(state) => state,
        None => ChecklistState::with_items(template.iter().copied()),
    };
    Ok((key, state))
}

//! Ordered roster editor.
//!
//! A [`Roster`] holds the performances of one concert in program order.
//! Every mutation renumbers `order` to `1..=N` before returning and
//! recomputes the cached [`RosterSummary`], so callers never observe gaps,
//! duplicates, or a stale summary.
//!
//! Operations on an id or index that does not exist are silent no-ops and
//! report that through their return value rather than an error.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::performance::{Confidence, FieldUpdate, Performance};
use crate::readiness::{summarize, PublishGate, RosterSummary};
use crate::types::{ConcertId, PerformanceId};

/// Editor policy that differs between review screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Confidence given to rows added by hand.
    pub default_confidence: Confidence,
    pub publish_gate: PublishGate,
}

impl Default for RosterConfig {
    /// Manually added rows have no parser uncertainty to flag, so they
    /// default to `High`.
    fn default() -> Self {
        Self {
            default_confidence: Confidence::High,
            publish_gate: PublishGate::NamePiece,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Roster {
    concert_id: ConcertId,
    entries: Vec<Performance>,
    config: RosterConfig,
    editing: Option<PerformanceId>,
    summary: RosterSummary,
}

impl Roster {
    /// An empty roster for `concert_id`.
    pub fn new(concert_id: impl Into<ConcertId>, config: RosterConfig) -> Self {
        let mut roster = Self {
            concert_id: concert_id.into(),
            entries: Vec::new(),
            config,
            editing: None,
            summary: RosterSummary::default(),
        };
        roster.refresh();
        roster
    }

    /// Seed a roster from existing entries, keeping their sequence.
    ///
    /// Incoming `order` values are discarded and rederived. Duplicate ids are
    /// rejected.
    pub fn from_entries(
        concert_id: impl Into<ConcertId>,
        entries: Vec<Performance>,
        config: RosterConfig,
    ) -> Result<Self, CoreError> {
        for (i, p) in entries.iter().enumerate() {
            if entries[..i].iter().any(|q| q.id == p.id) {
                return Err(CoreError::Conflict(format!(
                    "Duplicate performance id '{}' in roster",
                    p.id
                )));
            }
        }

        let mut roster = Self::new(concert_id, config);
        roster.entries = entries;
        roster.refresh();
        Ok(roster)
    }

    // -- accessors ----------------------------------------------------------

    pub fn concert_id(&self) -> &str {
        &self.concert_id
    }

    pub fn entries(&self) -> &[Performance] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Performance> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn config(&self) -> &RosterConfig {
        &self.config
    }

    /// Aggregate state as of the last mutation.
    pub fn summary(&self) -> &RosterSummary {
        &self.summary
    }

    pub fn can_publish(&self) -> bool {
        self.summary.can_publish
    }

    pub fn get(&self, id: &str) -> Option<&Performance> {
        self.entries.iter().find(|p| p.id == id)
    }

    /// Zero-based index of the entry with `id`.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|p| p.id == id)
    }

    // -- editing state ------------------------------------------------------

    /// The entry currently open in the edit form, if any.
    pub fn editing_id(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    /// Open `id` for editing. Returns `false` if no such entry exists.
    pub fn begin_edit(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.editing = Some(id.to_string());
        true
    }

    pub fn finish_edit(&mut self) {
        self.editing = None;
    }

    // -- mutations ----------------------------------------------------------

    /// Append a blank entry and open it for editing. Returns its id.
    pub fn add(&mut self) -> PerformanceId {
        let id = uuid::Uuid::new_v4().to_string();
        let order = self.entries.len() as u32 + 1;
        self.entries.push(Performance::blank(
            id.clone(),
            self.concert_id.clone(),
            order,
            self.config.default_confidence,
        ));
        self.editing = Some(id.clone());
        self.refresh();
        id
    }

    /// Remove the entry with `id`. Returns the removed entry, or `None` when
    /// the id is unknown (the roster is left untouched).
    pub fn delete(&mut self, id: &str) -> Option<Performance> {
        let index = self.position(id)?;
        let removed = self.entries.remove(index);
        if self.editing.as_deref() == Some(id) {
            self.editing = None;
        }
        self.refresh();
        Some(removed)
    }

    /// Swap the entry at `index` with the one above it.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.entries.len() {
            return false;
        }
        self.entries.swap(index - 1, index);
        self.refresh();
        true
    }

    /// Swap the entry at `index` with the one below it.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.entries.len() {
            return false;
        }
        self.entries.swap(index, index + 1);
        self.refresh();
        true
    }

    /// Remove the entry at `from` and reinsert it at `to`.
    ///
    /// Splice semantics: entries between the two positions shift by one.
    /// Out-of-range indices or `from == to` leave the roster untouched.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.entries.len();
        if from >= len || to >= len || from == to {
            return false;
        }
        let moved = self.entries.remove(from);
        self.entries.insert(to, moved);
        self.refresh();
        true
    }

    /// Move the entry with `id` to the 1-based `position`, clamped to the
    /// roster bounds. Keyboard equivalent of a drag.
    pub fn move_to(&mut self, id: &str, position: u32) -> bool {
        let Some(from) = self.position(id) else {
            return false;
        };
        let last = self.entries.len() - 1;
        let to = (position.max(1) as usize - 1).min(last);
        self.reorder(from, to)
    }

    /// Set one field of the entry with `id`. Unknown ids are ignored.
    pub fn update_field(&mut self, id: &str, update: FieldUpdate) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        entry.apply(update);
        self.refresh();
        true
    }

    /// Replace the entry with the same id (edit-form save) and close the
    /// editor. Position, concert, and confidence stay with the roster.
    pub fn save_entry(&mut self, updated: Performance) -> bool {
        let Some(index) = self.position(&updated.id) else {
            return false;
        };
        let current = &self.entries[index];
        let replacement = Performance {
            concert_id: current.concert_id.clone(),
            order: current.order,
            confidence: current.confidence,
            ..updated
        };
        self.entries[index] = replacement;
        self.editing = None;
        self.refresh();
        true
    }

    /// Rederive `order` and the summary. Runs after every mutation.
    fn refresh(&mut self) {
        for (i, p) in self.entries.iter_mut().enumerate() {
            p.order = i as u32 + 1;
        }
        self.summary = summarize(&self.entries, self.config.publish_gate);
    }
}

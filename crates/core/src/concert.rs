//! Concert draft form state and concert lifecycle.
//!
//! [`ConcertDraft`] is the in-progress create-concert form exactly as the
//! user typed it; it is what the draft autosaver persists. Submitting a valid
//! draft produces a [`Concert`] that moves through [`ConcertStatus`] one step
//! at a time.

use std::fmt;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{ConcertId, Minutes};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Format of the start-time form input (`2026-03-15T14:00`).
pub const FORM_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Same, with seconds, as some inputs submit it.
const FORM_DATETIME_FORMAT_SECS: &str = "%Y-%m-%dT%H:%M:%S";

pub const DEFAULT_START_TIME: &str = "2026-03-15T14:00";
pub const DEFAULT_DURATION_MINUTES: Minutes = 120;

pub const MAX_DURATION_MINUTES: Minutes = 600;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Where the concert takes place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConcertType {
    Online,
    #[default]
    Offline,
}

impl ConcertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "ONLINE",
            Self::Offline => "OFFLINE",
        }
    }
}

/// Lifecycle of a concert, from the create form to the published program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConcertStatus {
    Draft,
    Parsing,
    Reviewing,
    Published,
}

impl ConcertStatus {
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            "DRAFT" => Ok(Self::Draft),
            "PARSING" => Ok(Self::Parsing),
            "REVIEWING" => Ok(Self::Reviewing),
            "PUBLISHED" => Ok(Self::Published),
            _ => Err(CoreError::Validation(format!(
                "Invalid concert status '{s}'. Must be one of: DRAFT, PARSING, REVIEWING, PUBLISHED"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Parsing => "PARSING",
            Self::Reviewing => "REVIEWING",
            Self::Published => "PUBLISHED",
        }
    }

    /// The status that follows this one, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Draft => Some(Self::Parsing),
            Self::Parsing => Some(Self::Reviewing),
            Self::Reviewing => Some(Self::Published),
            Self::Published => None,
        }
    }
}

impl fmt::Display for ConcertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transition is valid only when `to` directly follows `from`.
pub fn validate_transition(from: ConcertStatus, to: ConcertStatus) -> Result<(), CoreError> {
    if from.next() == Some(to) {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition { from, to })
    }
}

// ---------------------------------------------------------------------------
// Draft form
// ---------------------------------------------------------------------------

/// The create-concert form.
///
/// Field names match the persisted draft JSON. Missing fields fall back to
/// the defaults so older snapshots still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ConcertDraft {
    #[validate(length(min = 1, max = 200, message = "Concert title must be 1 to 200 characters"))]
    pub title: String,
    #[serde(rename = "type")]
    pub concert_type: ConcertType,
    pub start_time: String,
    #[validate(range(min = 1, max = 600, message = "Duration must be between 1 and 600 minutes"))]
    pub duration: Minutes,
    pub venue_name: String,
    pub venue_address: String,
    /// Pasted program list, free text.
    pub raw_input: String,
}

impl Default for ConcertDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            concert_type: ConcertType::Offline,
            start_time: DEFAULT_START_TIME.to_string(),
            duration: DEFAULT_DURATION_MINUTES,
            venue_name: String::new(),
            venue_address: String::new(),
            raw_input: String::new(),
        }
    }
}

impl ConcertDraft {
    /// Parsed start time, if the form value is a valid local date-time.
    pub fn start(&self) -> Option<NaiveDateTime> {
        parse_form_datetime(&self.start_time)
    }

    /// Start plus duration. `None` when either is unset or unparseable.
    pub fn expected_end(&self) -> Option<NaiveDateTime> {
        if self.duration == 0 {
            return None;
        }
        let start = self.start()?;
        start.checked_add_signed(Duration::minutes(i64::from(self.duration)))
    }

    /// A program exists when there is pasted text or an attached file.
    pub fn has_program_input(&self, has_asset: bool) -> bool {
        !self.raw_input.trim().is_empty() || has_asset
    }

    /// Check the draft can move on to parsing.
    pub fn validate_submission(&self, has_asset: bool) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        if self.start().is_none() {
            return Err(CoreError::Validation(format!(
                "Start time '{}' is not a valid date and time",
                self.start_time
            )));
        }
        if !self.has_program_input(has_asset) {
            return Err(CoreError::Validation(
                "Paste a program list or attach a file before continuing".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_form_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, FORM_DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, FORM_DATETIME_FORMAT_SECS))
        .ok()
}

// ---------------------------------------------------------------------------
// Concert
// ---------------------------------------------------------------------------

/// A submitted concert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concert {
    pub id: ConcertId,
    pub title: String,
    #[serde(rename = "type")]
    pub concert_type: ConcertType,
    pub status: ConcertStatus,
    /// Local wall-clock start time at the venue.
    pub start_time: NaiveDateTime,
    pub duration: Minutes,
    pub venue_name: String,
    pub venue_address: String,
    pub raw_input: String,
}

impl Concert {
    /// Build a `Draft`-status concert from a validated form.
    pub fn from_draft(id: impl Into<ConcertId>, draft: &ConcertDraft) -> Result<Self, CoreError> {
        let start_time = draft.start().ok_or_else(|| {
            CoreError::Validation(format!(
                "Start time '{}' is not a valid date and time",
                draft.start_time
            ))
        })?;
        Ok(Self {
            id: id.into(),
            title: draft.title.trim().to_string(),
            concert_type: draft.concert_type,
            status: ConcertStatus::Draft,
            start_time,
            duration: draft.duration,
            venue_name: draft.venue_name.clone(),
            venue_address: draft.venue_address.clone(),
            raw_input: draft.raw_input.clone(),
        })
    }

    /// Move to `to`, which must directly follow the current status.
    pub fn transition(&mut self, to: ConcertStatus) -> Result<(), CoreError> {
        validate_transition(self.status, to)?;
        self.status = to;
        Ok(())
    }
}

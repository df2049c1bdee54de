//! Performance entries: one row of a concert roster.
//!
//! Defines the entry struct, the confidence tag inherited from how the entry
//! was produced, and the typed field updates the roster editor applies.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{ConcertId, Minutes, PerformanceId};

// ---------------------------------------------------------------------------
// Confidence
// ---------------------------------------------------------------------------

/// How much the producer of an entry trusts its content.
///
/// Parsed entries carry `Low` when the parser was unsure. Manual edits never
/// change the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Low,
}

impl Confidence {
    /// Parse from the lowercase wire value.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "low" => Ok(Self::Low),
            other => Err(CoreError::Validation(format!(
                "Invalid confidence '{other}'. Must be one of: high, low"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Performance
// ---------------------------------------------------------------------------

/// A single performance in a concert program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Performance {
    pub id: PerformanceId,
    pub concert_id: ConcertId,
    /// 1-based display position, always dense within a roster.
    pub order: u32,
    pub name: String,
    pub piece: String,
    #[serde(default)]
    pub instrument: String,
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub email: String,
    /// Scheduled slot as a display string, e.g. `"14:05"`.
    #[serde(default)]
    pub slot: String,
    #[serde(default)]
    pub duration: Minutes,
    pub confidence: Confidence,
}

impl Performance {
    /// An entry with every editable field empty and no duration.
    pub fn blank(
        id: impl Into<PerformanceId>,
        concert_id: impl Into<ConcertId>,
        order: u32,
        confidence: Confidence,
    ) -> Self {
        Self {
            id: id.into(),
            concert_id: concert_id.into(),
            order,
            name: String::new(),
            piece: String::new(),
            instrument: String::new(),
            grade: String::new(),
            email: String::new(),
            slot: String::new(),
            duration: 0,
            confidence,
        }
    }

    /// Apply a single field update. `order` and `confidence` are untouched.
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Name(v) => self.name = v,
            FieldUpdate::Piece(v) => self.piece = v,
            FieldUpdate::Instrument(v) => self.instrument = v,
            FieldUpdate::Grade(v) => self.grade = v,
            FieldUpdate::Email(v) => self.email = v,
            FieldUpdate::Slot(v) => self.slot = v,
            FieldUpdate::Duration(v) => self.duration = v,
        }
    }

    /// Whether the given field holds no value. A zero duration counts as empty.
    pub fn is_field_empty(&self, field: PerformanceField) -> bool {
        match field {
            PerformanceField::Name => self.name.is_empty(),
            PerformanceField::Piece => self.piece.is_empty(),
            PerformanceField::Instrument => self.instrument.is_empty(),
            PerformanceField::Grade => self.grade.is_empty(),
            PerformanceField::Email => self.email.is_empty(),
            PerformanceField::Slot => self.slot.is_empty(),
            PerformanceField::Duration => self.duration == 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// Editable fields of a performance entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceField {
    Name,
    Piece,
    Instrument,
    Grade,
    Email,
    Slot,
    Duration,
}

/// Every editable field, in form order.
pub const ALL_FIELDS: &[PerformanceField] = &[
    PerformanceField::Name,
    PerformanceField::Piece,
    PerformanceField::Instrument,
    PerformanceField::Grade,
    PerformanceField::Email,
    PerformanceField::Slot,
    PerformanceField::Duration,
];

impl PerformanceField {
    /// Parse from the snake_case key used by form inputs.
    pub fn from_key(key: &str) -> Result<Self, CoreError> {
        match key {
            "name" => Ok(Self::Name),
            "piece" => Ok(Self::Piece),
            "instrument" => Ok(Self::Instrument),
            "grade" => Ok(Self::Grade),
            "email" => Ok(Self::Email),
            "slot" => Ok(Self::Slot),
            "duration" => Ok(Self::Duration),
            _ => Err(CoreError::Validation(format!(
                "Unknown performance field '{key}'"
            ))),
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Piece => "piece",
            Self::Instrument => "instrument",
            Self::Grade => "grade",
            Self::Email => "email",
            Self::Slot => "slot",
            Self::Duration => "duration",
        }
    }

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Piece => "Piece",
            Self::Instrument => "Instrument",
            Self::Grade => "Grade",
            Self::Email => "Email",
            Self::Slot => "Time Slot",
            Self::Duration => "Duration",
        }
    }
}

/// A new value for exactly one field of a performance entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Name(String),
    Piece(String),
    Instrument(String),
    Grade(String),
    Email(String),
    Slot(String),
    Duration(Minutes),
}

impl FieldUpdate {
    /// Build an update from a form key and its raw text value.
    ///
    /// Text fields are taken verbatim. A blank duration means "unset" (0);
    /// anything else must be a non-negative whole number of minutes.
    pub fn parse(field: &str, value: &str) -> Result<Self, CoreError> {
        let field = PerformanceField::from_key(field)?;
        let text = value.to_string();
        Ok(match field {
            PerformanceField::Name => Self::Name(text),
            PerformanceField::Piece => Self::Piece(text),
            PerformanceField::Instrument => Self::Instrument(text),
            PerformanceField::Grade => Self::Grade(text),
            PerformanceField::Email => Self::Email(text),
            PerformanceField::Slot => Self::Slot(text),
            PerformanceField::Duration => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    Self::Duration(0)
                } else {
                    let minutes = trimmed.parse::<Minutes>().map_err(|_| {
                        CoreError::Validation(format!(
                            "Duration must be a whole number of minutes, got '{value}'"
                        ))
                    })?;
                    Self::Duration(minutes)
                }
            }
        })
    }

    /// The field this update targets.
    pub fn field(&self) -> PerformanceField {
        match self {
            Self::Name(_) => PerformanceField::Name,
            Self::Piece(_) => PerformanceField::Piece,
            Self::Instrument(_) => PerformanceField::Instrument,
            Self::Grade(_) => PerformanceField::Grade,
            Self::Email(_) => PerformanceField::Email,
            Self::Slot(_) => PerformanceField::Slot,
            Self::Duration(_) => PerformanceField::Duration,
        }
    }
}

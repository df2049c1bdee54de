//! Roster readiness: missing-field warnings, per-field validation cues, and
//! the publish gate.
//!
//! Two notions are kept apart on purpose:
//!
//! - **Display warnings** ([`missing_fields`]) flag any empty name, piece,
//!   instrument, email, or zero duration. They never block publishing.
//! - **The publish gate** ([`meets_publish_gate`]) only looks at the fields
//!   the configured [`PublishGate`] requires.
//!
//! [`ValidationCue`] is a third, purely presentational hint derived from the
//! entry's confidence tag. All functions here are pure.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::performance::{Confidence, Performance, PerformanceField};
use crate::types::Minutes;

// ---------------------------------------------------------------------------
// Missing fields (display only)
// ---------------------------------------------------------------------------

/// A field flagged as missing for display purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingField {
    Name,
    Piece,
    Instrument,
    Email,
    Duration,
}

impl MissingField {
    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Piece => "Piece",
            Self::Instrument => "Instrument",
            Self::Email => "Email",
            Self::Duration => "Duration",
        }
    }
}

/// List the fields of `p` that should carry a "missing" warning.
pub fn missing_fields(p: &Performance) -> Vec<MissingField> {
    let mut missing = Vec::new();
    if p.name.is_empty() {
        missing.push(MissingField::Name);
    }
    if p.piece.is_empty() {
        missing.push(MissingField::Piece);
    }
    if p.instrument.is_empty() {
        missing.push(MissingField::Instrument);
    }
    if p.email.is_empty() {
        missing.push(MissingField::Email);
    }
    if p.duration == 0 {
        missing.push(MissingField::Duration);
    }
    missing
}

/// Labels of [`missing_fields`], in display order.
pub fn missing_field_labels(p: &Performance) -> Vec<&'static str> {
    missing_fields(p).into_iter().map(MissingField::label).collect()
}

// ---------------------------------------------------------------------------
// Publish gate
// ---------------------------------------------------------------------------

/// Which fields every entry must have before the roster can be published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishGate {
    /// Name and piece must be non-empty.
    #[default]
    NamePiece,
    /// Name, piece, and email must be non-empty.
    NamePieceEmail,
}

impl PublishGate {
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s.trim() {
            "name_piece" => Ok(Self::NamePiece),
            "name_piece_email" => Ok(Self::NamePieceEmail),
            other => Err(CoreError::Validation(format!(
                "Invalid publish gate '{other}'. Must be one of: name_piece, name_piece_email"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NamePiece => "name_piece",
            Self::NamePieceEmail => "name_piece_email",
        }
    }
}

/// Whether a single entry satisfies the publish gate.
pub fn meets_publish_gate(p: &Performance, gate: PublishGate) -> bool {
    let base = !p.name.is_empty() && !p.piece.is_empty();
    match gate {
        PublishGate::NamePiece => base,
        PublishGate::NamePieceEmail => base && !p.email.is_empty(),
    }
}

// ---------------------------------------------------------------------------
// Validation cues (presentational)
// ---------------------------------------------------------------------------

/// Per-field render hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationCue {
    Ok,
    Warn,
    Missing,
}

/// Derive the cue from an entry's confidence and whether the field is empty.
///
/// Low confidence flags every field: empty ones as `Missing`, filled ones as
/// `Warn`. High confidence is always `Ok`.
pub fn validation_cue(confidence: Confidence, is_empty: bool) -> ValidationCue {
    match (confidence, is_empty) {
        (Confidence::Low, true) => ValidationCue::Missing,
        (Confidence::Low, false) => ValidationCue::Warn,
        (Confidence::High, _) => ValidationCue::Ok,
    }
}

/// Cue for one field of an entry.
pub fn field_cue(p: &Performance, field: PerformanceField) -> ValidationCue {
    validation_cue(p.confidence, p.is_field_empty(field))
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Aggregate state derived from the whole roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RosterSummary {
    pub total: usize,
    pub total_minutes: Minutes,
    /// Entries with at least one display warning.
    pub incomplete_count: usize,
    /// `order` of every entry without an email, for the checklist line.
    pub missing_email_orders: Vec<u32>,
    pub can_publish: bool,
}

/// Compute the [`RosterSummary`] for `entries` under `gate`.
pub fn summarize(entries: &[Performance], gate: PublishGate) -> RosterSummary {
    let total_minutes = entries.iter().map(|p| p.duration).sum();
    let incomplete_count = entries
        .iter()
        .filter(|p| !missing_fields(p).is_empty())
        .count();
    let missing_email_orders = entries
        .iter()
        .filter(|p| p.email.is_empty())
        .map(|p| p.order)
        .collect();
    let can_publish = !entries.is_empty() && entries.iter().all(|p| meets_publish_gate(p, gate));

    RosterSummary {
        total: entries.len(),
        total_minutes,
        incomplete_count,
        missing_email_orders,
        can_publish,
    }
}

/// Orders of entries that fail the gate, for publish error messages.
pub fn blocking_orders(entries: &[Performance], gate: PublishGate) -> Vec<u32> {
    entries
        .iter()
        .filter(|p| !meets_publish_gate(p, gate))
        .map(|p| p.order)
        .collect()
}

//! Program-list parsing seam.
//!
//! Real document parsing is out of scope; [`MockParseProvider`] returns the
//! fixed result the review screen is demonstrated with, so the rest of the
//! submit-to-review flow can run end to end.

use crate::concert::{Concert, ConcertDraft};
use crate::performance::{Confidence, Performance};

/// Turns a submitted draft into an initial list of performances.
pub trait ParseProvider {
    fn parse(&self, concert: &Concert, draft: &ConcertDraft) -> Vec<Performance>;
}

/// Returns three pre-baked performances regardless of input.
///
/// The first row has low confidence with missing instrument and email, the
/// other two are complete.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockParseProvider;

impl ParseProvider for MockParseProvider {
    fn parse(&self, concert: &Concert, _draft: &ConcertDraft) -> Vec<Performance> {
        let row = |id: &str,
                   name: &str,
                   piece: &str,
                   instrument: &str,
                   grade: &str,
                   email: &str,
                   slot: &str,
                   duration: u32,
                   confidence: Confidence| Performance {
            id: id.to_string(),
            concert_id: concert.id.clone(),
            order: 0,
            name: name.to_string(),
            piece: piece.to_string(),
            instrument: instrument.to_string(),
            grade: grade.to_string(),
            email: email.to_string(),
            slot: slot.to_string(),
            duration,
            confidence,
        };

        vec![
            row("1", "Tommy", "Fur Elise", "", "", "", "14:05", 4, Confidence::Low),
            row(
                "2",
                "Emma Chen",
                "Chopin Nocturne Op.9 No.2",
                "Piano",
                "8",
                "emma@gmail.com",
                "14:10",
                8,
                Confidence::High,
            ),
            row(
                "3",
                "Liam Rodriguez",
                "Bach Partita No.2",
                "Violin",
                "7",
                "liam@gmail.com",
                "14:20",
                5,
                Confidence::High,
            ),
        ]
    }
}

//! Print-ready concert program.
//!
//! [`ProgramSheet::build`] lays out a concert and its performances as the
//! printed handout: heading lines, numbered items, and a footer with totals.
//! Turning the sheet into paper is left to the caller.

use serde::Serialize;

use crate::concert::{Concert, ConcertType};
use crate::performance::Performance;
use crate::types::Minutes;

const DATE_FORMAT: &str = "%A, %B %-d, %Y";
const TIME_FORMAT: &str = "%I:%M %p";
const ONLINE_VENUE_LINE: &str = "Online via Zoom";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramItem {
    pub order: u32,
    pub performer: String,
    pub instrument: String,
    pub piece: String,
    pub duration: Minutes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramSheet {
    pub title: String,
    pub date_line: String,
    pub time_line: String,
    pub venue_line: String,
    pub items: Vec<ProgramItem>,
    pub total_minutes: Minutes,
}

impl ProgramSheet {
    /// Lay out `performances` in their roster order.
    pub fn build(concert: &Concert, performances: &[Performance]) -> Self {
        let mut sorted: Vec<&Performance> = performances.iter().collect();
        sorted.sort_by_key(|p| p.order);

        let items: Vec<ProgramItem> = sorted
            .into_iter()
            .map(|p| ProgramItem {
                order: p.order,
                performer: p.name.clone(),
                instrument: p.instrument.clone(),
                piece: p.piece.clone(),
                duration: p.duration,
            })
            .collect();

        Self {
            title: concert.title.clone(),
            date_line: concert.start_time.format(DATE_FORMAT).to_string(),
            time_line: concert.start_time.format(TIME_FORMAT).to_string(),
            venue_line: venue_line(concert),
            total_minutes: items.iter().map(|i| i.duration).sum(),
            items,
        }
    }

    /// Plain-text rendering, one performance per line.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');
        out.push_str(&format!("{} at {}\n", self.date_line, self.time_line));
        if !self.venue_line.is_empty() {
            out.push_str(&self.venue_line);
            out.push('\n');
        }
        out.push('\n');

        for item in &self.items {
            let instrument = if item.instrument.is_empty() {
                String::new()
            } else {
                format!(" ({})", item.instrument)
            };
            out.push_str(&format!(
                "{:>2}. {}{}: {}, {} min\n",
                item.order, item.performer, instrument, item.piece, item.duration
            ));
        }

        out.push('\n');
        out.push_str(&format!(
            "{} performers, {} minutes\n",
            self.items.len(),
            self.total_minutes
        ));
        out
    }
}

fn venue_line(concert: &Concert) -> String {
    match concert.concert_type {
        ConcertType::Online => ONLINE_VENUE_LINE.to_string(),
        ConcertType::Offline => [concert.venue_name.as_str(), concert.venue_address.as_str()]
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

//! Teacher dashboard logic: sorting concerts into list tabs and tracking
//! student messages on a concert.
//!
//! The current time is always passed in by the caller.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::concert::{Concert, ConcertStatus};
use crate::types::ConcertId;

// ---------------------------------------------------------------------------
// Concert list tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcertTab {
    /// Not yet published.
    InProgress,
    /// Published, not yet performed.
    Upcoming,
    /// Published and already performed.
    Past,
}

impl ConcertTab {
    pub fn label(self) -> &'static str {
        match self {
            Self::InProgress => "In Progress",
            Self::Upcoming => "Upcoming",
            Self::Past => "Past",
        }
    }
}

/// A concert has happened once its start time is before `now`.
pub fn is_past(concert: &Concert, now: NaiveDateTime) -> bool {
    concert.start_time < now
}

pub fn concert_tab(concert: &Concert, now: NaiveDateTime) -> ConcertTab {
    match concert.status {
        ConcertStatus::Published if is_past(concert, now) => ConcertTab::Past,
        ConcertStatus::Published => ConcertTab::Upcoming,
        _ => ConcertTab::InProgress,
    }
}

/// Call-to-action shown on a concert card. A concert still being parsed has
/// none.
pub fn action_label(concert: &Concert, now: NaiveDateTime) -> Option<&'static str> {
    match concert.status {
        ConcertStatus::Draft => Some("Continue editing"),
        ConcertStatus::Parsing => None,
        ConcertStatus::Reviewing => Some("Review AI results"),
        ConcertStatus::Published if is_past(concert, now) => Some("View results"),
        ConcertStatus::Published => Some("View & Edit"),
    }
}

/// Concerts split into tabs, each keeping the input order.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ConcertTabs<'a> {
    pub in_progress: Vec<&'a Concert>,
    pub upcoming: Vec<&'a Concert>,
    pub past: Vec<&'a Concert>,
}

impl<'a> ConcertTabs<'a> {
    pub fn sort(concerts: &'a [Concert], now: NaiveDateTime) -> Self {
        let mut tabs = Self::default();
        for concert in concerts {
            match concert_tab(concert, now) {
                ConcertTab::InProgress => tabs.in_progress.push(concert),
                ConcertTab::Upcoming => tabs.upcoming.push(concert),
                ConcertTab::Past => tabs.past.push(concert),
            }
        }
        tabs
    }

    pub fn get(&self, tab: ConcertTab) -> &[&'a Concert] {
        match tab {
            ConcertTab::InProgress => &self.in_progress,
            ConcertTab::Upcoming => &self.upcoming,
            ConcertTab::Past => &self.past,
        }
    }
}

// ---------------------------------------------------------------------------
// Student messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentMessage {
    pub id: String,
    pub concert_id: ConcertId,
    pub student_name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

/// Messages students sent about one concert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageInbox {
    messages: Vec<StudentMessage>,
}

impl MessageInbox {
    /// Keep only the messages addressed to `concert_id`.
    pub fn for_concert(
        messages: impl IntoIterator<Item = StudentMessage>,
        concert_id: &str,
    ) -> Self {
        Self {
            messages: messages
                .into_iter()
                .filter(|m| m.concert_id == concert_id)
                .collect(),
        }
    }

    pub fn messages(&self) -> &[StudentMessage] {
        &self.messages
    }

    pub fn unread_count(&self) -> usize {
        self.messages.iter().filter(|m| !m.read).count()
    }

    /// Mark one message read. Returns `false` if it is unknown or was
    /// already read.
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id && !m.read) {
            Some(message) => {
                message.read = true;
                true
            }
            None => false,
        }
    }

    /// Mark everything read; returns how many messages changed.
    pub fn mark_all_read(&mut self) -> usize {
        let mut changed = 0;
        for message in self.messages.iter_mut().filter(|m| !m.read) {
            message.read = true;
            changed += 1;
        }
        changed
    }
}

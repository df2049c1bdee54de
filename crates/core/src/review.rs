//! Review board: a concert in `Reviewing` plus its editable roster.

use crate::concert::{Concert, ConcertDraft, ConcertStatus};
use crate::error::CoreError;
use crate::parsing::ParseProvider;
use crate::readiness::blocking_orders;
use crate::roster::{Roster, RosterConfig};

#[derive(Debug, Clone)]
pub struct ReviewBoard {
    concert: Concert,
    roster: Roster,
}

impl ReviewBoard {
    /// Take a freshly submitted concert through parsing into review.
    ///
    /// The concert must still be in `Draft`.
    pub fn from_submission(
        mut concert: Concert,
        draft: &ConcertDraft,
        provider: &dyn ParseProvider,
        config: RosterConfig,
    ) -> Result<Self, CoreError> {
        concert.transition(ConcertStatus::Parsing)?;
        let parsed = provider.parse(&concert, draft);
        let roster = Roster::from_entries(concert.id.clone(), parsed, config)?;
        concert.transition(ConcertStatus::Reviewing)?;
        Ok(Self { concert, roster })
    }

    pub fn concert(&self) -> &Concert {
        &self.concert
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    /// Publish the concert.
    ///
    /// Blocked until the roster passes its publish gate; the error names the
    /// rows still missing required fields.
    pub fn publish(&mut self) -> Result<&Concert, CoreError> {
        if !self.roster.can_publish() {
            if self.roster.is_empty() {
                return Err(CoreError::Validation(
                    "Cannot publish a concert with no performers".to_string(),
                ));
            }
            let rows = blocking_orders(self.roster.entries(), self.roster.config().publish_gate)
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(CoreError::Validation(format!(
                "Rows {rows} are missing required fields"
            )));
        }
        self.concert.transition(ConcertStatus::Published)?;
        Ok(&self.concert)
    }
}

//! Create-concert screen state.
//!
//! A [`DraftSession`] owns the in-memory form and attached file, restores
//! them from storage when the screen opens, and keeps storage loosely in
//! sync through an [`Autosaver`]. Storage problems never surface here: the
//! form keeps working in memory.

use std::sync::Arc;

use tokio::sync::watch;

use musicnbrain_core::concert::{Concert, ConcertDraft};
use musicnbrain_core::error::CoreError;
use musicnbrain_core::parsing::ParseProvider;
use musicnbrain_core::review::ReviewBoard;
use musicnbrain_core::roster::RosterConfig;
use musicnbrain_core::types::ConcertId;

use crate::asset::{AssetSlot, AssetTicket, DraftAsset};
use crate::autosave::{Autosaver, SaveStatus};
use crate::config::AutosaveConfig;
use crate::repo::{DraftRepo, DraftSnapshot};
use crate::store::KeyValueStore;

pub struct DraftSession {
    form: ConcertDraft,
    assets: AssetSlot,
    autosaver: Autosaver,
    restored: bool,
}

impl DraftSession {
    /// Enter the screen: restore the stored draft or start from defaults.
    pub fn open(store: Arc<dyn KeyValueStore>, config: &AutosaveConfig) -> Self {
        let repo = Arc::new(DraftRepo::new(store, config.draft_key.clone()));
        let autosaver = Autosaver::new(repo, config);
        let mut assets = AssetSlot::new();

        let (form, restored) = match autosaver.load() {
            Some(snapshot) => {
                if let Some(asset) = snapshot.asset {
                    assets.restore(asset);
                }
                (snapshot.form, true)
            }
            None => (ConcertDraft::default(), false),
        };
        tracing::debug!(restored, "Draft session opened");

        Self {
            form,
            assets,
            autosaver,
            restored,
        }
    }

    pub fn form(&self) -> &ConcertDraft {
        &self.form
    }

    pub fn asset(&self) -> Option<&DraftAsset> {
        self.assets.asset()
    }

    pub fn pending_asset_name(&self) -> Option<&str> {
        self.assets.pending_file_name()
    }

    /// Whether the form came from a stored draft.
    pub fn was_restored(&self) -> bool {
        self.restored
    }

    pub fn save_status(&self) -> SaveStatus {
        self.autosaver.status()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<SaveStatus> {
        self.autosaver.subscribe()
    }

    /// Submit is allowed once there is a title and some program input.
    pub fn can_submit(&self) -> bool {
        !self.form.title.is_empty() && self.form.has_program_input(self.assets.has_asset())
    }

    /// Edit the form. A save is scheduled only if something changed.
    pub fn update_form(&mut self, edit: impl FnOnce(&mut ConcertDraft)) {
        let before = self.form.clone();
        edit(&mut self.form);
        if self.form != before {
            self.schedule_save();
        }
    }

    /// Start attaching `file_name`. Finish with [`complete_asset`] once the
    /// file has been read.
    ///
    /// [`complete_asset`]: Self::complete_asset
    pub fn select_asset(&mut self, file_name: impl Into<String>) -> AssetTicket {
        let had_asset = self.assets.has_asset();
        let ticket = self.assets.select(file_name);
        if had_asset {
            self.schedule_save();
        }
        ticket
    }

    /// Land a finished read. Stale reads are ignored and return `false`.
    pub fn complete_asset(&mut self, ticket: AssetTicket, asset: DraftAsset) -> bool {
        let landed = self.assets.complete(ticket, asset);
        if landed {
            self.schedule_save();
        }
        landed
    }

    pub fn fail_asset(&mut self, ticket: &AssetTicket) {
        self.assets.fail(ticket);
    }

    pub fn remove_asset(&mut self) {
        let had_asset = self.assets.has_asset();
        self.assets.remove();
        if had_asset {
            self.schedule_save();
        }
    }

    /// Validate and hand the draft over to review.
    ///
    /// On success the stored draft is deleted and the caller should drop the
    /// session. On failure nothing changes.
    pub fn submit(
        &mut self,
        concert_id: impl Into<ConcertId>,
        provider: &dyn ParseProvider,
        roster_config: RosterConfig,
    ) -> Result<ReviewBoard, CoreError> {
        self.form.validate_submission(self.assets.has_asset())?;
        let concert = Concert::from_draft(concert_id, &self.form)?;
        let board = ReviewBoard::from_submission(concert, &self.form, provider, roster_config)?;
        self.autosaver.flush_on_submit();
        Ok(board)
    }

    /// Leave the screen without submitting. A pending save is dropped; the
    /// last written draft stays for next time.
    pub fn leave(mut self) {
        self.autosaver.cancel();
    }

    fn schedule_save(&mut self) {
        self.autosaver.schedule_save(DraftSnapshot {
            form: self.form.clone(),
            asset: self.assets.asset().cloned(),
        });
    }
}

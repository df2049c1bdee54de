//! Debounced draft autosave.
//!
//! [`Autosaver::schedule_save`] is called on every form change. Each call
//! cancels the previously scheduled write and starts a new timer, so only the
//! state passed to the last call inside a quiet period reaches storage
//! (trailing-edge debounce). A [`SaveStatus`] is published on a `watch`
//! channel for the "Saving... / Draft saved" indicator; it is advisory only.
//!
//! Scheduling spawns onto the Tokio runtime that was current when the
//! autosaver was built. Without one the autosaver runs in memory only:
//! saves are never scheduled and the status stays `Idle`.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::config::AutosaveConfig;
use crate::repo::{DraftRepo, DraftSnapshot};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaveStatus {
    #[default]
    Idle,
    /// A write is scheduled but has not happened yet.
    Saving,
    /// The last scheduled write landed.
    Saved,
}

pub struct Autosaver {
    repo: Arc<DraftRepo>,
    /// `None` when built outside a runtime; autosave is then disabled.
    runtime: Option<Handle>,
    status: Arc<watch::Sender<SaveStatus>>,
    debounce: Duration,
    saved_display: Duration,
    /// Parent of every pending-write token; cancelled on drop.
    shutdown: CancellationToken,
    pending: Option<CancellationToken>,
}

impl Autosaver {
    pub fn new(repo: Arc<DraftRepo>, config: &AutosaveConfig) -> Self {
        let (status, _) = watch::channel(SaveStatus::Idle);
        let runtime = match Handle::try_current() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!(
                    key = %repo.key().form_key(),
                    error = %e,
                    "No async runtime, draft autosave disabled"
                );
                None
            }
        };
        Self {
            repo,
            runtime,
            status: Arc::new(status),
            debounce: config.debounce,
            saved_display: config.saved_display,
            shutdown: CancellationToken::new(),
            pending: None,
        }
    }

    pub fn repo(&self) -> &DraftRepo {
        &self.repo
    }

    /// Whether scheduled saves can run at all.
    pub fn is_enabled(&self) -> bool {
        self.runtime.is_some()
    }

    pub fn status(&self) -> SaveStatus {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.status.subscribe()
    }

    /// Read the stored draft. Faults are contained by the repository.
    pub fn load(&self) -> Option<DraftSnapshot> {
        self.repo.load()
    }

    /// Replace any pending write with one of `snapshot` after the debounce.
    pub fn schedule_save(&mut self, snapshot: DraftSnapshot) {
        self.cancel_pending();
        let Some(runtime) = self.runtime.as_ref() else {
            return;
        };

        let token = self.shutdown.child_token();
        self.pending = Some(token.clone());
        self.status.send_replace(SaveStatus::Saving);
        tracing::debug!(
            key = %self.repo.key().form_key(),
            delay_ms = self.debounce.as_millis() as u64,
            "Draft save scheduled"
        );

        let repo = Arc::clone(&self.repo);
        let status = Arc::clone(&self.status);
        let debounce = self.debounce;
        let saved_display = self.saved_display;

        runtime.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(debounce) => {}
            }

            match repo.save_if(&snapshot, || !token.is_cancelled()) {
                None => return,
                Some(Ok(())) => {
                    tracing::info!(key = %repo.key().form_key(), "Draft saved");
                    // A flush or cancel after the write owns the status now.
                    status.send_if_modified(|s| {
                        if token.is_cancelled() {
                            return false;
                        }
                        *s = SaveStatus::Saved;
                        true
                    });
                }
                Some(Err(e)) => {
                    tracing::warn!(
                        key = %repo.key().form_key(),
                        error = %e,
                        "Draft autosave failed, continuing without it"
                    );
                    status.send_if_modified(|s| {
                        if token.is_cancelled() {
                            return false;
                        }
                        *s = SaveStatus::Idle;
                        true
                    });
                    return;
                }
            }

            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(saved_display) => {
                    status.send_if_modified(|s| {
                        if *s == SaveStatus::Saved {
                            *s = SaveStatus::Idle;
                            true
                        } else {
                            false
                        }
                    });
                }
            }
        });
    }

    /// The form was submitted: drop any pending write and delete the stored
    /// draft so the next load starts fresh.
    pub fn flush_on_submit(&mut self) {
        self.cancel_pending();
        match self.repo.clear() {
            Ok(()) => tracing::info!(key = %self.repo.key().form_key(), "Draft cleared on submit"),
            Err(e) => tracing::warn!(
                key = %self.repo.key().form_key(),
                error = %e,
                "Failed to clear submitted draft"
            ),
        }
        self.status.send_replace(SaveStatus::Idle);
    }

    /// The user left the screen: drop any pending write without flushing.
    /// Whatever was last written stays in storage.
    pub fn cancel(&mut self) {
        if self.cancel_pending() {
            tracing::debug!(key = %self.repo.key().form_key(), "Pending draft save cancelled");
        }
        self.status.send_replace(SaveStatus::Idle);
    }

    fn cancel_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }
}

impl Drop for Autosaver {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

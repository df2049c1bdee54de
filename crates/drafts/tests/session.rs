//! Integration tests for the create-concert draft session: restore on open,
//! autosave on edit, asset handling, submit, and leaving the screen.

mod common;

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use musicnbrain_core::concert::{ConcertStatus, ConcertType};
use musicnbrain_core::error::CoreError;
use musicnbrain_core::parsing::MockParseProvider;
use musicnbrain_core::roster::RosterConfig;
use musicnbrain_drafts::{
    AutosaveConfig, DirStore, DraftAsset, DraftSession, KeyValueStore, MemoryStore, SaveStatus,
};

use common::{CountingStore, UnavailableStore};

fn open(store: &Arc<CountingStore>) -> DraftSession {
    let store: Arc<dyn KeyValueStore> = store.clone();
    DraftSession::open(store, &AutosaveConfig::default())
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(1100)).await;
}

// ---------------------------------------------------------------------------
// Restore
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn fresh_session_uses_defaults() {
    let store = Arc::new(CountingStore::default());
    let session = open(&store);

    assert!(!session.was_restored());
    assert_eq!(session.form().concert_type, ConcertType::Offline);
    assert_eq!(session.form().duration, 120);
    assert!(session.asset().is_none());
    assert_eq!(session.save_status(), SaveStatus::Idle);
    assert!(!session.can_submit());
}

#[tokio::test(start_paused = true)]
async fn edits_survive_reopening() {
    let store = Arc::new(CountingStore::default());
    let mut session = open(&store);
    session.update_form(|f| f.title = "Spring Recital 2026".into());
    session.update_form(|f| f.concert_type = ConcertType::Online);
    settle().await;
    session.leave();

    let reopened = open(&store);
    assert!(reopened.was_restored());
    assert_eq!(reopened.form().title, "Spring Recital 2026");
    assert_eq!(reopened.form().concert_type, ConcertType::Online);
    assert_eq!(store.form_writes(), 1);
}

#[tokio::test(start_paused = true)]
async fn corrupt_draft_opens_with_defaults() {
    let store = Arc::new(CountingStore::default());
    store.inner.set("musicnbrain_draft", "{\"title\": ").unwrap();

    let session = open(&store);
    assert!(!session.was_restored());
    assert!(session.form().title.is_empty());
}

#[tokio::test(start_paused = true)]
async fn unchanged_edit_does_not_schedule() {
    let store = Arc::new(CountingStore::default());
    let mut session = open(&store);
    session.update_form(|f| f.duration = 120);
    assert_eq!(session.save_status(), SaveStatus::Idle);
    settle().await;
    assert_eq!(store.form_writes(), 0);
}

// ---------------------------------------------------------------------------
// Leaving
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn leaving_drops_unsaved_edit_but_keeps_draft() {
    let store = Arc::new(CountingStore::default());
    let mut session = open(&store);
    session.update_form(|f| f.title = "Saved title".into());
    settle().await;
    session.update_form(|f| f.title = "Unsaved title".into());
    session.leave();
    settle().await;

    let reopened = open(&store);
    assert_eq!(reopened.form().title, "Saved title");
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn attached_asset_is_restored_and_removable() {
    let store = Arc::new(CountingStore::default());
    let mut session = open(&store);

    let ticket = session.select_asset("program.jpg");
    assert_eq!(session.pending_asset_name(), Some("program.jpg"));
    assert!(session.complete_asset(ticket, DraftAsset::from_bytes("program.jpg", b"jpeg")));
    settle().await;

    let mut reopened = open(&store);
    let asset = reopened.asset().unwrap();
    assert_eq!(asset.file_name, "program.jpg");
    assert_eq!(asset.decode().unwrap(), b"jpeg");

    reopened.remove_asset();
    settle().await;
    assert!(!store.inner.contains("musicnbrain_draft_image"));
    assert!(open(&store).asset().is_none());
}

#[tokio::test(start_paused = true)]
async fn stale_asset_read_is_ignored() {
    let store = Arc::new(CountingStore::default());
    let mut session = open(&store);

    let first = session.select_asset("old.png");
    let second = session.select_asset("new.png");
    assert!(session.complete_asset(second, DraftAsset::from_bytes("new.png", b"new")));
    assert!(!session.complete_asset(first, DraftAsset::from_bytes("old.png", b"old")));
    assert_eq!(session.asset().unwrap().file_name, "new.png");

    let ticket = session.select_asset("third.png");
    session.remove_asset();
    assert!(!session.complete_asset(ticket, DraftAsset::from_bytes("third.png", b"3")));
    assert!(session.asset().is_none());
}

#[tokio::test(start_paused = true)]
async fn asset_read_from_disk_attaches() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("list.png");
    std::fs::write(&path, b"png bytes").unwrap();

    let store = Arc::new(CountingStore::default());
    let mut session = open(&store);
    let ticket = session.select_asset("list.png");
    let asset = musicnbrain_drafts::asset::read_asset(&path).await.unwrap();
    assert!(session.complete_asset(ticket, asset));
    assert_eq!(session.asset().unwrap().mime_type(), Some("image/png"));
}

#[tokio::test(start_paused = true)]
async fn asset_over_quota_keeps_form_usable() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::with_quota(1024));
    let mut session = DraftSession::open(store.clone(), &AutosaveConfig::default());
    session.update_form(|f| f.title = "Spring".into());
    let ticket = session.select_asset("huge.jpg");
    session.complete_asset(ticket, DraftAsset::from_bytes("huge.jpg", &[7u8; 8192]));
    settle().await;

    assert_eq!(session.save_status(), SaveStatus::Idle);
    assert!(session.asset().is_some());
    assert!(session.can_submit());

    let reopened = DraftSession::open(store, &AutosaveConfig::default());
    assert_eq!(reopened.form().title, "Spring");
    assert!(reopened.asset().is_none());
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn invalid_submit_keeps_draft() {
    let store = Arc::new(CountingStore::default());
    let mut session = open(&store);
    session.update_form(|f| f.title = "No program yet".into());
    settle().await;

    let result = session.submit("1", &MockParseProvider, RosterConfig::default());
    assert_matches!(result, Err(CoreError::Validation(_)));
    assert!(open(&store).was_restored());
}

#[tokio::test(start_paused = true)]
async fn submit_clears_draft_and_seeds_review() {
    let store = Arc::new(CountingStore::default());
    let mut session = open(&store);
    session.update_form(|f| {
        f.title = "Spring Recital 2026".into();
        f.raw_input = "1. Tommy - Fur Elise, 4 min".into();
    });
    settle().await;
    // An edit still pending at submit time must not be written afterwards.
    session.update_form(|f| f.venue_name = "Boston Concert Hall".into());
    assert!(session.can_submit());

    let board = session
        .submit("1", &MockParseProvider, RosterConfig::default())
        .unwrap();
    assert_eq!(board.concert().status, ConcertStatus::Reviewing);
    assert_eq!(board.concert().venue_name, "Boston Concert Hall");
    assert_eq!(board.roster().len(), 3);

    settle().await;
    assert!(store.inner.is_empty());
    assert!(!open(&store).was_restored());
}

#[tokio::test(start_paused = true)]
async fn submit_with_asset_only() {
    let store = Arc::new(CountingStore::default());
    let mut session = open(&store);
    session.update_form(|f| f.title = "Photo program".into());
    let ticket = session.select_asset("list.png");
    session.complete_asset(ticket, DraftAsset::from_bytes("list.png", b"png"));

    assert!(session.submit("9", &MockParseProvider, RosterConfig::default()).is_ok());
    assert!(store.inner.is_empty());
}

// ---------------------------------------------------------------------------
// Storage backends
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn works_without_storage() {
    let mut session = DraftSession::open(Arc::new(UnavailableStore), &AutosaveConfig::default());
    assert!(!session.was_restored());
    session.update_form(|f| {
        f.title = "Offline".into();
        f.raw_input = "1. A - B".into();
    });
    settle().await;
    assert_eq!(session.form().title, "Offline");
    assert!(session.submit("1", &MockParseProvider, RosterConfig::default()).is_ok());
}

#[test]
fn edits_work_without_async_runtime() {
    let store = Arc::new(CountingStore::default());
    store
        .inner
        .set("musicnbrain_draft", r#"{"title":"Restored"}"#)
        .unwrap();

    let mut session = open(&store);
    assert!(session.was_restored());
    session.update_form(|f| {
        f.title = "Spring".into();
        f.raw_input = "1. Tommy - Fur Elise".into();
    });
    assert_eq!(session.form().title, "Spring");
    assert_eq!(session.save_status(), SaveStatus::Idle);
    assert_eq!(store.form_writes(), 0);

    let board = session
        .submit("1", &MockParseProvider, RosterConfig::default())
        .unwrap();
    assert_eq!(board.concert().status, ConcertStatus::Reviewing);
    assert!(store.inner.is_empty());
}

#[tokio::test(start_paused = true)]
async fn directory_store_persists_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(DirStore::open(dir.path()).unwrap());

    let mut session = DraftSession::open(store.clone(), &AutosaveConfig::default());
    session.update_form(|f| f.venue_address = "123 Main St, Boston".into());
    settle().await;
    session.leave();

    let reopened = DraftSession::open(store, &AutosaveConfig::default());
    assert_eq!(reopened.form().venue_address, "123 Main St, Boston");
}

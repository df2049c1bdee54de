//! Draft persistence for the create-concert screen.
//!
//! - [`KeyValueStore`]: the durable string store drafts live in, with
//!   in-memory and directory-backed implementations.
//! - [`DraftRepo`]: snapshot load/save/clear with fault containment.
//! - [`Autosaver`]: trailing-edge debounced writes with a save status.
//! - [`AssetSlot`]: attached file with last-write-wins reads.
//! - [`DraftSession`]: the screen-level state tying these together.

pub mod asset;
pub mod autosave;
pub mod config;
pub mod error;
pub mod repo;
pub mod session;
pub mod store;

pub use asset::{AssetSlot, AssetTicket, DraftAsset};
pub use autosave::{Autosaver, SaveStatus};
pub use config::{AutosaveConfig, Settings};
pub use error::StoreError;
pub use repo::{DraftKey, DraftRepo, DraftSnapshot};
pub use session::DraftSession;
pub use store::{DirStore, KeyValueStore, MemoryStore};

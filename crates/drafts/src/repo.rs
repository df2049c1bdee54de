//! Draft snapshot repository.
//!
//! Stores the create-concert form and its optional attached file under three
//! keys derived from a [`DraftKey`]:
//!
//! | Key                  | Value                         |
//! |----------------------|-------------------------------|
//! | `<base>`             | form JSON                     |
//! | `<base>_image`       | asset data URI                |
//! | `<base>_imageName`   | asset display name            |
//!
//! Reads never fail from the caller's point of view: missing, unreadable,
//! or corrupt content is logged and treated as "no draft".

use std::sync::{Arc, Mutex, PoisonError};

use musicnbrain_core::concert::ConcertDraft;

use crate::asset::{DraftAsset, DEFAULT_ASSET_NAME};
use crate::error::StoreError;
use crate::store::KeyValueStore;

/// Base key of the single global draft.
pub const DEFAULT_DRAFT_KEY: &str = "musicnbrain_draft";

const IMAGE_SUFFIX: &str = "_image";
const IMAGE_NAME_SUFFIX: &str = "_imageName";

// ---------------------------------------------------------------------------
// DraftKey
// ---------------------------------------------------------------------------

/// Names the storage slot of one draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftKey {
    base: String,
}

impl DraftKey {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// A slot for one of several concurrent drafts.
    pub fn for_session(session_id: &str) -> Self {
        Self::new(format!("{DEFAULT_DRAFT_KEY}:{session_id}"))
    }

    pub fn form_key(&self) -> &str {
        &self.base
    }

    pub fn image_key(&self) -> String {
        format!("{}{IMAGE_SUFFIX}", self.base)
    }

    pub fn image_name_key(&self) -> String {
        format!("{}{IMAGE_NAME_SUFFIX}", self.base)
    }
}

impl Default for DraftKey {
    fn default() -> Self {
        Self::new(DEFAULT_DRAFT_KEY)
    }
}

// ---------------------------------------------------------------------------
// DraftSnapshot
// ---------------------------------------------------------------------------

/// Everything needed to resume the create-concert form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftSnapshot {
    pub form: ConcertDraft,
    pub asset: Option<DraftAsset>,
}

// ---------------------------------------------------------------------------
// DraftRepo
// ---------------------------------------------------------------------------

pub struct DraftRepo {
    store: Arc<dyn KeyValueStore>,
    key: DraftKey,
    /// Serializes writes against clears so a cancelled save cannot land
    /// after the draft was deleted.
    gate: Mutex<()>,
}

impl DraftRepo {
    pub fn new(store: Arc<dyn KeyValueStore>, key: DraftKey) -> Self {
        Self {
            store,
            key,
            gate: Mutex::new(()),
        }
    }

    pub fn key(&self) -> &DraftKey {
        &self.key
    }

    /// Read the stored draft, if any.
    pub fn load(&self) -> Option<DraftSnapshot> {
        let form = self.read_form();
        let asset = self.read_asset();
        if form.is_none() && asset.is_none() {
            return None;
        }
        Some(DraftSnapshot {
            form: form.unwrap_or_default(),
            asset,
        })
    }

    /// Write the form and either write or delete the asset keys.
    pub fn save(&self, snapshot: &DraftSnapshot) -> Result<(), StoreError> {
        let _guard = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        self.write(snapshot)
    }

    /// Write only if `proceed` still holds once the write gate is held.
    ///
    /// Returns `None` when the write was skipped.
    pub fn save_if(
        &self,
        snapshot: &DraftSnapshot,
        proceed: impl FnOnce() -> bool,
    ) -> Option<Result<(), StoreError>> {
        let _guard = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        if !proceed() {
            return None;
        }
        Some(self.write(snapshot))
    }

    /// Delete the form and asset keys.
    ///
    /// Every key is attempted; the first failure is returned.
    pub fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        let results = [
            self.store.delete(self.key.form_key()),
            self.store.delete(&self.key.image_key()),
            self.store.delete(&self.key.image_name_key()),
        ];
        results.into_iter().collect()
    }

    fn write(&self, snapshot: &DraftSnapshot) -> Result<(), StoreError> {
        let json = serde_json::to_string(&snapshot.form)?;
        self.store.set(self.key.form_key(), &json)?;
        match &snapshot.asset {
            Some(asset) => {
                self.store.set(&self.key.image_key(), &asset.data_uri)?;
                self.store
                    .set(&self.key.image_name_key(), &asset.file_name)?;
            }
            None => {
                self.store.delete(&self.key.image_key())?;
                self.store.delete(&self.key.image_name_key())?;
            }
        }
        Ok(())
    }

    fn read_form(&self) -> Option<ConcertDraft> {
        let key = self.key.form_key();
        let raw = match self.store.get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to read draft form");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(form) => Some(form),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Ignoring corrupt draft form");
                None
            }
        }
    }

    fn read_asset(&self) -> Option<DraftAsset> {
        let key = self.key.image_key();
        let data_uri = match self.store.get(&key) {
            Ok(Some(uri)) if !uri.is_empty() => uri,
            Ok(_) => return None,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to read draft asset");
                return None;
            }
        };
        let name_key = self.key.image_name_key();
        let file_name = match self.store.get(&name_key) {
            Ok(Some(name)) if !name.is_empty() => name,
            Ok(_) => DEFAULT_ASSET_NAME.to_string(),
            Err(e) => {
                tracing::warn!(key = %name_key, error = %e, "Failed to read draft asset name");
                DEFAULT_ASSET_NAME.to_string()
            }
        };
        Some(DraftAsset {
            data_uri,
            file_name,
        })
    }
}

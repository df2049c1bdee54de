//! Attached program files (usually a photo of a printed list).
//!
//! A file is read into a `data:` URI so it can sit in the same string store
//! as the form. Reads complete asynchronously; [`AssetSlot`] makes sure only
//! the most recent selection can land.

use std::path::Path;

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

/// Display name used when a stored asset has lost its file name.
pub const DEFAULT_ASSET_NAME: &str = "image";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftAsset {
    /// `data:<mime>;base64,<payload>`
    pub data_uri: String,
    pub file_name: String,
}

impl DraftAsset {
    /// Encode raw file bytes, guessing the MIME type from the extension.
    pub fn from_bytes(file_name: impl Into<String>, bytes: &[u8]) -> Self {
        let file_name = file_name.into();
        let mime = mime_for(&file_name);
        let payload = general_purpose::STANDARD.encode(bytes);
        Self {
            data_uri: format!("data:{mime};base64,{payload}"),
            file_name,
        }
    }

    /// MIME type declared in the data URI.
    pub fn mime_type(&self) -> Option<&str> {
        let rest = self.data_uri.strip_prefix("data:")?;
        rest.split(|c: char| c == ';' || c == ',').next()
    }

    /// Decode the payload back into bytes.
    pub fn decode(&self) -> Option<Vec<u8>> {
        let (_, payload) = self.data_uri.split_once(";base64,")?;
        general_purpose::STANDARD.decode(payload).ok()
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Read a file from disk into a [`DraftAsset`].
pub async fn read_asset(path: impl AsRef<Path>) -> std::io::Result<DraftAsset> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(DEFAULT_ASSET_NAME)
        .to_string();
    Ok(DraftAsset::from_bytes(file_name, &bytes))
}

// ---------------------------------------------------------------------------
// AssetSlot
// ---------------------------------------------------------------------------

/// Proof of which selection a read belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTicket {
    generation: u64,
    file_name: String,
}

impl AssetTicket {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

/// The currently attached asset, with last-write-wins on selection.
///
/// Every `select`, `remove`, or `restore` bumps a generation counter; a read
/// that completes with an older ticket is dropped.
#[derive(Debug, Default)]
pub struct AssetSlot {
    generation: u64,
    pending: Option<String>,
    asset: Option<DraftAsset>,
}

impl AssetSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn asset(&self) -> Option<&DraftAsset> {
        self.asset.as_ref()
    }

    /// File name of the selection still being read, if any.
    pub fn pending_file_name(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn has_asset(&self) -> bool {
        self.asset.is_some()
    }

    /// Start replacing the asset with `file_name`. Any previous asset is
    /// dropped right away.
    pub fn select(&mut self, file_name: impl Into<String>) -> AssetTicket {
        let file_name = file_name.into();
        self.generation += 1;
        self.pending = Some(file_name.clone());
        self.asset = None;
        AssetTicket {
            generation: self.generation,
            file_name,
        }
    }

    /// Land a finished read. Returns `false` (and keeps the slot as is) if
    /// the selection has since been replaced or removed.
    pub fn complete(&mut self, ticket: AssetTicket, mut asset: DraftAsset) -> bool {
        if ticket.generation != self.generation || self.pending.is_none() {
            tracing::debug!(
                file_name = %ticket.file_name,
                "Ignoring stale asset read"
            );
            return false;
        }
        asset.file_name = ticket.file_name;
        self.pending = None;
        self.asset = Some(asset);
        true
    }

    /// A read failed; clear the pending selection if it is still current.
    pub fn fail(&mut self, ticket: &AssetTicket) {
        if ticket.generation == self.generation {
            self.pending = None;
        }
    }

    /// Detach the asset and invalidate any read in flight.
    pub fn remove(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.asset = None;
    }

    /// Put back an asset loaded from a stored draft.
    pub fn restore(&mut self, asset: DraftAsset) {
        self.generation += 1;
        self.pending = None;
        self.asset = Some(asset);
    }
}

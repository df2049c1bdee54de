use std::time::Duration;

use musicnbrain_core::performance::Confidence;
use musicnbrain_core::readiness::PublishGate;
use musicnbrain_core::roster::RosterConfig;

use crate::repo::{DraftKey, DEFAULT_DRAFT_KEY};

pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;
pub const DEFAULT_SAVED_DISPLAY_MS: u64 = 2000;

/// Timing and storage slot of the draft autosaver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutosaveConfig {
    /// Quiet period after the last edit before the draft is written.
    pub debounce: Duration,
    /// How long the "saved" status is shown before returning to idle.
    pub saved_display: Duration,
    pub draft_key: DraftKey,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            saved_display: Duration::from_millis(DEFAULT_SAVED_DISPLAY_MS),
            draft_key: DraftKey::default(),
        }
    }
}

/// All tunables of the drafting screens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub autosave: AutosaveConfig,
    pub roster: RosterConfig,
}

impl Settings {
    /// Load settings from environment variables with defaults.
    ///
    /// | Env Var                            | Default             |
    /// |------------------------------------|---------------------|
    /// | `MUSICNBRAIN_AUTOSAVE_DEBOUNCE_MS` | `1000`              |
    /// | `MUSICNBRAIN_SAVED_DISPLAY_MS`     | `2000`              |
    /// | `MUSICNBRAIN_DRAFT_KEY`            | `musicnbrain_draft` |
    /// | `MUSICNBRAIN_DEFAULT_CONFIDENCE`   | `high`              |
    /// | `MUSICNBRAIN_PUBLISH_GATE`         | `name_piece`        |
    ///
    /// Values that fail to parse are logged and replaced by the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let debounce_ms = parse_or_default(
            &lookup,
            "MUSICNBRAIN_AUTOSAVE_DEBOUNCE_MS",
            DEFAULT_DEBOUNCE_MS,
            |s| s.parse::<u64>().map_err(|e| e.to_string()),
        );
        let saved_display_ms = parse_or_default(
            &lookup,
            "MUSICNBRAIN_SAVED_DISPLAY_MS",
            DEFAULT_SAVED_DISPLAY_MS,
            |s| s.parse::<u64>().map_err(|e| e.to_string()),
        );
        let draft_key = lookup("MUSICNBRAIN_DRAFT_KEY")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_DRAFT_KEY.to_string());
        let default_confidence = parse_or_default(
            &lookup,
            "MUSICNBRAIN_DEFAULT_CONFIDENCE",
            Confidence::High,
            |s| Confidence::from_str_value(s).map_err(|e| e.to_string()),
        );
        let publish_gate = parse_or_default(
            &lookup,
            "MUSICNBRAIN_PUBLISH_GATE",
            PublishGate::NamePiece,
            |s| PublishGate::from_str_value(s).map_err(|e| e.to_string()),
        );

        Self {
            autosave: AutosaveConfig {
                debounce: Duration::from_millis(debounce_ms),
                saved_display: Duration::from_millis(saved_display_ms),
                draft_key: DraftKey::new(draft_key),
            },
            roster: RosterConfig {
                default_confidence,
                publish_gate,
            },
        }
    }
}

fn parse_or_default<T: std::fmt::Debug>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
    parse: impl Fn(&str) -> Result<T, String>,
) -> T {
    let Some(raw) = lookup(name) else {
        return default;
    };
    match parse(raw.trim()) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(var = name, value = %raw, error = %e, ?default, "Invalid setting, using default");
            default
        }
    }
}

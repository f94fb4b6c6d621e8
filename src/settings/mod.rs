//! Settings for the `schemacfg` binary.
//!
//! Tiers, lowest priority first:
//!
//! 1. built-in defaults
//! 2. project file `./schemacfg.yaml`
//! 3. user file `~/.schemacfg/settings.yaml`
//! 4. environment variables `SCHEMACFG_PREFIX` and `SCHEMACFG_LOG_LEVEL`
//!
//! `SCHEMACFG_SETTINGS` (or `--settings`) names one file that replaces both
//! file tiers.

mod loader;
mod merge;

pub use loader::{SettingsLoader, SettingsPaths, SettingsTier};
pub use merge::{merge_into, merge_tiers};

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;
use crate::store::{DEFAULT_COMMENT_LEADER, DEFAULT_SEPARATOR, Layout};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Prefix used instead of the one the schema declares.
    #[serde(default)]
    pub prefix: Option<String>,

    #[serde(default)]
    pub log_level: LogLevel,

    #[serde(default)]
    pub store: StoreSettings,
}

/// Text format of written stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_separator")]
    pub separator: String,

    #[serde(default = "default_comment_leader")]
    pub comment_leader: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            comment_leader: default_comment_leader(),
        }
    }
}

impl StoreSettings {
    /// Reject a separator or comment leader that the store reader cannot parse back.
    pub fn validate(&self) -> anyhow::Result<()> {
        let sep = &self.separator;
        let assignments = sep.chars().filter(|c| matches!(c, '=' | ':')).count();
        if sep.is_empty()
            || assignments > 1
            || !sep
                .chars()
                .all(|c| matches!(c, '=' | ':' | ' ' | '\t' | '\u{000C}'))
        {
            return Err(anyhow::anyhow!(
                "store separator {:?} must be `=`, `:` or whitespace, optionally padded",
                sep
            ));
        }

        let leader = &self.comment_leader;
        if !leader.starts_with(['#', '!']) || leader.contains(['\n', '\r']) {
            return Err(anyhow::anyhow!(
                "store comment leader {:?} must start with `#` or `!`",
                leader
            ));
        }

        Ok(())
    }
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

fn default_comment_leader() -> String {
    DEFAULT_COMMENT_LEADER.to_string()
}

impl Settings {
    /// Empty layout using the configured separator and comment leader.
    pub fn layout(&self) -> Layout {
        Layout::new()
            .with_separator(&self.store.separator)
            .with_comment_leader(&self.store.comment_leader)
    }
}

//! Tiered settings loading.

use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use std::path::{Path, PathBuf};

use super::Settings;
use super::merge::merge_tiers;
use crate::logging::LogLevel;

pub const PROJECT_FILE: &str = "schemacfg.yaml";
pub const USER_DIR: &str = ".schemacfg";
pub const USER_FILE: &str = "settings.yaml";

pub const ENV_SETTINGS: &str = "SCHEMACFG_SETTINGS";
pub const ENV_PREFIX: &str = "SCHEMACFG_PREFIX";
pub const ENV_LOG_LEVEL: &str = "SCHEMACFG_LOG_LEVEL";

/// Settings tier, lowest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SettingsTier {
    Defaults = 0,
    Project = 1,
    User = 2,
    /// A single file named on the command line or by `SCHEMACFG_SETTINGS`.
    Explicit = 3,
    Environment = 4,
}

impl std::fmt::Display for SettingsTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsTier::Defaults => write!(f, "defaults"),
            SettingsTier::Project => write!(f, "project"),
            SettingsTier::User => write!(f, "user"),
            SettingsTier::Explicit => write!(f, "explicit"),
            SettingsTier::Environment => write!(f, "environment"),
        }
    }
}

/// Candidate settings files.
#[derive(Debug, Clone, Default)]
pub struct SettingsPaths {
    pub project_file: Option<PathBuf>,
    pub user_file: Option<PathBuf>,
    pub explicit_file: Option<PathBuf>,
}

impl SettingsPaths {
    /// Project file in the working directory and user file under the home directory.
    pub fn discover() -> Self {
        Self {
            project_file: Some(PathBuf::from(PROJECT_FILE)),
            user_file: dirs::home_dir().map(|home| home.join(USER_DIR).join(USER_FILE)),
            explicit_file: None,
        }
    }

    pub fn with_explicit(mut self, file: impl Into<PathBuf>) -> Self {
        self.explicit_file = Some(file.into());
        self
    }
}

/// Loads [`Settings`] and remembers which tiers contributed.
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    settings: Settings,
    applied: Vec<(SettingsTier, Option<PathBuf>)>,
}

impl SettingsLoader {
    /// Load from the discovered paths and the process environment.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut paths = SettingsPaths::discover();
        if let Some(file) = explicit {
            paths = paths.with_explicit(file);
        }
        Self::load_with(paths, |name| std::env::var(name).ok())
    }

    /// Load from `paths`, reading variables through `env`.
    pub fn load_with(paths: SettingsPaths, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut tiers: Vec<Value> = vec![serde_json::to_value(Settings::default())?];
        let mut applied = vec![(SettingsTier::Defaults, None)];

        let explicit = paths
            .explicit_file
            .clone()
            .or_else(|| env(ENV_SETTINGS).map(PathBuf::from));

        if let Some(file) = explicit {
            if !file.exists() {
                return Err(anyhow!("settings file {} does not exist", file.display()));
            }
            tiers.push(read_tier(&file)?);
            applied.push((SettingsTier::Explicit, Some(file)));
        } else {
            for (tier, file) in [
                (SettingsTier::Project, paths.project_file),
                (SettingsTier::User, paths.user_file),
            ] {
                if let Some(file) = file.filter(|f| f.exists()) {
                    tiers.push(read_tier(&file)?);
                    applied.push((tier, Some(file)));
                }
            }
        }

        let mut settings: Settings =
            serde_json::from_value(merge_tiers(tiers)).context("invalid settings")?;

        let mut from_env = false;
        if let Some(prefix) = env(ENV_PREFIX) {
            settings.prefix = Some(prefix);
            from_env = true;
        }
        if let Some(level) = env(ENV_LOG_LEVEL) {
            settings.log_level = level
                .parse::<LogLevel>()
                .map_err(|e| anyhow!(e))
                .with_context(|| format!("invalid {}", ENV_LOG_LEVEL))?;
            from_env = true;
        }
        if from_env {
            applied.push((SettingsTier::Environment, None));
        }
        settings.store.validate().context("invalid settings")?;

        Ok(Self { settings, applied })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn into_settings(self) -> Settings {
        self.settings
    }

    /// Tiers that contributed, lowest first, with the file each came from.
    pub fn applied(&self) -> &[(SettingsTier, Option<PathBuf>)] {
        &self.applied
    }
}

fn read_tier(file: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("reading settings file {}", file.display()))?;
    let value: Value = serde_yaml::from_str(&content)
        .with_context(|| format!("parsing settings file {}", file.display()))?;
    Ok(value)
}

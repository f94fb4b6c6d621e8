//! Integration tests for tiered settings loading.
//!
//! Tiers are exercised with real files in temporary directories and an
//! injected environment.

use schemacfg::logging::LogLevel;
use schemacfg::settings::{Settings, SettingsLoader, SettingsPaths, SettingsTier};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn paths(project: Option<PathBuf>, user: Option<PathBuf>) -> SettingsPaths {
    SettingsPaths {
        project_file: project,
        user_file: user,
        explicit_file: None,
    }
}

fn env_of(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| vars.get(name).cloned()
}

mod file_tiers {
    use super::*;

    #[test]
    fn test_user_overrides_project_field_by_field() {
        let temp = TempDir::new().unwrap();
        let project = write(
            &temp,
            "project.yaml",
            "prefix: app\nstore:\n  separator: \"=\"\n  comment_leader: \"## \"\n",
        );
        let user = write(&temp, "user.yaml", "log_level: debug\nstore:\n  separator: \": \"\n");

        let loader = SettingsLoader::load_with(paths(Some(project), Some(user)), env_of(&[])).unwrap();
        let settings = loader.settings();
        assert_eq!(settings.prefix.as_deref(), Some("app"));
        assert_eq!(settings.log_level, LogLevel::Debug);
        assert_eq!(settings.store.separator, ": ");
        assert_eq!(settings.store.comment_leader, "## ");

        let tiers: Vec<SettingsTier> = loader.applied().iter().map(|(t, _)| *t).collect();
        assert_eq!(
            tiers,
            vec![SettingsTier::Defaults, SettingsTier::Project, SettingsTier::User]
        );
    }

    #[test]
    fn test_missing_files_are_skipped() {
        let temp = TempDir::new().unwrap();
        let loader = SettingsLoader::load_with(
            paths(Some(temp.path().join("absent.yaml")), None),
            env_of(&[]),
        )
        .unwrap();
        assert_eq!(loader.settings(), &Settings::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let project = write(&temp, "project.yaml", "log_level: [unclosed\n");
        let result = SettingsLoader::load_with(paths(Some(project), None), env_of(&[]));
        assert!(result.is_err());
    }

    #[test]
    fn test_unreadable_store_format_is_an_error() {
        let temp = TempDir::new().unwrap();
        for store in [
            "store:\n  comment_leader: \"// \"\n",
            "store:\n  separator: \" -> \"\n",
        ] {
            let project = write(&temp, "project.yaml", store);
            let result = SettingsLoader::load_with(paths(Some(project), None), env_of(&[]));
            assert!(result.is_err(), "{store}");
        }
    }

    #[test]
    fn test_unknown_log_level_in_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let project = write(&temp, "project.yaml", "log_level: chatty\n");
        let result = SettingsLoader::load_with(paths(Some(project), None), env_of(&[]));
        assert!(result.is_err());
    }
}

mod explicit_and_env {
    use super::*;

    #[test]
    fn test_explicit_file_replaces_file_tiers() {
        let temp = TempDir::new().unwrap();
        let project = write(&temp, "project.yaml", "prefix: project\n");
        let explicit = write(&temp, "explicit.yaml", "log_level: error\n");

        let loader = SettingsLoader::load_with(
            paths(Some(project), None).with_explicit(&explicit),
            env_of(&[]),
        )
        .unwrap();
        assert_eq!(loader.settings().prefix, None);
        assert_eq!(loader.settings().log_level, LogLevel::Error);
        assert_eq!(
            loader.applied().last(),
            Some(&(SettingsTier::Explicit, Some(explicit)))
        );
    }

    #[test]
    fn test_explicit_file_from_environment() {
        let temp = TempDir::new().unwrap();
        let explicit = write(&temp, "env.yaml", "prefix: from_file\n");
        let file = explicit.to_string_lossy().to_string();
        let loader =
            SettingsLoader::load_with(paths(None, None), env_of(&[("SCHEMACFG_SETTINGS", file.as_str())]))
                .unwrap();
        assert_eq!(loader.settings().prefix.as_deref(), Some("from_file"));
    }

    #[test]
    fn test_environment_beats_files() {
        let temp = TempDir::new().unwrap();
        let project = write(&temp, "project.yaml", "prefix: project\nlog_level: error\n");
        let loader = SettingsLoader::load_with(
            paths(Some(project), None),
            env_of(&[("SCHEMACFG_PREFIX", "env"), ("SCHEMACFG_LOG_LEVEL", "trace")]),
        )
        .unwrap();
        assert_eq!(loader.settings().prefix.as_deref(), Some("env"));
        assert_eq!(loader.settings().log_level, LogLevel::Trace);
    }

    #[test]
    fn test_layout_uses_store_settings() {
        let mut settings = Settings::default();
        settings.store.separator = "=".to_string();
        let layout = settings.layout();
        assert_eq!(layout.separator(), "=");
        assert_eq!(layout.comment_leader(), "# ");
    }
}

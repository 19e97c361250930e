//! Unit tests for config module
//!
//! In-memory parsing, defaults, and path lookup. Filesystem loading lives in
//! `tests/config.rs`.

#![allow(clippy::unwrap_used)]

use crate::{
    PawError,
    config::{AudioConfig, Config, ConfigPaths, LogLevel},
};

#[test]
fn empty_toml_gives_defaults() {
    let config = Config::parse("", None).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn default_serializes_both_sections() {
    let toml_str = toml::to_string(&Config::default()).unwrap();
    assert!(toml_str.contains("[general]"));
    assert!(toml_str.contains("[audio]"));
    assert!(!toml_str.contains("server"));
}

#[test]
fn partial_audio_section_keeps_other_defaults() {
    let config = Config::parse(
        r#"
        [general]
        log_level = "debug"

        [audio]
        server = "unix:/run/user/1000/pulse/native"
        max_volume = 100.0
    "#,
        None,
    )
    .unwrap();

    assert_eq!(config.general.log_level, LogLevel::Debug);
    assert_eq!(
        config.audio.server.as_deref(),
        Some("unix:/run/user/1000/pulse/native")
    );
    assert_eq!(config.audio.max_volume, 100.0);
    assert_eq!(config.audio.client_name, AudioConfig::default().client_name);
    assert_eq!(config.audio.request_timeout_ms, 5000);
}

#[test]
fn unknown_fields_are_ignored() {
    let config = Config::parse(
        r#"
        [general]
        log_level = "warn"
        theme = "dark"

        [unknown_section]
        some_field = 1
    "#,
        None,
    )
    .unwrap();
    assert_eq!(config.general.log_level, LogLevel::Warn);
}

#[test]
fn invalid_syntax_reports_location() {
    let error = Config::parse("[general\nlog_level = ", None).unwrap_err();
    assert!(matches!(error, PawError::TomlParse { ref location, .. } if location == "string"));
}

#[test]
fn unknown_log_level_is_a_parse_error() {
    let error = Config::parse("[general]\nlog_level = \"loud\"", None).unwrap_err();
    assert!(matches!(error, PawError::TomlParse { .. }));
}

#[test]
fn negative_step_fails_validation() {
    let error = Config::parse("[audio]\nvolume_step = -5.0", None).unwrap_err();
    assert!(matches!(error, PawError::Config { ref field, .. } if field == "audio.volume_step"));
}

#[test]
fn get_by_path_walks_sections() {
    let config = Config::default();

    assert_eq!(
        config.get_by_path("audio.client_name").unwrap(),
        toml::Value::String("pawpulse".to_string())
    );
    assert_eq!(
        config.get_by_path("general.log_level").unwrap(),
        toml::Value::String("info".to_string())
    );
    assert!(config.get_by_path("audio").unwrap().is_table());
}

#[test]
fn get_by_path_rejects_missing_keys() {
    let config = Config::default();
    assert!(config.get_by_path("audio.server").is_err());
    assert!(config.get_by_path("audio.client_name.deeper").is_err());
    assert!(config.get_by_path("nowhere").is_err());
}

#[test]
fn schema_describes_audio_section() {
    let schema = serde_json::to_value(Config::schema()).unwrap();
    let audio = &schema["$defs"]["AudioConfig"]["properties"];
    assert!(audio.get("max_volume").is_some());
    assert!(audio.get("request_timeout_ms").is_some());
}

#[test]
fn config_dir_prefers_xdg() {
    let dir = ConfigPaths::config_dir_from(Some("/xdg"), Some("/home/me")).unwrap();
    assert_eq!(dir, std::path::PathBuf::from("/xdg/pawpulse"));
}

#[test]
fn config_dir_falls_back_to_home() {
    let dir = ConfigPaths::config_dir_from(Some(""), Some("/home/me")).unwrap();
    assert_eq!(dir, std::path::PathBuf::from("/home/me/.config/pawpulse"));
    assert!(ConfigPaths::config_dir_from(None, None).is_err());
}

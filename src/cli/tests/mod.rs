//! Unit tests for CLI module
//!
//! Commands run against the in-memory audio backend; nothing here needs an
//! audio server.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use toml::Value;

use crate::{
    cli::{
        CliError, CliService,
        formatting::{format_sink_state, format_toml_value},
    },
    config::Config,
    services::pulse::{AudioError, AudioSession, SessionState, testing::FakeBackend},
};

const SINK: &str = FakeBackend::DEFAULT_SINK;

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn service_with(backend: Arc<FakeBackend>, config: Config) -> (CliService, Arc<AudioSession>) {
    let session = Arc::new(AudioSession::with_shared_backend(backend));
    (CliService::with_session(config, session.clone()), session)
}

fn service(backend: Arc<FakeBackend>) -> CliService {
    service_with(backend, Config::default()).0
}

#[test]
fn format_toml_value_scalars() {
    assert_eq!(
        format_toml_value(&Value::String("hello".to_string())),
        "\"hello\""
    );
    assert_eq!(format_toml_value(&Value::Integer(-123)), "-123");
    assert_eq!(format_toml_value(&Value::Float(-2.5)), "-2.5");
    assert_eq!(format_toml_value(&Value::Boolean(true)), "true");
}

#[test]
fn format_toml_value_collections_show_size() {
    let array = Value::Array(vec![Value::Integer(1), Value::Integer(2)]);
    assert_eq!(format_toml_value(&array), "[2]");

    let mut table = toml::map::Map::new();
    table.insert("key".to_string(), Value::Integer(42));
    assert_eq!(format_toml_value(&Value::Table(table)), "{1}");
    assert_eq!(
        format_toml_value(&Value::Table(toml::map::Map::new())),
        "{0}"
    );
}

#[test]
fn sink_state_rounds_and_marks_mute() {
    assert_eq!(format_sink_state("usb", 39.6, false), "usb: 40%");
    assert_eq!(format_sink_state("usb", 0.0, true), "usb: 0% (muted)");
}

#[test]
fn registry_lists_both_categories() {
    let cli = service(Arc::new(FakeBackend::new()));
    let listed = cli.list_all();

    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].0, "audio");
    assert_eq!(listed[0].1, args(&["info", "mute", "sink", "volume", "watch"]));
    assert_eq!(listed[1].0, "config");
    assert_eq!(listed[1].1, args(&["get", "schema"]));
}

#[test]
fn help_does_not_connect() {
    let backend = Arc::new(FakeBackend::new());
    let (cli, session) = service_with(backend.clone(), Config::default());

    let help = cli.execute_command("help", "", &[]).unwrap();
    assert!(help.contains("volume"));
    let audio_help = cli.execute_command("audio", "", &[]).unwrap();
    assert!(audio_help.contains("@default"));

    assert_eq!(session.state(), SessionState::Uninitialized);
    assert_eq!(backend.connect_count(), 0);
}

#[test]
fn unknown_command_is_reported() {
    let cli = service(Arc::new(FakeBackend::new()));
    assert!(matches!(
        cli.execute_command("audio", "balance", &[]),
        Err(CliError::CommandNotFound(_))
    ));
    assert!(matches!(
        cli.execute_command("help", "video", &[]),
        Err(CliError::CommandNotFound(_))
    ));
}

#[test]
fn argument_count_is_validated() {
    let cli = service(Arc::new(FakeBackend::new()));
    assert!(matches!(
        cli.execute_command("audio", "volume", &args(&["@default"])),
        Err(CliError::InvalidArguments(_))
    ));
    assert!(matches!(
        cli.execute_command("audio", "sink", &args(&["extra"])),
        Err(CliError::InvalidArguments(_))
    ));
}

#[test]
fn sink_prints_default_sink() {
    let cli = service(Arc::new(FakeBackend::new()));
    assert_eq!(cli.execute_command("audio", "sink", &[]).unwrap(), SINK);
}

#[test]
fn missing_default_sink_is_not_found() {
    let cli = service(Arc::new(FakeBackend::empty()));
    assert!(matches!(
        cli.execute_command("audio", "info", &[]),
        Err(CliError::Audio(AudioError::SinkNotFound(ref name))) if name.is_empty()
    ));
}

#[test]
fn info_defaults_to_default_sink() {
    let cli = service(Arc::new(FakeBackend::new()));
    let output = cli.execute_command("audio", "info", &[]).unwrap();
    assert_eq!(output, format!("{SINK}: 50%"));
}

#[test]
fn info_on_unknown_sink_fails() {
    let cli = service(Arc::new(FakeBackend::new()));
    assert!(matches!(
        cli.execute_command("audio", "info", &args(&["nope"])),
        Err(CliError::Audio(AudioError::SinkNotFound(_)))
    ));
}

#[test]
fn relative_volume_is_clamped_to_configured_ceiling() {
    let backend = Arc::new(FakeBackend::new());
    let mut config = Config::default();
    config.audio.max_volume = 60.0;
    let (cli, _session) = service_with(backend.clone(), config);

    cli.execute_command("audio", "volume", &args(&["@default", "+25"]))
        .unwrap();

    let info = cli.execute_command("audio", "info", &[]).unwrap();
    assert_eq!(info, format!("{SINK}: 60%"));
}

#[test]
fn relative_raise_keeps_boost_above_ceiling() {
    let backend = Arc::new(FakeBackend::new());
    backend.add_sink("boosted", &[131072, 131072], false);
    let cli = service(backend.clone());

    cli.execute_command("audio", "volume", &args(&["boosted", "+5"]))
        .unwrap();

    assert_eq!(backend.raw_volumes("boosted"), Some(vec![131072, 131072]));
}

#[test]
fn absolute_volume_is_applied_to_two_channels() {
    let backend = Arc::new(FakeBackend::new());
    let cli = service(backend.clone());

    let output = cli
        .execute_command("audio", "volume", &args(&[SINK, "100"]))
        .unwrap();

    assert_eq!(output, format!("Set volume of {SINK} to 100%"));
    assert_eq!(backend.raw_volumes(SINK), Some(vec![65536, 65536]));
}

#[test]
fn bare_minus_steps_down_by_configured_step() {
    let backend = Arc::new(FakeBackend::new());
    let cli = service(backend);

    cli.execute_command("audio", "volume", &args(&["@default", "-"]))
        .unwrap();

    let info = cli.execute_command("audio", "info", &[]).unwrap();
    assert_eq!(info, format!("{SINK}: 45%"));
}

#[test]
fn mute_toggles_by_default() {
    let cli = service(Arc::new(FakeBackend::new()));

    assert_eq!(
        cli.execute_command("audio", "mute", &args(&["@default"]))
            .unwrap(),
        format!("Muted {SINK}")
    );
    assert_eq!(
        cli.execute_command("audio", "mute", &args(&["@default"]))
            .unwrap(),
        format!("Unmuted {SINK}")
    );
    assert_eq!(
        cli.execute_command("audio", "mute", &args(&["@default", "on"]))
            .unwrap(),
        format!("Muted {SINK}")
    );
}

#[test]
fn unreachable_server_surfaces_connect_error() {
    let backend = Arc::new(FakeBackend::new());
    backend.refuse_connections(true);
    let cli = service(backend);

    assert!(matches!(
        cli.execute_command("audio", "sink", &[]),
        Err(CliError::Audio(AudioError::ConnectFailed(_)))
    ));
}

#[test]
fn config_get_reads_effective_config() {
    let cli = service(Arc::new(FakeBackend::new()));
    assert_eq!(
        cli.execute_command("config", "get", &args(&["audio.max_volume"]))
            .unwrap(),
        "audio.max_volume: 150"
    );
    assert!(matches!(
        cli.execute_command("config", "get", &args(&["audio.bogus"])),
        Err(CliError::ConfigError(_))
    ));
}

#[test]
fn config_schema_is_json() {
    let cli = service(Arc::new(FakeBackend::new()));
    let schema = cli.execute_command("config", "schema", &[]).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&schema).unwrap();
    assert!(parsed.get("properties").is_some());
}

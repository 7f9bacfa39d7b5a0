//! Settings resolution tests
//!
//! These tests mutate process environment variables, so every test is
//! `#[serial]`.

use std::io::Write;

use runify::config::*;
use runify::workflow::MissingAnalysisPolicy;
use runify::RunifyError;
use serial_test::serial;
use tempfile::NamedTempFile;

const ALL_VARS: &[&str] = &[
    ENV_CLIENT_ID,
    ENV_CLIENT_SECRET,
    ENV_REDIRECT_URI,
    ENV_SCOPES,
    ENV_USERNAME,
    ENV_ACCESS_TOKEN,
    ENV_REFRESH_TOKEN,
    ENV_LOWER_BPM,
    ENV_UPPER_BPM,
    ENV_ON_MISSING_ANALYSIS,
    runify_common::config::CONFIG_ENV_VAR,
];

fn clear_env() {
    for var in ALL_VARS {
        std::env::remove_var(var);
    }
}

fn set_required_env() {
    std::env::set_var(ENV_CLIENT_ID, "client-1");
    std::env::set_var(ENV_CLIENT_SECRET, "secret");
    std::env::set_var(ENV_REDIRECT_URI, "http://localhost:8888/callback");
    std::env::set_var(ENV_USERNAME, "runner42");
}

fn parse(toml_text: &str) -> RunifyConfig {
    toml::from_str(toml_text).unwrap()
}

#[test]
#[serial]
fn test_defaults_with_required_env() {
    clear_env();
    set_required_env();

    let settings = Settings::resolve(&RunifyConfig::default()).unwrap();

    assert_eq!(settings.username, "runner42");
    assert_eq!(settings.credentials.client_id, "client-1");
    assert_eq!(settings.band.lower_bound(), 150.0);
    assert_eq!(settings.band.upper_bound(), 180.0);
    assert_eq!(settings.collector.concurrency, 1);
    assert_eq!(settings.collector.on_missing_analysis, MissingAnalysisPolicy::Skip);
    assert_eq!(settings.client.requests_per_second, 10);
    assert_eq!(settings.client.base_url, "https://api.spotify.com/v1");
    assert_eq!(settings.accounts_base_url, "https://accounts.spotify.com");
    assert_eq!(settings.credentials.scopes, DEFAULT_SCOPES);
    assert!(settings.access_token.is_none());
    assert!(settings.refresh_token.is_none());

    clear_env();
}

#[test]
#[serial]
fn test_all_missing_credentials_reported_together() {
    clear_env();

    let err = Settings::resolve(&RunifyConfig::default()).unwrap_err();
    let message = err.to_string();

    assert!(matches!(err, RunifyError::Config(_)));
    for name in ["client_id", "client_secret", "redirect_uri", "username"] {
        assert!(message.contains(name), "{} missing from: {}", name, message);
    }
}

#[test]
#[serial]
fn test_blank_env_value_counts_as_unset() {
    clear_env();
    set_required_env();
    std::env::set_var(ENV_USERNAME, "   ");

    let err = Settings::resolve(&RunifyConfig::default()).unwrap_err();
    assert!(err.to_string().contains("username"));
    assert!(!err.to_string().contains("client_id"));

    clear_env();
}

#[test]
#[serial]
fn test_toml_supplies_credentials() {
    clear_env();
    let config = parse(
        r#"
        [auth]
        client_id = "toml-client"
        client_secret = "toml-secret"
        redirect_uri = "http://localhost:8888/callback"
        username = "tomluser"
        refresh_token = "toml-refresh"
        scopes = ["playlist-modify-public"]
        "#,
    );

    let settings = Settings::resolve(&config).unwrap();

    assert_eq!(settings.credentials.client_id, "toml-client");
    assert_eq!(settings.username, "tomluser");
    assert_eq!(settings.refresh_token.as_deref(), Some("toml-refresh"));
    assert_eq!(settings.credentials.scopes, vec!["playlist-modify-public"]);
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    clear_env();
    set_required_env();
    std::env::set_var(ENV_LOWER_BPM, "160");
    std::env::set_var(ENV_ON_MISSING_ANALYSIS, "abort");
    std::env::set_var(ENV_SCOPES, "playlist-read-private, playlist-modify-private");
    let config = parse(
        r#"
        [auth]
        username = "tomluser"

        [cadence]
        lower_bound = 140.0
        upper_bound = 175.0

        [collector]
        on_missing_analysis = "skip"
        concurrency = 4
        "#,
    );

    let settings = Settings::resolve(&config).unwrap();

    assert_eq!(settings.username, "runner42");
    assert_eq!(settings.band.lower_bound(), 160.0);
    assert_eq!(settings.band.upper_bound(), 175.0);
    assert_eq!(settings.collector.on_missing_analysis, MissingAnalysisPolicy::Abort);
    assert_eq!(settings.collector.concurrency, 4);
    assert_eq!(
        settings.credentials.scopes,
        vec!["playlist-read-private", "playlist-modify-private"]
    );

    clear_env();
}

#[test]
#[serial]
fn test_invalid_band_is_rejected() {
    clear_env();
    set_required_env();

    std::env::set_var(ENV_LOWER_BPM, "190");
    assert!(matches!(
        Settings::resolve(&RunifyConfig::default()),
        Err(RunifyError::Config(_))
    ));

    std::env::set_var(ENV_LOWER_BPM, "fast");
    let err = Settings::resolve(&RunifyConfig::default()).unwrap_err();
    assert!(err.to_string().contains(ENV_LOWER_BPM));

    clear_env();
}

#[test]
#[serial]
fn test_unknown_policy_is_rejected() {
    clear_env();
    set_required_env();
    std::env::set_var(ENV_ON_MISSING_ANALYSIS, "ignore");

    assert!(matches!(
        Settings::resolve(&RunifyConfig::default()),
        Err(RunifyError::Config(_))
    ));

    clear_env();
}

#[test]
#[serial]
fn test_zero_concurrency_is_rejected() {
    clear_env();
    set_required_env();
    let config = parse("[collector]\nconcurrency = 0\n");

    assert!(Settings::resolve(&config).is_err());

    clear_env();
}

#[test]
#[serial]
fn test_access_token_only_from_environment() {
    clear_env();
    set_required_env();
    std::env::set_var(ENV_ACCESS_TOKEN, "preissued");

    let settings = Settings::resolve(&RunifyConfig::default()).unwrap();
    assert_eq!(settings.access_token.as_deref(), Some("preissued"));

    clear_env();
}

#[test]
#[serial]
fn test_config_file_from_env_var() {
    clear_env();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[logging]\nlevel = \"debug\"\n\n[service]\napi_base_url = \"http://localhost:9000/v1\"\ntimeout_secs = 5"
    )
    .unwrap();
    std::env::set_var(runify_common::config::CONFIG_ENV_VAR, file.path());

    let (config, path) = load_runify_config().unwrap();
    assert_eq!(path.as_deref(), Some(file.path()));
    assert_eq!(config.logging.level, "debug");

    set_required_env();
    let settings = Settings::resolve(&config).unwrap();
    assert_eq!(settings.client.base_url, "http://localhost:9000/v1");
    assert_eq!(settings.client.timeout.as_secs(), 5);

    clear_env();
}

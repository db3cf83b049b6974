//! Configuration resolution tests
//!
//! Covers the API base priority order (CLI → ENV → TOML → default) and
//! graceful degradation on missing or malformed TOML files.
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that touch the environment are marked with #[serial].

use callgrade_common::config::{resolve_api_base, TomlConfig, DEFAULT_API_BASE};
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

const TEST_ENV: &str = "CALLGRADE_TEST_API_BASE";

fn toml_with_base(base: &str) -> TomlConfig {
    TomlConfig {
        api_base: Some(base.to_string()),
        ..Default::default()
    }
}

#[test]
#[serial]
fn test_default_when_nothing_configured() {
    env::remove_var(TEST_ENV);
    let base = resolve_api_base(None, TEST_ENV, &TomlConfig::default());
    assert_eq!(base, DEFAULT_API_BASE);
    assert_eq!(base, "http://127.0.0.1:8000");
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    env::set_var(TEST_ENV, "http://env-host:8000/");
    let base = resolve_api_base(None, TEST_ENV, &toml_with_base("http://toml-host:8000"));
    env::remove_var(TEST_ENV);
    assert_eq!(base, "http://env-host:8000");
}

#[test]
#[serial]
fn test_cli_overrides_env() {
    env::set_var(TEST_ENV, "http://env-host:8000");
    let base = resolve_api_base(
        Some("https://cli-host"),
        TEST_ENV,
        &toml_with_base("http://toml-host:8000"),
    );
    env::remove_var(TEST_ENV);
    assert_eq!(base, "https://cli-host");
}

#[test]
#[serial]
fn test_blank_env_falls_through_to_toml() {
    env::set_var(TEST_ENV, "  ");
    let base = resolve_api_base(None, TEST_ENV, &toml_with_base("http://toml-host:8000"));
    env::remove_var(TEST_ENV);
    assert_eq!(base, "http://toml-host:8000");
}

#[test]
fn test_load_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "api_base = \"http://grader.local:8000\"\n\n[logging]\nlevel = \"warn\"\n",
    )
    .unwrap();

    let config = TomlConfig::load(&path).unwrap();
    assert_eq!(config.api_base.as_deref(), Some("http://grader.local:8000"));
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn test_malformed_config_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "api_base = [not toml").unwrap();

    assert!(TomlConfig::load(&path).is_err());
    let (config, warning) = TomlConfig::load_or_default(Some(&path));
    assert!(config.api_base.is_none());
    assert_eq!(config.logging.level, "info");

    let warning = warning.expect("malformed config should produce a warning");
    assert!(warning.starts_with("Ignoring config file"));
    assert!(warning.contains("config.toml"));
}

#[test]
fn test_missing_explicit_config_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let (config, warning) = TomlConfig::load_or_default(Some(&dir.path().join("absent.toml")));
    assert!(config.api_base.is_none());
    assert!(warning.is_some_and(|w| w.contains("absent.toml") && w.contains("not found")));
}

#[test]
fn test_valid_explicit_config_has_no_warning() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

    let (config, warning) = TomlConfig::load_or_default(Some(&path));
    assert_eq!(config.logging.level, "debug");
    assert!(warning.is_none());
}

//! Configuration resolution tests
//!
//! Covers the CLI → environment → TOML → default priority order and graceful
//! fallback when the TOML file is missing or broken.
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate CAROMETRO_* variables are marked with #[serial].

use carometro_common::config::{
    load_toml_config, load_toml_config_or_default, CliOverrides, CompiledDefaults,
    ServiceConfig, TomlConfig, ENV_CONFIG, ENV_HOST, ENV_LOG_LEVEL, ENV_MAX_UPLOAD_BYTES,
    ENV_PHOTOS_DIR, ENV_PORT,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

fn clear_env() {
    for name in [
        ENV_HOST,
        ENV_PORT,
        ENV_PHOTOS_DIR,
        ENV_MAX_UPLOAD_BYTES,
        ENV_CONFIG,
        ENV_LOG_LEVEL,
    ] {
        env::remove_var(name);
    }
}

fn toml_with_port(port: u16) -> TomlConfig {
    TomlConfig {
        port: Some(port),
        photos_dir: Some(PathBuf::from("/toml/photos")),
        ..TomlConfig::default()
    }
}

#[test]
#[serial]
fn test_defaults_when_nothing_configured() {
    clear_env();

    let config = ServiceConfig::resolve_with(
        &CliOverrides::default(),
        &TomlConfig::default(),
        &CompiledDefaults::default(),
    );

    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 5780);
    assert_eq!(config.photos_dir, PathBuf::from("public/photos"));
    assert_eq!(config.log_level, "info");
    assert_eq!(config.bind_address(), "127.0.0.1:5780");
}

#[test]
#[serial]
fn test_toml_overrides_defaults() {
    clear_env();

    let config = ServiceConfig::resolve_with(
        &CliOverrides::default(),
        &toml_with_port(6000),
        &CompiledDefaults::default(),
    );

    assert_eq!(config.port, 6000);
    assert_eq!(config.photos_dir, PathBuf::from("/toml/photos"));
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    clear_env();
    env::set_var(ENV_PORT, "6100");
    env::set_var(ENV_PHOTOS_DIR, "/env/photos");

    let config = ServiceConfig::resolve_with(
        &CliOverrides::default(),
        &toml_with_port(6000),
        &CompiledDefaults::default(),
    );

    assert_eq!(config.port, 6100);
    assert_eq!(config.photos_dir, PathBuf::from("/env/photos"));

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_env() {
    clear_env();
    env::set_var(ENV_PORT, "6100");

    let cli = CliOverrides {
        port: Some(6200),
        ..CliOverrides::default()
    };
    let config =
        ServiceConfig::resolve_with(&cli, &toml_with_port(6000), &CompiledDefaults::default());

    assert_eq!(config.port, 6200);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_env_value_falls_through() {
    clear_env();
    env::set_var(ENV_PORT, "not-a-port");

    let config = ServiceConfig::resolve_with(
        &CliOverrides::default(),
        &toml_with_port(6000),
        &CompiledDefaults::default(),
    );

    assert_eq!(config.port, 6000);

    clear_env();
}

#[test]
#[serial]
fn test_resolve_reads_config_named_on_cli() {
    clear_env();
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.toml");
    std::fs::write(
        &path,
        "host = \"0.0.0.0\"\nmax_upload_bytes = 1024\n[logging]\nlevel = \"debug\"\n",
    )
    .unwrap();

    let cli = CliOverrides {
        config: Some(path),
        ..CliOverrides::default()
    };
    let config = ServiceConfig::resolve(&cli);

    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.max_upload_bytes, 1024);
    assert_eq!(config.log_level, "debug");
}

#[test]
fn test_missing_toml_falls_back_to_empty() {
    let tmp = TempDir::new().unwrap();
    let config = load_toml_config_or_default(&tmp.path().join("absent.toml"));
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_broken_toml_is_error_but_or_default_recovers() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("broken.toml");
    std::fs::write(&path, "port = \"five\"").unwrap();

    assert!(load_toml_config(&path).is_err());
    assert_eq!(load_toml_config_or_default(&path), TomlConfig::default());
}

//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.
//! Env-var tests run serially since the process environment is shared.

use std::fs;
use std::path::PathBuf;

use serial_test::serial;
use sierpinski::config::{AppConfig, ExpansionBackend};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sierpinski_config_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
#[serial]
fn test_default_file_matches_built_in_defaults() {
    let from_file = AppConfig::load().unwrap();
    let built_in = AppConfig::default();

    assert_eq!(from_file.window.title, built_in.window.title);
    assert_eq!(from_file.window.width, built_in.window.width);
    assert_eq!(from_file.window.height, built_in.window.height);
    assert_eq!(from_file.fractal.initial_depth, built_in.fractal.initial_depth);
    assert_eq!(from_file.fractal.scale, built_in.fractal.scale);
    assert_eq!(from_file.camera.eye, built_in.camera.eye);
    assert_eq!(from_file.camera.rotation_speed, built_in.camera.rotation_speed);
    assert_eq!(from_file.rendering.background_color, built_in.rendering.background_color);
    assert_eq!(from_file.rendering.expansion, built_in.rendering.expansion);
}

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("SPK_WINDOW__TITLE", "Test From Env");
    let config = AppConfig::load();
    std::env::remove_var("SPK_WINDOW__TITLE");

    assert_eq!(config.unwrap().window.title, "Test From Env");
}

#[test]
#[serial]
fn test_env_override_nested_values() {
    std::env::set_var("SPK_FRACTAL__INITIAL_DEPTH", "5");
    std::env::set_var("SPK_RENDERING__EXPANSION", "cpu");
    let config = AppConfig::load();
    std::env::remove_var("SPK_FRACTAL__INITIAL_DEPTH");
    std::env::remove_var("SPK_RENDERING__EXPANSION");

    let config = config.unwrap();
    assert_eq!(config.fractal.initial_depth, 5);
    assert_eq!(config.rendering.expansion, ExpansionBackend::Cpu);
    assert_eq!(config.frame_settings().initial_depth, 5);
}

#[test]
#[serial]
fn test_user_file_overrides_default_file() {
    let dir = scratch_dir("user");
    fs::write(
        dir.join("default.toml"),
        "[window]\ntitle = \"Default\"\nwidth = 640\n",
    )
    .unwrap();
    fs::write(dir.join("user.toml"), "[window]\ntitle = \"User\"\n").unwrap();

    let config = AppConfig::load_from(&dir).unwrap();
    assert_eq!(config.window.title, "User");
    assert_eq!(config.window.width, 640);
    // Missing keys fall back to built-in defaults
    assert_eq!(config.window.height, 700);
    assert_eq!(config.fractal.initial_depth, 3);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
#[serial]
fn test_missing_directory_uses_defaults() {
    let dir = scratch_dir("empty");
    let config = AppConfig::load_from(dir.join("does_not_exist")).unwrap();
    assert_eq!(config.window.title, "Sierpinski Pyramid");
    assert!(config.rendering.shader_dir.is_none());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
#[serial]
fn test_invalid_value_is_an_error() {
    let dir = scratch_dir("invalid");
    fs::write(dir.join("default.toml"), "[rendering]\nexpansion = \"quantum\"\n").unwrap();

    let err = AppConfig::load_from(&dir).unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));

    fs::remove_dir_all(&dir).unwrap();
}

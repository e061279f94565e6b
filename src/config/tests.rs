//! Unit tests for configuration module
//!
//! Tests parsing, validation, file round-trips and merging.

use super::*;
use anyhow::Result;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_default_configuration_is_valid() {
    let config = ShellConfig::default();

    assert!(config.validate().is_ok());
    assert_eq!((config.window.width, config.window.height), (800, 600));
    assert_eq!(config.render.backend, "auto");
    assert!(!config.general.debug);
}

#[test]
fn test_configuration_from_file() -> Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("gridshell.toml");

    let test_config = r##"
[window]
width = 1024
height = 768
title = "panel"
app_id = "org.example.Panel"
min_width = 320

[render]
backend = "vulkan"
present_mode = "fifo"
clear_color = "#102030"

[general]
debug = true
"##;
    fs::write(&file_path, test_config)?;

    let config = ShellConfig::load(&file_path)?;
    assert_eq!(config.window.width, 1024);
    assert_eq!(config.window.title, "panel");
    assert_eq!(config.window.min_width, 320);
    assert_eq!(config.window.min_height, 0);
    assert_eq!(config.render.present_mode, "fifo");
    assert!(config.general.debug);

    Ok(())
}

#[test]
fn test_partial_configuration_uses_defaults() -> Result<()> {
    let config: ShellConfig = toml::from_str(
        r#"
[general]
debug = true
"#,
    )?;

    assert_eq!(config.window, WindowConfig::default());
    assert_eq!(config.render, RenderConfig::default());
    assert!(config.general.debug);
    Ok(())
}

#[test]
fn test_missing_file_fails() {
    let dir = tempdir().unwrap();
    let result = ShellConfig::load(dir.path().join("absent.toml"));
    assert!(result.is_err());
}

#[test]
fn test_malformed_toml_fails() -> Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("broken.toml");
    fs::write(&file_path, "[window\nwidth = ")?;

    assert!(ShellConfig::load(&file_path).is_err());
    Ok(())
}

#[test]
fn test_validation_rejects_bad_values() {
    let mut config = ShellConfig::default();
    config.window.width = 0;
    assert!(config.validate().is_err());

    let mut config = ShellConfig::default();
    config.window.min_height = 10_000;
    assert!(config.validate().is_err());

    let mut config = ShellConfig::default();
    config.render.backend = "metal".to_string();
    assert!(config.validate().is_err());

    let mut config = ShellConfig::default();
    config.render.present_mode = "triple".to_string();
    assert!(config.validate().is_err());

    let mut config = ShellConfig::default();
    config.render.clear_color = "blue".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_invalid_file_is_rejected_on_load() -> Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("zero.toml");
    fs::write(&file_path, "[window]\nwidth = 0\nheight = 10\ntitle = \"x\"\napp_id = \"x\"\n")?;

    assert!(ShellConfig::load(&file_path).is_err());
    Ok(())
}

#[test]
fn test_save_and_reload() -> Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("saved.toml");

    let mut config = ShellConfig::default();
    config.window.title = "saved".to_string();
    config.render.clear_color = "#FF000080".to_string();
    config.save(&file_path)?;

    let reloaded = ShellConfig::load(&file_path)?;
    assert_eq!(reloaded, config);
    Ok(())
}

#[test]
fn test_home_expansion() -> Result<()> {
    let home = std::env::var("HOME")?;
    assert_eq!(expand_home(Path::new("~/x.toml"))?, Path::new(&home).join("x.toml"));
    assert_eq!(expand_home(Path::new("/etc/x.toml"))?, PathBuf::from("/etc/x.toml"));
    Ok(())
}

#[test]
fn test_merge_partial_overrides_changed_sections() {
    let mut base = ShellConfig::default();
    base.window.title = "base".to_string();

    let mut partial = ShellConfig::default();
    partial.general.debug = true;

    let merged = base.clone().merge_partial(partial);
    assert_eq!(merged.window.title, "base");
    assert!(merged.general.debug);

    let mut partial = ShellConfig::default();
    partial.render.backend = "gl".to_string();
    let merged = base.merge_partial(partial);
    assert_eq!(merged.render.backend, "gl");
    assert_eq!(merged.window.title, "base");
}

#[test]
fn test_session_options_from_config() -> Result<()> {
    let mut config = ShellConfig::default();
    config.render.backend = "gl".to_string();
    config.render.present_mode = "mailbox".to_string();
    config.render.clear_color = "#000000".to_string();

    let options = config.session_options()?;
    assert_eq!(options.title, "gridshell");
    assert_eq!(options.min_size, Some((200, 100)));
    assert_eq!(options.gpu.backends, wgpu::Backends::GL);
    assert_eq!(options.gpu.present_mode, PresentModePreference::Mailbox);
    assert_eq!(options.gpu.clear_color, Color::BLACK);

    config.window.min_width = 0;
    config.window.min_height = 0;
    assert_eq!(config.session_options()?.min_size, None);
    Ok(())
}

//! Configuration management for gridshell
//!
//! Loads, validates and saves the TOML configuration. Every section is
//! optional; missing sections and fields fall back to their defaults.

use crate::session::gpu::{backends_from_str, GpuOptions, PresentModePreference};
use crate::session::SessionOptions;
use crate::ui::style::Color;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ShellConfig {
    /// Toplevel window settings
    #[serde(default)]
    pub window: WindowConfig,

    /// GPU surface settings
    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowConfig {
    /// Initial width in pixels
    pub width: u32,

    /// Initial height in pixels
    pub height: u32,

    pub title: String,

    /// xdg app id used by the compositor for matching rules
    pub app_id: String,

    /// Minimum size hint; 0 leaves the axis unconstrained
    #[serde(default)]
    pub min_width: u32,

    #[serde(default)]
    pub min_height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderConfig {
    /// `auto`, `vulkan` or `gl`
    pub backend: String,

    /// `auto`, `fifo`, `mailbox` or `immediate`
    pub present_mode: String,

    /// Background as `#RRGGBB` or `#RRGGBBAA`
    pub clear_color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GeneralConfig {
    /// Enable debug logging
    pub debug: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "gridshell".to_string(),
            app_id: "org.gridshell.Shell".to_string(),
            min_width: 200,
            min_height: 100,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            backend: "auto".to_string(),
            present_mode: "auto".to_string(),
            clear_color: "#333333".to_string(),
        }
    }
}

const VALID_BACKENDS: [&str; 3] = ["auto", "vulkan", "gl"];

/// Expand a leading `~` to `$HOME`
fn expand_home(path: &Path) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => {
            let home = std::env::var("HOME").context("Failed to get HOME environment variable")?;
            Ok(Path::new(&home).join(rest))
        }
        Err(_) => Ok(path.to_path_buf()),
    }
}

impl ShellConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let expanded_path = expand_home(path.as_ref())?;

        let contents = fs::read_to_string(&expanded_path)
            .with_context(|| format!("Failed to read config file: {}", expanded_path.display()))?;

        let config: ShellConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", expanded_path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            anyhow::bail!(
                "Invalid window size {}x{}: both dimensions must be non-zero",
                self.window.width,
                self.window.height
            );
        }

        if self.window.min_width > self.window.width || self.window.min_height > self.window.height {
            anyhow::bail!(
                "Invalid minimum size {}x{}: larger than the initial size",
                self.window.min_width,
                self.window.min_height
            );
        }

        if !VALID_BACKENDS.contains(&self.render.backend.to_lowercase().as_str()) {
            anyhow::bail!("Invalid render backend: {}", self.render.backend);
        }

        self.render
            .present_mode
            .parse::<PresentModePreference>()
            .map_err(anyhow::Error::msg)?;

        self.render
            .clear_color
            .parse::<Color>()
            .with_context(|| format!("Invalid clear_color: {}", self.render.clear_color))?;

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, contents).context("Failed to write configuration file")?;

        Ok(())
    }

    /// Merge a partial configuration into this one.
    /// Sections of `partial` that differ from the defaults win.
    pub fn merge_partial(mut self, partial: ShellConfig) -> Self {
        let default_config = ShellConfig::default();

        if partial.window != default_config.window {
            self.window = partial.window;
        }
        if partial.render != default_config.render {
            self.render = partial.render;
        }
        if partial.general != default_config.general {
            self.general = partial.general;
        }

        self
    }

    /// Window and GPU parameters for the display session
    pub fn session_options(&self) -> Result<SessionOptions> {
        let min_size = (self.window.min_width > 0 || self.window.min_height > 0)
            .then_some((self.window.min_width, self.window.min_height));
        Ok(SessionOptions {
            title: self.window.title.clone(),
            app_id: self.window.app_id.clone(),
            width: self.window.width,
            height: self.window.height,
            min_size,
            gpu: GpuOptions {
                backends: backends_from_str(&self.render.backend),
                present_mode: self
                    .render
                    .present_mode
                    .parse()
                    .map_err(anyhow::Error::msg)?,
                clear_color: self
                    .render
                    .clear_color
                    .parse()
                    .with_context(|| format!("Invalid clear_color: {}", self.render.clear_color))?,
            },
        })
    }
}

#[cfg(test)]
mod tests;

#[cfg(test)]
mod property_tests;

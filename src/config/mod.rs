//! Configuration file support for scribblepad.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/scribblepad/config.toml`. Settings include the surface size and
//! background, pen defaults, the remote services used on submit, and export options.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

pub use enums::ColorSpec;
pub use types::{CanvasConfig, OutputConfig, PenConfig, ServiceConfig};

use crate::draw::{Color, PenSettings, color::WHITE};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [canvas]
/// width = 800
/// height = 700
/// background = "#FFFFFF"
///
/// [pen]
/// color = "black"
/// thickness = 35.0
/// eraser_extra = 5.0
///
/// [service]
/// predict_url = "http://127.0.0.1:5000/predict"
/// image_search_key = "your-access-key"
/// ```
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    /// Surface size and background
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// Pen color and widths
    #[serde(default)]
    pub pen: PenConfig,

    /// Prediction, image search and speech endpoints
    #[serde(default)]
    pub service: ServiceConfig,

    /// Export location
    #[serde(default)]
    pub output: OutputConfig,
}

/// Canvas edges: 100 - 8192
fn clamp_canvas_edge(name: &str, value: &mut u32) {
    if !(100..=8192).contains(value) {
        warn!("Invalid canvas {} {}, clamping to 100-8192 range", name, value);
        *value = (*value).clamp(100, 8192);
    }
}

impl Config {
    /// Replaces the canvas width (e.g. with the host container width),
    /// applying the same range as the config file.
    pub fn set_canvas_width(&mut self, width: u32) {
        self.canvas.width = width;
        clamp_canvas_edge("width", &mut self.canvas.width);
    }

    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value (or reset to the
    /// default) and a warning is logged.
    ///
    /// Validated ranges:
    /// - `canvas.width` / `canvas.height`: 100 - 8192
    /// - `pen.thickness`: 1.0 - 200.0
    /// - `pen.eraser_extra`: 0.0 - 100.0
    /// - `service.timeout_secs`: 1 - 300
    fn validate_and_clamp(&mut self) {
        clamp_canvas_edge("width", &mut self.canvas.width);
        clamp_canvas_edge("height", &mut self.canvas.height);

        if self.canvas.background.try_to_color().is_none() {
            warn!(
                "Invalid canvas background {:?}, falling back to white",
                self.canvas.background
            );
            self.canvas.background = ColorSpec::Name("#FFFFFF".to_string());
        }

        if self.pen.color.try_to_color().is_none() {
            warn!("Invalid pen color {:?}, falling back to black", self.pen.color);
            self.pen.color = ColorSpec::Name("black".to_string());
        }

        // Thickness: 1.0 - 200.0 (NaN falls back to the default)
        if self.pen.thickness.is_nan() {
            warn!("Invalid pen thickness NaN, using 35.0");
            self.pen.thickness = 35.0;
        } else if !(1.0..=200.0).contains(&self.pen.thickness) {
            warn!(
                "Invalid pen thickness {:.1}, clamping to 1.0-200.0 range",
                self.pen.thickness
            );
            self.pen.thickness = self.pen.thickness.clamp(1.0, 200.0);
        }

        if self.pen.eraser_extra.is_nan() {
            warn!("Invalid eraser_extra NaN, using 5.0");
            self.pen.eraser_extra = 5.0;
        } else if !(0.0..=100.0).contains(&self.pen.eraser_extra) {
            warn!(
                "Invalid eraser_extra {:.1}, clamping to 0.0-100.0 range",
                self.pen.eraser_extra
            );
            self.pen.eraser_extra = self.pen.eraser_extra.clamp(0.0, 100.0);
        }

        if !(1..=300).contains(&self.service.timeout_secs) {
            warn!(
                "Invalid timeout_secs {}, clamping to 1-300 range",
                self.service.timeout_secs
            );
            self.service.timeout_secs = self.service.timeout_secs.clamp(1, 300);
        }

        for (name, value, fallback) in [
            (
                "predict_url",
                &mut self.service.predict_url,
                types::default_predict_url as fn() -> String,
            ),
            (
                "image_search_url",
                &mut self.service.image_search_url,
                types::default_image_search_url,
            ),
            (
                "speech_url",
                &mut self.service.speech_url,
                types::default_speech_url,
            ),
        ] {
            if let Err(err) = Url::parse(value.as_str()) {
                warn!("Invalid {} '{}' ({}), using default", name, value, err);
                *value = fallback();
            }
        }
    }

    /// Surface background as a color.
    pub fn background_color(&self) -> Color {
        self.canvas.background.try_to_color().unwrap_or(WHITE)
    }

    /// Pen settings for the stroke renderer.
    pub fn pen_settings(&self) -> PenSettings {
        PenSettings {
            color: self.pen.color.to_color(),
            thickness: self.pen.thickness,
            eraser_extra: self.pen.eraser_extra,
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/scribblepad/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("scribblepad");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates configuration from an explicit path.
    ///
    /// Unlike [`Config::load`], a missing file is an error.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config = Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;
        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Writes the documented example config to the user's config directory.
    ///
    /// # Errors
    /// Returns an error if a config file already exists or cannot be written.
    pub fn create_default_file() -> Result<PathBuf> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let default_config = include_str!("../../config.example.toml");
        fs::write(&config_path, default_config)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Created default config at {}", config_path.display());
        Ok(config_path)
    }
}

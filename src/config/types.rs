//! Configuration type definitions.

use super::enums::ColorSpec;
use serde::{Deserialize, Serialize};

/// Surface geometry and background.
///
/// The width stands in for the host container's width; the height is fixed.
#[derive(Debug, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Surface width in pixels (valid range: 100 - 8192)
    #[serde(default = "default_width")]
    pub width: u32,

    /// Surface height in pixels (valid range: 100 - 8192)
    #[serde(default = "default_height")]
    pub height: u32,

    /// Background fill, also used as the eraser color
    #[serde(default = "default_background")]
    pub background: ColorSpec,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            background: default_background(),
        }
    }
}

/// Pen defaults for draw and erase mode.
#[derive(Debug, Serialize, Deserialize)]
pub struct PenConfig {
    /// Ink color in draw mode
    #[serde(default = "default_pen_color")]
    pub color: ColorSpec,

    /// Line width in pixels (valid range: 1.0 - 200.0)
    #[serde(default = "default_thickness")]
    pub thickness: f64,

    /// Extra width added in erase mode (valid range: 0.0 - 100.0)
    #[serde(default = "default_eraser_extra")]
    pub eraser_extra: f64,
}

impl Default for PenConfig {
    fn default() -> Self {
        Self {
            color: default_pen_color(),
            thickness: default_thickness(),
            eraser_extra: default_eraser_extra(),
        }
    }
}

/// Remote collaborators used when a drawing is submitted.
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Classification endpoint receiving the `image` form field
    #[serde(default = "default_predict_url")]
    pub predict_url: String,

    /// Photo search endpoint queried once per label
    #[serde(default = "default_image_search_url")]
    pub image_search_url: String,

    /// Access key sent as `client_id`; image lookups are skipped when empty
    #[serde(default)]
    pub image_search_key: String,

    /// Text-to-speech endpoint
    #[serde(default = "default_speech_url")]
    pub speech_url: String,

    /// Language code for speech (`tl` parameter)
    #[serde(default = "default_speech_language")]
    pub speech_language: String,

    /// Per-request timeout in seconds (valid range: 1 - 300)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            predict_url: default_predict_url(),
            image_search_url: default_image_search_url(),
            image_search_key: String::new(),
            speech_url: default_speech_url(),
            speech_language: default_speech_language(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Where exported drawings are written.
#[derive(Debug, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for exported PNGs (supports `~/`)
    #[serde(default = "default_output_directory")]
    pub directory: String,

    /// Filename template (chrono format specifiers, no extension)
    #[serde(default = "default_filename_template")]
    pub filename_template: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            filename_template: default_filename_template(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    700
}

fn default_background() -> ColorSpec {
    ColorSpec::Name("#FFFFFF".to_string())
}

fn default_pen_color() -> ColorSpec {
    ColorSpec::Name("black".to_string())
}

fn default_thickness() -> f64 {
    35.0
}

fn default_eraser_extra() -> f64 {
    5.0
}

pub(crate) fn default_predict_url() -> String {
    "http://127.0.0.1:5000/predict".to_string()
}

pub(crate) fn default_image_search_url() -> String {
    "https://api.unsplash.com/search/photos".to_string()
}

pub(crate) fn default_speech_url() -> String {
    "https://translate.google.com/translate_tts".to_string()
}

fn default_speech_language() -> String {
    "en".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_output_directory() -> String {
    "~/Pictures/Scribblepad".to_string()
}

fn default_filename_template() -> String {
    "drawing_%Y-%m-%d_%H%M%S".to_string()
}

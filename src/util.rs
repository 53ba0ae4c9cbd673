//! Utility functions for colors, geometry, and label text.
//!
//! This module provides:
//! - The [`Point`] coordinate type shared by input and rendering
//! - Name-to-color mapping for the configuration file
//! - Label normalization for display and lookups

use crate::draw::{Color, color::*};

// ============================================================================
// Geometry
// ============================================================================

/// A 2D position in surface coordinates (origin at the top-left corner).
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns `true` when both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

// ============================================================================
// Color Mapping
// ============================================================================

/// Maps color name strings (or `#RRGGBB` hex) to Color values.
///
/// Used by the configuration system to parse colors from the config file.
///
/// # Supported Names (case-insensitive)
/// - "red", "green", "blue", "white", "black"
/// - any `#RRGGBB` / `#RGB` hex string
pub fn name_to_color(name: &str) -> Option<Color> {
    match name.to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        other if other.starts_with('#') => Color::from_hex(other),
        _ => None,
    }
}

// ============================================================================
// Labels
// ============================================================================

/// Turns a classifier label into display text (`hot_air_balloon` -> `hot air balloon`).
pub fn label_to_words(label: &str) -> String {
    label.trim().replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_and_hex_color_mappings() {
        assert_eq!(name_to_color("White").unwrap(), WHITE);
        assert_eq!(name_to_color("#000000").unwrap(), BLACK);
        assert!(name_to_color("chartreuse").is_none());
    }

    #[test]
    fn labels_replace_every_underscore() {
        assert_eq!(label_to_words("hot_air_balloon"), "hot air balloon");
        assert_eq!(label_to_words(" cat "), "cat");
    }

    #[test]
    fn non_finite_points_are_detected() {
        assert!(Point::new(1.0, 2.0).is_finite());
        assert!(!Point::new(f64::NAN, 2.0).is_finite());
        assert!(!Point::new(0.0, f64::INFINITY).is_finite());
    }
}

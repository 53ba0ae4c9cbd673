//! Stroke styling for the draw and erase modes.

use super::color::Color;

/// Draw/erase flag that decides how the next segment is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawingMode {
    /// Ink in the pen color.
    #[default]
    Draw,
    /// Paint over existing strokes with the surface background.
    Erase,
}

impl DrawingMode {
    /// Returns the opposite mode.
    pub fn toggled(self) -> Self {
        match self {
            DrawingMode::Draw => DrawingMode::Erase,
            DrawingMode::Erase => DrawingMode::Draw,
        }
    }

    pub fn is_erasing(self) -> bool {
        self == DrawingMode::Erase
    }
}

/// Resolved color and width for a single segment.
///
/// Line join and cap are always round, so they are not stored here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub thickness: f64,
}

/// Pen settings the renderer derives both stroke styles from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenSettings {
    /// Ink color in draw mode
    pub color: Color,
    /// Line width in draw mode
    pub thickness: f64,
    /// Extra width added while erasing
    pub eraser_extra: f64,
}

impl Default for PenSettings {
    fn default() -> Self {
        Self {
            color: super::color::BLACK,
            thickness: 35.0,
            eraser_extra: 5.0,
        }
    }
}

impl PenSettings {
    /// Resolves the style for `mode` on a surface with the given background.
    ///
    /// Erasing paints with the background color at `thickness + eraser_extra`.
    pub fn style_for(&self, mode: DrawingMode, background: Color) -> StrokeStyle {
        match mode {
            DrawingMode::Draw => StrokeStyle {
                color: self.color,
                thickness: self.thickness,
            },
            DrawingMode::Erase => StrokeStyle {
                color: background,
                thickness: self.thickness + self.eraser_extra,
            },
        }
    }
}

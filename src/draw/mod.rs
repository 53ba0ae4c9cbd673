//! Rendering primitives for the drawing pad (Cairo-based).
//!
//! This module defines the raster side of the pad:
//! - [`Color`]: RGBA color representation with predefined color constants
//! - [`Surface`]: the fixed-size bitmap every stroke lands on
//! - [`DrawingMode`] / [`StrokeStyle`]: how the next segment is painted
//! - Rendering functions for Cairo-based output

pub mod color;
pub mod render;
pub mod style;
pub mod surface;

pub use color::Color;
pub use style::{DrawingMode, PenSettings, StrokeStyle};
pub use surface::{DrawError, Surface};

#[allow(unused_imports)]
pub use color::{BLACK, BLUE, GREEN, RED, WHITE};

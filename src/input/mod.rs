//! Input handling and the stroke state machine.
//!
//! This module translates host pointer/touch events into stroke operations.
//! It owns the drawing surface, the draw/erase mode, and the pointer session
//! that connects consecutive move events into segments.

pub mod events;
pub mod state;

pub use events::{PointerEvent, SurfaceBounds};
pub use state::{StrokeRenderer, StrokeState};

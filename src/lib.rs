//! Library exports for the scribblepad drawing pad.
//!
//! Exposes the stroke renderer and its raster surface, the host-neutral
//! pointer event model, the submission pipeline, and the configuration types,
//! so that hosts other than the bundled CLI can embed the pad.

pub mod config;
pub mod draw;
pub mod export;
pub mod input;
pub mod replay;
pub mod submit;
pub mod util;

pub use config::Config;
pub use input::StrokeRenderer;

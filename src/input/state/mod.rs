//! Stroke renderer: pointer session state machine plus the surface it paints.

mod pointer;

use crate::draw::{Color, DrawError, DrawingMode, PenSettings, StrokeStyle, Surface};
use crate::input::events::SurfaceBounds;
use crate::util::Point;

/// Pointer session state machine.
///
/// At most one session exists; a second press while drawing restarts it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeState {
    /// No button/finger down - moves are ignored
    Idle,
    /// A stroke is in progress
    Drawing {
        /// Where the previous segment ended
        last: Point,
    },
}

/// Translates a stream of pointer positions into raster strokes.
///
/// Owns all mutable drawing state: the surface, the pointer session, and the
/// draw/erase mode. Every operation is synchronous and applied in call order.
#[derive(Debug)]
pub struct StrokeRenderer {
    /// Bitmap receiving every segment
    surface: Surface,
    /// Pen color/width and eraser widening
    pen: PenSettings,
    /// Draw or erase; read on every segment
    mode: DrawingMode,
    /// Current pointer session
    state: StrokeState,
    /// On-screen offset used by `handle_event`
    bounds: SurfaceBounds,
    /// Segments painted since creation (diagnostics only)
    segments_drawn: u64,
}

impl StrokeRenderer {
    /// Creates a renderer over a fresh `width` x `height` surface.
    pub fn new(
        width: u32,
        height: u32,
        background: Color,
        pen: PenSettings,
    ) -> Result<Self, DrawError> {
        Ok(Self::with_surface(Surface::new(width, height, background)?, pen))
    }

    /// Wraps an existing surface.
    pub fn with_surface(surface: Surface, pen: PenSettings) -> Self {
        Self {
            surface,
            pen,
            mode: DrawingMode::Draw,
            state: StrokeState::Idle,
            bounds: SurfaceBounds::default(),
            segments_drawn: 0,
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn mode(&self) -> DrawingMode {
        self.mode
    }

    pub fn is_erasing(&self) -> bool {
        self.mode.is_erasing()
    }

    /// Updates the surface's on-screen offset (after scroll or layout changes).
    pub fn set_bounds(&mut self, bounds: SurfaceBounds) {
        self.bounds = bounds;
    }

    pub fn segments_drawn(&self) -> u64 {
        self.segments_drawn
    }

    /// Style the next segment will be painted with.
    pub fn current_style(&self) -> StrokeStyle {
        self.pen.style_for(self.mode, self.surface.background())
    }

    /// Starts a stroke at `position` without painting anything.
    pub fn begin_stroke(&mut self, position: Point) {
        if !position.is_finite() {
            log::debug!("Ignoring stroke start at non-finite position {:?}", position);
            return;
        }
        self.state = StrokeState::Drawing { last: position };
    }

    /// Paints a segment from the previous position to `position`.
    ///
    /// Does nothing while idle. The draw/erase mode is re-read for every
    /// segment, so toggling mid-stroke changes the style from the next call on.
    pub fn extend_stroke(&mut self, position: Point) {
        let StrokeState::Drawing { last } = self.state else {
            return;
        };
        if !position.is_finite() {
            log::debug!("Ignoring stroke move to non-finite position {:?}", position);
            return;
        }

        let style = self.current_style();
        if let Err(err) = self.surface.stroke_segment(last, position, style) {
            log::warn!("Failed to draw segment {:?} -> {:?}: {}", last, position, err);
        } else {
            self.segments_drawn += 1;
        }
        self.state = StrokeState::Drawing { last: position };
    }

    /// Finishes the current stroke. No-op while idle.
    pub fn end_stroke(&mut self) {
        self.state = StrokeState::Idle;
    }

    /// Pointer left the surface: the stroke ends and re-entry starts a new one.
    pub fn leave_surface(&mut self) {
        if matches!(self.state, StrokeState::Drawing { .. }) {
            log::trace!("Pointer left surface mid-stroke");
        }
        self.state = StrokeState::Idle;
    }

    /// Flips between draw and erase mode, returning whether erasing is now on.
    pub fn toggle_erase(&mut self) -> bool {
        self.mode = self.mode.toggled();
        log::debug!("Erase mode {}", if self.is_erasing() { "on" } else { "off" });
        self.is_erasing()
    }

    /// Repaints the whole surface with the background. There is no undo.
    pub fn clear_surface(&mut self) {
        if let Err(err) = self.surface.fill_background() {
            log::warn!("Failed to clear surface: {}", err);
        }
    }

    /// Encodes the surface as PNG bytes without mutating it.
    pub fn export_bitmap(&self) -> Result<Vec<u8>, DrawError> {
        self.surface.encode_png()
    }

    /// Encodes the surface as a base64 PNG data URL, the submission payload.
    pub fn export_data_url(&self) -> Result<String, DrawError> {
        self.surface.encode_data_url()
    }
}

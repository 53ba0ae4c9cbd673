use crate::input::events::PointerEvent;

use super::StrokeRenderer;

impl StrokeRenderer {
    /// Dispatches a host pointer/touch event.
    ///
    /// # Behavior
    /// - Press (mouse down / touch start): starts a stroke
    /// - Move: extends the stroke when one is active
    /// - Release (mouse up / touch end): ends the stroke
    /// - Leave (mouse leave / touch cancel): ends the stroke
    ///
    /// Client coordinates are shifted by the surface bounds. Press and move
    /// events without a usable position are dropped.
    pub fn handle_event(&mut self, event: &PointerEvent) {
        match event {
            PointerEvent::MouseDown { .. } | PointerEvent::TouchStart { .. } => {
                if let Some((x, y)) = event.client_position() {
                    self.begin_stroke(self.bounds.to_surface(x, y));
                } else {
                    log::debug!("Dropping press without position: {:?}", event);
                }
            }
            PointerEvent::MouseMove { .. } | PointerEvent::TouchMove { .. } => {
                if let Some((x, y)) = event.client_position() {
                    self.extend_stroke(self.bounds.to_surface(x, y));
                }
            }
            PointerEvent::MouseUp | PointerEvent::TouchEnd => self.end_stroke(),
            PointerEvent::MouseLeave | PointerEvent::TouchCancel => self.leave_surface(),
        }
    }
}

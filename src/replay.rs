//! Recorded event scripts that drive a [`StrokeRenderer`] without a live host.
//!
//! A script is JSON:
//!
//! ```json
//! {
//!   "bounds": { "left": 0.0, "top": 0.0 },
//!   "events": [
//!     { "type": "mouse_down", "x": 10.0, "y": 10.0 },
//!     { "type": "mouse_move", "x": 50.0, "y": 10.0 },
//!     { "type": "mouse_up" },
//!     { "type": "toggle_erase" },
//!     { "type": "submit" }
//!   ]
//! }
//! ```

use crate::input::{PointerEvent, StrokeRenderer, SurfaceBounds};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Control buttons that sit next to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlSignal {
    /// Wipe the surface
    Clear,
    /// Switch between draw and erase
    ToggleErase,
    /// Send the current drawing for classification
    Submit,
}

/// One scripted step: a pointer event or a control signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Pointer(PointerEvent),
    Control(ControlSignal),
}

/// A recorded session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Surface offset in client coordinates at recording time
    #[serde(default)]
    pub bounds: SurfaceBounds,
    pub events: Vec<Step>,
}

/// Errors raised while loading a script.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read script {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid script {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// What a replay did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Steps applied
    pub steps: usize,
    /// Segments painted during the replay
    pub segments: u64,
    /// Index of every `submit` step
    pub submit_points: Vec<usize>,
}

impl Script {
    /// Reads and parses a script file.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let source = fs::read_to_string(path).map_err(|source| ReplayError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source).map_err(|source| ReplayError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    /// Applies every step in order.
    ///
    /// `on_submit` runs at each `submit` step with the renderer as it is at
    /// that moment; a host hands the snapshot to the submission manager there.
    pub fn replay<F>(&self, renderer: &mut StrokeRenderer, mut on_submit: F) -> ReplaySummary
    where
        F: FnMut(usize, &StrokeRenderer),
    {
        renderer.set_bounds(self.bounds);
        let segments_before = renderer.segments_drawn();
        let mut summary = ReplaySummary::default();

        for (index, step) in self.events.iter().enumerate() {
            match step {
                Step::Pointer(event) => renderer.handle_event(event),
                Step::Control(ControlSignal::Clear) => renderer.clear_surface(),
                Step::Control(ControlSignal::ToggleErase) => {
                    renderer.toggle_erase();
                }
                Step::Control(ControlSignal::Submit) => {
                    summary.submit_points.push(index);
                    on_submit(index, renderer);
                }
            }
            summary.steps += 1;
        }

        summary.segments = renderer.segments_drawn() - segments_before;
        log::debug!(
            "Replayed {} steps, {} segments, {} submits",
            summary.steps,
            summary.segments,
            summary.submit_points.len()
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{PenSettings, WHITE};
    use crate::input::StrokeState;

    fn renderer() -> StrokeRenderer {
        StrokeRenderer::new(120, 80, WHITE, PenSettings::default()).unwrap()
    }

    #[test]
    fn parses_pointer_and_control_steps() {
        let script = Script::parse(
            r#"{
                "bounds": {"left": 5.0, "top": 7.0},
                "events": [
                    {"type": "mouse_down", "x": 15.0, "y": 17.0},
                    {"type": "touch_move", "touches": [[30.0, 17.0]]},
                    {"type": "toggle_erase"},
                    {"type": "clear"},
                    {"type": "touch_cancel"},
                    {"type": "submit"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(script.bounds, SurfaceBounds::new(5.0, 7.0));
        assert_eq!(script.events.len(), 6);
        assert_eq!(
            script.events[0],
            Step::Pointer(PointerEvent::MouseDown { x: 15.0, y: 17.0 })
        );
        assert_eq!(script.events[2], Step::Control(ControlSignal::ToggleErase));
        assert_eq!(script.events[5], Step::Control(ControlSignal::Submit));
    }

    #[test]
    fn malformed_move_between_good_ones_is_skipped() {
        let script = Script::parse(
            r#"{"events": [
                {"type": "mouse_down", "x": 10.0, "y": 10.0},
                {"type": "mouse_move", "x": 50.0, "y": 10.0},
                {"type": "mouse_move", "x": 5.0},
                {"type": "mouse_move", "x": null, "y": 70.0},
                {"type": "mouse_move", "x": 90.0, "y": 10.0},
                {"type": "mouse_up"}
            ]}"#,
        )
        .unwrap();

        let mut renderer = renderer();
        let summary = script.replay(&mut renderer, |_, _| {});
        assert_eq!(summary.steps, 6);
        assert_eq!(summary.segments, 2);
        assert_eq!(renderer.surface().pixel(70, 10), Some([0, 0, 0, 255]));
        assert_eq!(renderer.surface().pixel(5, 70), Some([255, 255, 255, 255]));
    }

    #[test]
    fn unknown_step_type_is_rejected() {
        assert!(Script::parse(r#"{"events": [{"type": "pinch"}]}"#).is_err());
    }

    #[test]
    fn replay_applies_steps_in_order() {
        let script = Script::parse(
            r#"{"events": [
                {"type": "mouse_down", "x": 10.0, "y": 10.0},
                {"type": "mouse_move", "x": 50.0, "y": 10.0},
                {"type": "mouse_move", "x": 90.0, "y": 40.0},
                {"type": "submit"},
                {"type": "mouse_up"},
                {"type": "toggle_erase"}
            ]}"#,
        )
        .unwrap();

        let mut renderer = renderer();
        let mut submitted_segments = Vec::new();
        let summary = script.replay(&mut renderer, |index, r| {
            submitted_segments.push((index, r.segments_drawn(), r.state()));
        });

        assert_eq!(summary.steps, 6);
        assert_eq!(summary.segments, 2);
        assert_eq!(summary.submit_points, vec![3]);
        assert_eq!(submitted_segments.len(), 1);
        assert_eq!(submitted_segments[0].1, 2);
        assert!(matches!(submitted_segments[0].2, StrokeState::Drawing { .. }));
        assert!(renderer.is_erasing());
        assert_eq!(renderer.state(), StrokeState::Idle);
        assert_eq!(renderer.surface().pixel(30, 10), Some([0, 0, 0, 255]));
    }

    #[test]
    fn clear_step_resets_surface() {
        let script = Script::parse(
            r#"{"events": [
                {"type": "mouse_down", "x": 10.0, "y": 10.0},
                {"type": "mouse_move", "x": 50.0, "y": 10.0},
                {"type": "mouse_up"},
                {"type": "clear"}
            ]}"#,
        )
        .unwrap();
        let mut renderer = renderer();
        script.replay(&mut renderer, |_, _| {});
        let blank = crate::draw::Surface::new(120, 80, WHITE).unwrap();
        assert_eq!(renderer.surface().raw_pixels(), blank.raw_pixels());
    }

    #[test]
    fn load_reports_path_on_errors() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("missing.json");
        let err = Script::load(&missing).unwrap_err();
        assert!(matches!(err, ReplayError::Read { .. }));
        assert!(err.to_string().contains("missing.json"));

        let broken = temp.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(
            Script::load(&broken),
            Err(ReplayError::Parse { .. })
        ));
    }
}

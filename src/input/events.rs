//! Host-neutral pointer event types.
//!
//! Hosts translate their native mouse/touch callbacks into [`PointerEvent`]s
//! carrying client (window-space) coordinates; the renderer converts them to
//! surface coordinates with the surface's [`SurfaceBounds`].

use crate::util::Point;
use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};

/// On-screen offset of the surface's top-left corner in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfaceBounds {
    pub left: f64,
    pub top: f64,
}

impl SurfaceBounds {
    pub const fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    /// Converts client coordinates into surface coordinates.
    pub fn to_surface(&self, client_x: f64, client_y: f64) -> Point {
        Point::new(client_x - self.left, client_y - self.top)
    }
}

/// Pointer and touch events consumed by the stroke renderer.
///
/// Touch variants list every active touch point; only the first one is read.
/// Missing, null, or non-numeric coordinates deserialize as NaN, which makes
/// the event carry no position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    /// Primary button pressed
    MouseDown {
        #[serde(default = "missing_coordinate", deserialize_with = "lenient_coordinate")]
        x: f64,
        #[serde(default = "missing_coordinate", deserialize_with = "lenient_coordinate")]
        y: f64,
    },
    /// Pointer moved (with or without a button held)
    MouseMove {
        #[serde(default = "missing_coordinate", deserialize_with = "lenient_coordinate")]
        x: f64,
        #[serde(default = "missing_coordinate", deserialize_with = "lenient_coordinate")]
        y: f64,
    },
    /// Primary button released
    MouseUp,
    /// Pointer left the surface
    MouseLeave,
    /// Finger touched the surface
    TouchStart {
        #[serde(default, deserialize_with = "lenient_touches")]
        touches: Vec<(f64, f64)>,
    },
    /// Finger moved
    TouchMove {
        #[serde(default, deserialize_with = "lenient_touches")]
        touches: Vec<(f64, f64)>,
    },
    /// Finger lifted
    TouchEnd,
    /// Touch interrupted by the host
    TouchCancel,
}

impl PointerEvent {
    /// Returns the client position this event carries, if any.
    ///
    /// Touch events without touch points, and positions that are not
    /// finite, yield `None`.
    pub fn client_position(&self) -> Option<(f64, f64)> {
        let position = match self {
            PointerEvent::MouseDown { x, y } | PointerEvent::MouseMove { x, y } => Some((*x, *y)),
            PointerEvent::TouchStart { touches } | PointerEvent::TouchMove { touches } => {
                touches.first().copied()
            }
            PointerEvent::MouseUp
            | PointerEvent::MouseLeave
            | PointerEvent::TouchEnd
            | PointerEvent::TouchCancel => None,
        };
        position.filter(|(x, y)| x.is_finite() && y.is_finite())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Valid(T),
    Malformed(IgnoredAny),
}

fn missing_coordinate() -> f64 {
    f64::NAN
}

fn lenient_coordinate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match Lenient::<f64>::deserialize(deserializer)? {
        Lenient::Valid(value) => value,
        Lenient::Malformed(_) => f64::NAN,
    })
}

fn lenient_touches<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<(f64, f64)>, D::Error> {
    Ok(match Lenient::<Vec<Lenient<(f64, f64)>>>::deserialize(deserializer)? {
        Lenient::Valid(touches) => touches
            .into_iter()
            .map(|touch| match touch {
                Lenient::Valid(point) => point,
                Lenient::Malformed(_) => (f64::NAN, f64::NAN),
            })
            .collect(),
        Lenient::Malformed(_) => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_subtract_offset() {
        let bounds = SurfaceBounds::new(15.0, 120.0);
        assert_eq!(bounds.to_surface(25.0, 130.0), Point::new(10.0, 10.0));
    }

    #[test]
    fn only_first_touch_is_read() {
        let event = PointerEvent::TouchMove {
            touches: vec![(1.0, 2.0), (50.0, 60.0)],
        };
        assert_eq!(event.client_position(), Some((1.0, 2.0)));
        let empty = PointerEvent::TouchStart { touches: vec![] };
        assert_eq!(empty.client_position(), None);
    }

    #[test]
    fn events_deserialize_from_tagged_json() {
        let event: PointerEvent =
            serde_json::from_str(r#"{"type":"touch_start","touches":[[3.0,4.0]]}"#).unwrap();
        assert_eq!(
            event,
            PointerEvent::TouchStart {
                touches: vec![(3.0, 4.0)]
            }
        );
        let up: PointerEvent = serde_json::from_str(r#"{"type":"mouse_up"}"#).unwrap();
        assert_eq!(up, PointerEvent::MouseUp);
    }

    #[test]
    fn malformed_coordinates_carry_no_position() {
        for json in [
            r#"{"type":"mouse_move","x":5.0}"#,
            r#"{"type":"mouse_move","x":null,"y":3.0}"#,
            r#"{"type":"mouse_down","x":"left","y":3.0}"#,
            r#"{"type":"touch_move","touches":[[1.0]]}"#,
            r#"{"type":"touch_start","touches":null}"#,
        ] {
            let event: PointerEvent = serde_json::from_str(json).unwrap();
            assert_eq!(event.client_position(), None, "{json}");
        }
    }
}

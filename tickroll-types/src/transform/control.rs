use serde::{Deserialize, Serialize};

use super::{whole_tick, CoordTransform, TickTransform};
use crate::{Point, Rect, Tick, TrackEvent, ValueEventType};

/// Default pixel height of the control pane.
pub const CONTROL_HEIGHT: f64 = 120.0;

/// Inset so that the extreme values stay fully visible.
pub const LINE_WIDTH: f64 = 2.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub tick: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlPosition {
    pub tick: Tick,
    pub value: i64,
}

/// Control pane: x is time, y is the value of one controller or pitch bend,
/// with the maximum on top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlCoordTransform {
    pub horizontal: TickTransform,
    pub value_type: ValueEventType,
    pub max_value: f64,
    pub height: f64,
    pub line_width: f64,
}

impl ControlCoordTransform {
    pub fn new(horizontal: TickTransform, value_type: ValueEventType, height: f64) -> Self {
        Self {
            horizontal,
            value_type,
            max_value: value_type.max_value(),
            height,
            line_width: LINE_WIDTH,
        }
    }

    fn drawable_height(&self) -> f64 {
        (self.height - self.line_width * 2.0).max(1.0)
    }

    pub fn get_y(&self, value: f64) -> f64 {
        (1.0 - value / self.max_value) * self.drawable_height() + self.line_width
    }

    /// Value under `y`, clamped to `[0, max_value]`.
    pub fn value_fractional(&self, y: f64) -> f64 {
        let v = (1.0 - (y - self.line_width) / self.drawable_height()) * self.max_value;
        v.clamp(0.0, self.max_value)
    }
}

impl CoordTransform for ControlCoordTransform {
    type Fractional = ControlPoint;
    type Integral = ControlPosition;

    fn horizontal(&self) -> &TickTransform {
        &self.horizontal
    }

    fn point_fractional(&self, p: Point) -> ControlPoint {
        ControlPoint {
            tick: self.get_tick(p.x),
            value: self.value_fractional(p.y),
        }
    }

    fn point(&self, p: Point) -> ControlPosition {
        ControlPosition {
            tick: whole_tick(self.get_tick(p.x)),
            value: self.value_fractional(p.y).round() as i64,
        }
    }

    fn rect(&self, event: &TrackEvent) -> Option<Rect> {
        let value = self.value_type.value_of(&event.body)?;
        let size = self.line_width * 2.0;
        Some(Rect {
            x: self.get_x(event.tick as f64) - self.line_width,
            y: self.get_y(value) - self.line_width,
            width: size,
            height: size,
        })
    }
}

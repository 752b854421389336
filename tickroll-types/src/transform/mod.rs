//! Pixel <-> domain mapping, one transform per editing surface.
//!
//! All four views share the horizontal mapping in [`TickTransform`]; they
//! differ only in what the vertical axis means (pitch row, controller value,
//! BPM, track row).

mod arrange;
mod control;
mod note;
mod tempo;

pub use arrange::{ArrangeCoordTransform, ArrangePoint, ArrangePosition};
pub use control::{ControlCoordTransform, ControlPoint, ControlPosition};
pub use note::{NoteCoordTransform, NotePoint, NotePosition};
pub use tempo::{TempoCoordTransform, TempoPoint, TempoPosition};

use serde::{Deserialize, Serialize};

use crate::{Point, Rect, TickRange, TrackEvent};

/// Default horizontal density at zoom 1.
pub const PIXELS_PER_TICK: f64 = 0.1;

/// Horizontal mapping shared by every view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickTransform {
    pub pixels_per_tick: f64,
    pub scale_x: f64,
}

impl TickTransform {
    pub fn new(pixels_per_tick: f64, scale_x: f64) -> Self {
        Self {
            pixels_per_tick,
            scale_x,
        }
    }

    fn density(&self) -> f64 {
        self.pixels_per_tick * self.scale_x
    }

    pub fn get_tick(&self, x: f64) -> f64 {
        x / self.density()
    }

    pub fn get_x(&self, tick: f64) -> f64 {
        tick * self.density()
    }

    /// Tick window covered by a canvas `width` pixels wide scrolled to `scroll_left`.
    pub fn visible_range(&self, scroll_left: f64, width: f64) -> TickRange {
        let start = self.get_tick(scroll_left).max(0.0).floor();
        let end = self.get_tick(scroll_left + width).max(0.0).ceil();
        TickRange::new(start as u32, end as u32)
    }
}

impl Default for TickTransform {
    fn default() -> Self {
        Self::new(PIXELS_PER_TICK, 1.0)
    }
}

/// Contract every view transform implements.
pub trait CoordTransform {
    /// Domain point with sub-unit precision, used while dragging so deltas
    /// do not accumulate rounding error.
    type Fractional;
    /// Domain point snapped to whole units, used when committing.
    type Integral;

    fn horizontal(&self) -> &TickTransform;

    fn get_tick(&self, x: f64) -> f64 {
        self.horizontal().get_tick(x)
    }

    fn get_x(&self, tick: f64) -> f64 {
        self.horizontal().get_x(tick)
    }

    fn point_fractional(&self, p: Point) -> Self::Fractional;

    fn point(&self, p: Point) -> Self::Integral;

    /// Pixel rectangle of an event, or `None` when this view does not draw
    /// events of that kind.
    fn rect(&self, event: &TrackEvent) -> Option<Rect>;
}

fn whole_tick(tick: f64) -> u32 {
    tick.max(0.0).floor() as u32
}

use serde::{Deserialize, Serialize};

use super::{whole_tick, CoordTransform, TickTransform};
use crate::{EventBody, Point, Rect, Tick, TrackEvent, MAX_NOTE_NUMBER};

pub const TRACK_HEIGHT: f64 = 64.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrangePoint {
    pub tick: f64,
    pub track_index: f64,
}

impl ArrangePoint {
    pub fn sub(self, other: ArrangePoint) -> ArrangePoint {
        ArrangePoint {
            tick: self.tick - other.tick,
            track_index: self.track_index - other.track_index,
        }
    }

    /// Keep the point on the timeline and within `[0, max_track_index]`.
    pub fn clamp(self, max_track_index: f64) -> ArrangePoint {
        ArrangePoint {
            tick: self.tick.max(0.0),
            track_index: self.track_index.clamp(0.0, max_track_index.max(0.0)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrangePosition {
    pub tick: Tick,
    pub track_index: usize,
}

/// Arrangement overview: x is time, y is the track list, one row per track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrangeCoordTransform {
    pub horizontal: TickTransform,
    pub track_height: f64,
}

impl ArrangeCoordTransform {
    pub fn new(horizontal: TickTransform, track_height: f64) -> Self {
        Self {
            horizontal,
            track_height,
        }
    }

    pub fn track_index_fractional(&self, y: f64) -> f64 {
        y / self.track_height
    }

    pub fn get_y(&self, track_index: f64) -> f64 {
        track_index * self.track_height
    }
}

impl Default for ArrangeCoordTransform {
    fn default() -> Self {
        Self::new(TickTransform::default(), TRACK_HEIGHT)
    }
}

impl CoordTransform for ArrangeCoordTransform {
    type Fractional = ArrangePoint;
    type Integral = ArrangePosition;

    fn horizontal(&self) -> &TickTransform {
        &self.horizontal
    }

    fn point_fractional(&self, p: Point) -> ArrangePoint {
        ArrangePoint {
            tick: self.get_tick(p.x),
            track_index: self.track_index_fractional(p.y),
        }
    }

    fn point(&self, p: Point) -> ArrangePosition {
        ArrangePosition {
            tick: whole_tick(self.get_tick(p.x)),
            track_index: self.track_index_fractional(p.y).max(0.0).floor() as usize,
        }
    }

    /// Row-relative: the caller offsets `y` by `get_y(track_index)`.
    fn rect(&self, event: &TrackEvent) -> Option<Rect> {
        let EventBody::Note {
            note_number,
            duration,
            ..
        } = event.body
        else {
            return None;
        };
        let y = (1.0 - note_number as f64 / MAX_NOTE_NUMBER as f64) * self.track_height;
        Some(Rect {
            x: self.get_x(event.tick as f64),
            y,
            width: self.get_x(duration as f64),
            height: 1.0,
        })
    }
}

use serde::{Deserialize, Serialize};

use super::{whole_tick, CoordTransform, TickTransform};
use crate::{usec_per_beat_to_bpm, EventBody, Point, Rect, Tick, TrackEvent};

pub const DEFAULT_MAX_BPM: f64 = 320.0;
pub const TEMPO_HEIGHT: f64 = 240.0;
const POINT_RADIUS: f64 = 4.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TempoPoint {
    pub tick: f64,
    pub bpm: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TempoPosition {
    pub tick: Tick,
    pub bpm: f64,
}

/// Tempo graph: x is time, y is BPM from 0 at the bottom to `max_bpm` on top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoCoordTransform {
    pub horizontal: TickTransform,
    pub max_bpm: f64,
    pub height: f64,
}

impl TempoCoordTransform {
    pub fn new(horizontal: TickTransform, max_bpm: f64, height: f64) -> Self {
        Self {
            horizontal,
            max_bpm,
            height,
        }
    }

    pub fn get_y(&self, bpm: f64) -> f64 {
        (1.0 - bpm / self.max_bpm) * self.height
    }

    /// BPM under `y`. Not clamped: drags measure deltas past the edges.
    pub fn bpm(&self, y: f64) -> f64 {
        (1.0 - y / self.height) * self.max_bpm
    }

    pub fn get_delta_bpm(&self, dy: f64) -> f64 {
        -dy / self.height * self.max_bpm
    }
}

impl Default for TempoCoordTransform {
    fn default() -> Self {
        Self::new(TickTransform::default(), DEFAULT_MAX_BPM, TEMPO_HEIGHT)
    }
}

impl CoordTransform for TempoCoordTransform {
    type Fractional = TempoPoint;
    type Integral = TempoPosition;

    fn horizontal(&self) -> &TickTransform {
        &self.horizontal
    }

    fn point_fractional(&self, p: Point) -> TempoPoint {
        TempoPoint {
            tick: self.get_tick(p.x),
            bpm: self.bpm(p.y),
        }
    }

    fn point(&self, p: Point) -> TempoPosition {
        TempoPosition {
            tick: whole_tick(self.get_tick(p.x)),
            bpm: self.bpm(p.y).clamp(0.0, self.max_bpm).round(),
        }
    }

    fn rect(&self, event: &TrackEvent) -> Option<Rect> {
        let EventBody::Tempo {
            microseconds_per_beat,
        } = event.body
        else {
            return None;
        };
        let bpm = usec_per_beat_to_bpm(microseconds_per_beat as f64);
        Some(Rect {
            x: self.get_x(event.tick as f64) - POINT_RADIUS,
            y: self.get_y(bpm) - POINT_RADIUS,
            width: POINT_RADIUS * 2.0,
            height: POINT_RADIUS * 2.0,
        })
    }
}

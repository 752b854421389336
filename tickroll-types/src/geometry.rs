use serde::{Deserialize, Serialize};

use crate::{Tick, TrackEvent};

/// Pixel-space point, relative to the canvas origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Pixel-space rectangle handed to the rendering layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

/// Half-open tick interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickRange {
    pub start: Tick,
    pub end: Tick,
}

impl TickRange {
    pub fn new(start: Tick, end: Tick) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    pub fn from_length(start: Tick, length: Tick) -> Self {
        Self::new(start, start.saturating_add(length))
    }

    pub fn contains(&self, tick: Tick) -> bool {
        tick >= self.start && tick < self.end
    }

    /// True when the event's own span touches the range.
    /// Point events overlap when their tick is inside.
    pub fn overlaps_event(&self, event: &TrackEvent) -> bool {
        let end = event.end_tick();
        if end == event.tick {
            return self.contains(event.tick);
        }
        event.tick < self.end && end > self.start
    }
}

use serde::{Deserialize, Serialize};

use super::{whole_tick, CoordTransform, TickTransform};
use crate::{EventBody, Point, Rect, Tick, TrackEvent, MAX_NOTE_NUMBER};

pub const KEY_HEIGHT: f64 = 16.0;
pub const NUMBER_OF_KEYS: u8 = 128;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NotePoint {
    pub tick: f64,
    pub note_number: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePosition {
    pub tick: Tick,
    pub note_number: u8,
}

/// Piano roll grid: x is time, y is pitch with note 127 on the top row.
///
/// Row `n` spans fractional note numbers `(n, n + 1]`, so the top edge of a
/// row maps to `n + 1` and everything below it down to the next row maps to `n`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteCoordTransform {
    pub horizontal: TickTransform,
    pub key_height: f64,
    pub scale_y: f64,
    pub number_of_keys: u8,
}

impl NoteCoordTransform {
    pub fn new(horizontal: TickTransform, key_height: f64, scale_y: f64) -> Self {
        Self {
            horizontal,
            key_height,
            scale_y,
            number_of_keys: NUMBER_OF_KEYS,
        }
    }

    pub fn pixels_per_key(&self) -> f64 {
        self.key_height * self.scale_y
    }

    pub fn content_height(&self) -> f64 {
        self.number_of_keys as f64 * self.pixels_per_key()
    }

    pub fn note_number_fractional(&self, y: f64) -> f64 {
        self.number_of_keys as f64 - y / self.pixels_per_key()
    }

    pub fn note_number(&self, y: f64) -> u8 {
        let n = self.note_number_fractional(y).ceil() - 1.0;
        n.clamp(0.0, MAX_NOTE_NUMBER as f64) as u8
    }

    /// Top edge of the row for `note_number`.
    pub fn get_y(&self, note_number: f64) -> f64 {
        (self.number_of_keys as f64 - note_number - 1.0) * self.pixels_per_key()
    }

    /// Rhythm tracks draw notes as squares centred on their start.
    pub fn drum_rect(&self, event: &TrackEvent) -> Option<Rect> {
        let note_number = event.note_number()?;
        let size = self.pixels_per_key();
        Some(Rect {
            x: self.get_x(event.tick as f64) - size / 2.0,
            y: self.get_y(note_number as f64),
            width: size,
            height: size,
        })
    }
}

impl Default for NoteCoordTransform {
    fn default() -> Self {
        Self::new(TickTransform::default(), KEY_HEIGHT, 1.0)
    }
}

impl CoordTransform for NoteCoordTransform {
    type Fractional = NotePoint;
    type Integral = NotePosition;

    fn horizontal(&self) -> &TickTransform {
        &self.horizontal
    }

    fn point_fractional(&self, p: Point) -> NotePoint {
        NotePoint {
            tick: self.get_tick(p.x),
            note_number: self.note_number_fractional(p.y),
        }
    }

    fn point(&self, p: Point) -> NotePosition {
        NotePosition {
            tick: whole_tick(self.get_tick(p.x)),
            note_number: self.note_number(p.y),
        }
    }

    fn rect(&self, event: &TrackEvent) -> Option<Rect> {
        match event.body {
            EventBody::Note {
                note_number,
                duration,
                ..
            } => Some(Rect {
                x: self.get_x(event.tick as f64),
                y: self.get_y(note_number as f64),
                width: self.get_x(duration as f64),
                height: self.pixels_per_key(),
            }),
            EventBody::Controller { .. }
            | EventBody::PitchBend { .. }
            | EventBody::ProgramChange { .. }
            | EventBody::Tempo { .. }
            | EventBody::TimeSignature { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventId;

    #[test]
    fn top_row_is_highest_note() {
        let t = NoteCoordTransform::default();
        assert_eq!(t.note_number(0.0), 127);
        assert_eq!(t.note_number(15.9), 127);
        assert_eq!(t.note_number(16.0), 126);
        assert_eq!(t.note_number(t.content_height() + 100.0), 0);
    }

    #[test]
    fn row_top_maps_back_to_its_note() {
        let t = NoteCoordTransform::new(TickTransform::default(), 16.0, 1.5);
        for n in [0u8, 60, 127] {
            let y = t.get_y(n as f64) + 1.0;
            assert_eq!(t.note_number(y), n);
        }
    }

    #[test]
    fn fractional_point_keeps_sub_row_precision() {
        let t = NoteCoordTransform::new(TickTransform::new(0.5, 1.0), 16.0, 1.0);
        let p = t.point_fractional(Point::new(60.0, 8.0));
        assert_eq!(p.tick, 120.0);
        assert_eq!(p.note_number, 127.5);
        let q = t.point(Point::new(61.7, 8.0));
        assert_eq!(q, NotePosition { tick: 123, note_number: 127 });
    }

    #[test]
    fn note_rect_spans_duration() {
        let t = NoteCoordTransform::new(TickTransform::new(0.5, 1.0), 16.0, 1.0);
        let e = TrackEvent {
            id: EventId::new(1),
            tick: 480,
            body: EventBody::note(127, 100, 240),
        };
        assert_eq!(
            t.rect(&e),
            Some(Rect { x: 240.0, y: 0.0, width: 120.0, height: 16.0 })
        );
        let bend = TrackEvent {
            id: EventId::new(2),
            tick: 0,
            body: EventBody::PitchBend { value: 0 },
        };
        assert_eq!(t.rect(&bend), None);
    }
}

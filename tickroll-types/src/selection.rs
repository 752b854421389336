//! Rectangular ranges in domain space and the hit-testing over them.

use serde::{Deserialize, Serialize};

use crate::{ArrangePoint, EventId, NotePoint, Quantizer, Tick, TrackEvent};

/// Note-space selection: `[from.tick, to.tick) x [from.note_number, to.note_number)`.
///
/// Always normalized, so `from` holds the minimum of both axes regardless of
/// drag direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub from: NotePoint,
    pub to: NotePoint,
}

impl Selection {
    pub fn from_points(a: NotePoint, b: NotePoint) -> Self {
        Self {
            from: NotePoint {
                tick: a.tick.min(b.tick),
                note_number: a.note_number.min(b.note_number),
            },
            to: NotePoint {
                tick: a.tick.max(b.tick),
                note_number: a.note_number.max(b.note_number),
            },
        }
    }

    /// A click without a drag.
    pub fn is_empty(&self) -> bool {
        self.from.tick == self.to.tick && self.from.note_number == self.to.note_number
    }

    pub fn contains(&self, tick: f64, note_number: f64) -> bool {
        tick >= self.from.tick
            && tick < self.to.tick
            && note_number >= self.from.note_number
            && note_number < self.to.note_number
    }

    pub fn moved(&self, delta_tick: f64, delta_note_number: f64) -> Self {
        let shift = |p: NotePoint| NotePoint {
            tick: p.tick + delta_tick,
            note_number: p.note_number + delta_note_number,
        };
        Self::from_points(shift(self.from), shift(self.to))
    }
}

/// Notes whose `(tick, note_number)` falls inside `selection`.
pub fn events_in_selection<'a>(
    events: &'a [TrackEvent],
    selection: &Selection,
) -> Vec<&'a TrackEvent> {
    events
        .iter()
        .filter(|e| {
            e.note_number()
                .is_some_and(|n| selection.contains(e.tick as f64, n as f64))
        })
        .collect()
}

/// Tick-only selection used by the control pane and the tempo graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSelection {
    pub from_tick: Tick,
    pub to_tick: Tick,
}

impl ControlSelection {
    pub fn from_ticks(a: Tick, b: Tick) -> Self {
        Self {
            from_tick: a.min(b),
            to_tick: a.max(b),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.from_tick == self.to_tick
    }

    pub fn contains(&self, tick: Tick) -> bool {
        tick >= self.from_tick && tick < self.to_tick
    }

    /// Ids of events accepted by `filter` whose tick lies in the range.
    pub fn event_ids<F>(&self, events: &[TrackEvent], filter: F) -> Vec<EventId>
    where
        F: Fn(&TrackEvent) -> bool,
    {
        events
            .iter()
            .filter(|e| self.contains(e.tick) && filter(e))
            .map(|e| e.id)
            .collect()
    }
}

/// Live selection in the arrangement view. Whole grid cells on the time axis
/// and whole tracks on the vertical axis, half-open on both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrangeSelection {
    pub from_tick: Tick,
    pub to_tick: Tick,
    pub from_track_index: usize,
    pub to_track_index: usize,
}

impl ArrangeSelection {
    /// Smallest selection covering the grid cells under both points, limited
    /// to `track_count` tracks.
    pub fn from_points(
        a: ArrangePoint,
        b: ArrangePoint,
        quantizer: &Quantizer,
        track_count: usize,
    ) -> Self {
        let cell = |p: ArrangePoint| {
            let from = quantizer.floor(p.tick.max(0.0));
            let to = quantizer.floor(p.tick.max(0.0) + quantizer.unit()).max(from + 1);
            let track = p.track_index.max(0.0).floor() as usize;
            (from, to, track)
        };
        let (a_from, a_to, a_track) = cell(a);
        let (b_from, b_to, b_track) = cell(b);
        let last = track_count.max(1);
        let from_track_index = a_track.min(b_track).min(last - 1);
        Self {
            from_tick: a_from.min(b_from),
            to_tick: a_to.max(b_to),
            from_track_index,
            to_track_index: (a_track.max(b_track) + 1).clamp(from_track_index + 1, last),
        }
    }

    pub fn start(&self) -> ArrangePoint {
        ArrangePoint {
            tick: self.from_tick as f64,
            track_index: self.from_track_index as f64,
        }
    }

    pub fn track_count(&self) -> usize {
        self.to_track_index - self.from_track_index
    }

    pub fn contains_track(&self, track_index: usize) -> bool {
        track_index >= self.from_track_index && track_index < self.to_track_index
    }

    pub fn contains_tick(&self, tick: Tick) -> bool {
        tick >= self.from_tick && tick < self.to_tick
    }

    /// Shift by whole ticks and tracks. Negative results stop at zero.
    pub fn moved(&self, delta_tick: i64, delta_track: i64) -> Self {
        let shift_tick = |t: Tick| (t as i64 + delta_tick).clamp(0, Tick::MAX as i64) as Tick;
        let shift_track = |i: usize| (i as i64 + delta_track).max(0) as usize;
        let from_tick = shift_tick(self.from_tick);
        let from_track_index = shift_track(self.from_track_index);
        Self {
            from_tick,
            to_tick: from_tick + (self.to_tick - self.from_tick),
            from_track_index,
            to_track_index: from_track_index + self.track_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EventBody, EventId};

    fn np(tick: f64, note_number: f64) -> NotePoint {
        NotePoint { tick, note_number }
    }

    fn note(id: u32, tick: Tick, note_number: u8) -> TrackEvent {
        TrackEvent {
            id: EventId::new(id),
            tick,
            body: EventBody::note(note_number, 100, 120),
        }
    }

    #[test]
    fn from_points_is_symmetric() {
        let points = [np(0.0, 0.0), np(480.0, 64.5), np(120.5, 127.0), np(960.0, 10.0)];
        for a in points {
            for b in points {
                assert_eq!(Selection::from_points(a, b), Selection::from_points(b, a));
            }
        }
    }

    #[test]
    fn click_without_drag_is_empty() {
        let p = np(240.0, 60.0);
        assert!(Selection::from_points(p, p).is_empty());
        assert!(!Selection::from_points(p, np(240.0, 62.0)).is_empty());
        assert!(!Selection::from_points(p, np(480.0, 60.0)).is_empty());
    }

    #[test]
    fn bounds_are_half_open() {
        let events = vec![note(1, 0, 60), note(2, 480, 60), note(3, 240, 64), note(4, 240, 59)];
        let sel = Selection::from_points(np(480.0, 60.0), np(0.0, 64.0));
        let ids: Vec<u32> = events_in_selection(&events, &sel)
            .iter()
            .map(|e| e.id.get())
            .collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn adjacent_selections_do_not_share_events() {
        let events = vec![note(1, 240, 60)];
        let left = Selection::from_points(np(0.0, 0.0), np(240.0, 127.0));
        let right = Selection::from_points(np(240.0, 0.0), np(480.0, 127.0));
        assert_eq!(events_in_selection(&events, &left).len(), 0);
        assert_eq!(events_in_selection(&events, &right).len(), 1);
    }

    #[test]
    fn control_selection_filters_by_tick_and_predicate() {
        let events = vec![
            note(1, 100, 60),
            TrackEvent {
                id: EventId::new(2),
                tick: 100,
                body: EventBody::PitchBend { value: 0 },
            },
        ];
        let sel = ControlSelection::from_ticks(200, 0);
        let ids = sel.event_ids(&events, |e| e.note_number().is_none());
        assert_eq!(ids, vec![EventId::new(2)]);
    }

    #[test]
    fn arrange_selection_covers_cells() {
        let q = Quantizer::new(480, 4);
        let a = ArrangePoint { tick: 130.0, track_index: 2.7 };
        let b = ArrangePoint { tick: 10.0, track_index: 0.2 };
        let sel = ArrangeSelection::from_points(a, b, &q, 8);
        assert_eq!(sel.from_tick, 0);
        assert_eq!(sel.to_tick, 240);
        assert_eq!((sel.from_track_index, sel.to_track_index), (0, 3));
        assert_eq!(sel.track_count(), 3);
    }

    #[test]
    fn arrange_selection_stops_at_last_track() {
        let q = Quantizer::new(480, 4);
        let p = ArrangePoint { tick: 0.0, track_index: 9.0 };
        let sel = ArrangeSelection::from_points(p, p, &q, 3);
        assert_eq!((sel.from_track_index, sel.to_track_index), (2, 3));
    }

    #[test]
    fn arrange_move_keeps_size() {
        let sel = ArrangeSelection {
            from_tick: 480,
            to_tick: 960,
            from_track_index: 1,
            to_track_index: 3,
        };
        let moved = sel.moved(-240, 2);
        assert_eq!(moved.from_tick, 240);
        assert_eq!(moved.to_tick, 720);
        assert_eq!((moved.from_track_index, moved.to_track_index), (3, 5));
    }
}

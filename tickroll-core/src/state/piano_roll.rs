use std::collections::HashSet;

use tickroll_types::{
    CoordTransform, EventId, NoteCoordTransform, Quantizer, Rect, Selection, TickRange, TickTransform,
    TrackEvent, TrackId,
};

use crate::config::ViewSettings;
use crate::observe::Derived;
use crate::song::Song;
use crate::track::Track;

/// Another track's note drawn behind the selected track's notes.
#[derive(Debug, Clone, PartialEq)]
pub struct GhostNote {
    pub id: EventId,
    pub rect: Rect,
    /// Always drawn opaque.
    pub velocity: u8,
}

type WindowKey = (TrackId, u64, TickRange);

#[derive(Debug)]
pub struct PianoRollState {
    pub selected_track_id: Option<TrackId>,
    pub transform: NoteCoordTransform,
    pub quantizer: Quantizer,
    pub scroll_left: f64,
    pub canvas_width: f64,
    /// Live rectangle while dragging; kept after a rubber-band selection.
    pub selection: Option<Selection>,
    pub selected_note_ids: Vec<EventId>,
    pub new_note_velocity: u8,
    /// Tracks excluded from the ghost-note overlay.
    pub not_ghost_track_ids: HashSet<TrackId>,
    windowed: Derived<WindowKey, Vec<TrackEvent>>,
}

impl Default for PianoRollState {
    fn default() -> Self {
        Self {
            selected_track_id: None,
            transform: NoteCoordTransform::default(),
            quantizer: Quantizer::default(),
            scroll_left: 0.0,
            canvas_width: 1000.0,
            selection: None,
            selected_note_ids: Vec::new(),
            new_note_velocity: 100,
            not_ghost_track_ids: HashSet::new(),
            windowed: Derived::new(),
        }
    }
}

impl PianoRollState {
    pub(crate) fn apply_settings(&mut self, view: &ViewSettings, quantizer: Quantizer) {
        self.transform = NoteCoordTransform::new(
            TickTransform::new(view.pixels_per_tick, self.transform.horizontal.scale_x),
            view.key_height,
            self.transform.scale_y,
        );
        self.quantizer = quantizer;
    }

    pub fn visible_range(&self) -> TickRange {
        self.transform
            .horizontal
            .visible_range(self.scroll_left, self.canvas_width)
    }

    /// Events of the selected track overlapping the visible window. Recomputed
    /// only when the track commits or the window moves.
    pub fn windowed_events(&mut self, song: &Song) -> &[TrackEvent] {
        let Some(track) = self.selected_track_id.and_then(|id| song.track(id)) else {
            self.windowed.invalidate();
            return &[];
        };
        let range = self.visible_range();
        let key = (track.id, track.revision(), range);
        self.windowed.get_or_compute(key, || {
            track
                .events()
                .iter()
                .filter(|e| range.overlaps_event(e))
                .cloned()
                .collect()
        })
    }

    /// Rhythm tracks draw notes as squares.
    pub fn note_rect(&self, track: &Track, event: &TrackEvent) -> Option<Rect> {
        if track.is_rhythm_track {
            self.transform.drum_rect(event)
        } else {
            self.transform.rect(event)
        }
    }

    pub fn ghost_track_ids(&self, song: &Song) -> Vec<TrackId> {
        song.tracks()
            .iter()
            .filter(|t| {
                !t.is_conductor_track
                    && Some(t.id) != self.selected_track_id
                    && !self.not_ghost_track_ids.contains(&t.id)
            })
            .map(|t| t.id)
            .collect()
    }

    /// Visible notes of `track_id` as ghost rectangles.
    pub fn ghost_notes(&self, song: &Song, track_id: TrackId) -> Vec<GhostNote> {
        let Some(track) = song.track(track_id) else {
            return Vec::new();
        };
        let range = self.visible_range();
        track
            .events()
            .iter()
            .filter(|e| e.note_number().is_some() && range.overlaps_event(e))
            .filter_map(|e| {
                self.note_rect(track, e).map(|rect| GhostNote {
                    id: e.id,
                    rect,
                    velocity: 127,
                })
            })
            .collect()
    }

    pub fn toggle_ghost_track(&mut self, track_id: TrackId) {
        if !self.not_ghost_track_ids.remove(&track_id) {
            self.not_ghost_track_ids.insert(track_id);
        }
    }

    /// Hide all ghosts when more than half are hidden already, otherwise show all.
    pub fn toggle_all_ghost_tracks(&mut self, song: &Song) {
        if self.not_ghost_track_ids.len() > song.tracks().len() / 2 {
            self.not_ghost_track_ids.clear();
        } else {
            self.not_ghost_track_ids
                .extend(song.tracks().iter().map(|t| t.id));
        }
    }
}

use tickroll_types::{
    ControlSelection, CoordTransform, EventId, EventKind, Point, Quantizer, TempoCoordTransform,
    TickRange, TickTransform, TrackEvent,
};

use crate::config::ViewSettings;
use crate::song::Song;

#[derive(Debug, Clone, PartialEq)]
pub struct TempoEditorState {
    pub transform: TempoCoordTransform,
    pub quantizer: Quantizer,
    pub scroll_left: f64,
    pub canvas_width: f64,
    pub selection: Option<ControlSelection>,
    pub selected_event_ids: Vec<EventId>,
}

impl Default for TempoEditorState {
    fn default() -> Self {
        Self {
            transform: TempoCoordTransform::default(),
            quantizer: Quantizer::default(),
            scroll_left: 0.0,
            canvas_width: 1000.0,
            selection: None,
            selected_event_ids: Vec::new(),
        }
    }
}

impl TempoEditorState {
    pub(crate) fn apply_settings(&mut self, view: &ViewSettings, quantizer: Quantizer) {
        self.transform = TempoCoordTransform::new(
            TickTransform::new(view.pixels_per_tick, self.transform.horizontal.scale_x),
            view.max_bpm,
            view.tempo_height,
        );
        self.quantizer = quantizer;
    }

    pub fn visible_range(&self) -> TickRange {
        self.transform
            .horizontal
            .visible_range(self.scroll_left, self.canvas_width)
    }

    /// Tempo changes on the conductor track inside the visible window.
    pub fn tempo_events<'a>(&self, song: &'a Song) -> Vec<&'a TrackEvent> {
        let range = self.visible_range();
        song.conductor_track()
            .map(|t| {
                t.events()
                    .iter()
                    .filter(|e| e.kind() == EventKind::Tempo && range.contains(e.tick))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Visible tempo point drawn under `p`.
    pub fn event_at(&self, song: &Song, p: Point) -> Option<EventId> {
        self.tempo_events(song)
            .into_iter()
            .find(|e| self.transform.rect(e).is_some_and(|r| r.contains(p)))
            .map(|e| e.id)
    }

    pub fn event_ids_in_selection(&self, song: &Song, selection: &ControlSelection) -> Vec<EventId> {
        song.conductor_track()
            .map(|t| selection.event_ids(t.events(), |e| e.kind() == EventKind::Tempo))
            .unwrap_or_default()
    }
}

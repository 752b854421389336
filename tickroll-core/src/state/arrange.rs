use std::collections::BTreeMap;

use tickroll_types::{
    ArrangeCoordTransform, ArrangePoint, ArrangeSelection, EventId, Quantizer, TickTransform,
};

use crate::config::ViewSettings;
use crate::song::Song;

/// Selected event ids per track index.
pub type ArrangeEventIds = BTreeMap<usize, Vec<EventId>>;

#[derive(Debug, Clone, PartialEq)]
pub struct ArrangeViewState {
    pub transform: ArrangeCoordTransform,
    pub quantizer: Quantizer,
    pub selection: Option<ArrangeSelection>,
    pub selected_event_ids: ArrangeEventIds,
    pub selected_track_index: usize,
}

impl Default for ArrangeViewState {
    fn default() -> Self {
        Self {
            transform: ArrangeCoordTransform::default(),
            quantizer: Quantizer::default(),
            selection: None,
            selected_event_ids: BTreeMap::new(),
            selected_track_index: 0,
        }
    }
}

impl ArrangeViewState {
    pub(crate) fn apply_settings(&mut self, view: &ViewSettings, quantizer: Quantizer) {
        self.transform = ArrangeCoordTransform::new(
            TickTransform::new(view.pixels_per_tick, self.transform.horizontal.scale_x),
            view.arrange_track_height,
        );
        self.quantizer = quantizer;
    }

    pub fn reset_selection(&mut self) {
        self.selection = None;
        self.selected_event_ids.clear();
    }

    /// Rubber-band from `start` to `end` while dragging.
    pub fn resize_selection(&mut self, start: ArrangePoint, end: ArrangePoint, track_count: usize) {
        self.selection = Some(ArrangeSelection::from_points(
            start,
            end,
            &self.quantizer,
            track_count,
        ));
    }

    /// Select the events under the current selection, per track.
    pub fn end_selection(&mut self, song: &Song) {
        self.selected_event_ids.clear();
        let Some(selection) = self.selection else {
            return;
        };
        for index in selection.from_track_index..selection.to_track_index {
            let Some(track) = song.track_at(index) else {
                continue;
            };
            let ids: Vec<EventId> = track
                .events()
                .iter()
                .filter(|e| selection.contains_tick(e.tick))
                .map(|e| e.id)
                .collect();
            if !ids.is_empty() {
                self.selected_event_ids.insert(index, ids);
            }
        }
    }
}

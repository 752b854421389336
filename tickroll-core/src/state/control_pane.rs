use tickroll_types::{
    ControlCoordTransform, ControlSelection, EventId, TickRange, TickTransform, TrackEvent,
    ValueEventType,
};

use crate::track::Track;

/// Main volume.
pub const DEFAULT_CONTROLLER: u8 = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct ControlPaneState {
    pub control_type: ValueEventType,
    pub height: f64,
    pub selection: Option<ControlSelection>,
    pub selected_event_ids: Vec<EventId>,
}

impl Default for ControlPaneState {
    fn default() -> Self {
        Self {
            control_type: ValueEventType::Controller(DEFAULT_CONTROLLER),
            height: 120.0,
            selection: None,
            selected_event_ids: Vec::new(),
        }
    }
}

impl ControlPaneState {
    /// The pane shares its horizontal mapping with the piano roll above it.
    pub fn transform(&self, horizontal: TickTransform) -> ControlCoordTransform {
        ControlCoordTransform::new(horizontal, self.control_type, self.height)
    }

    /// Events of the active control type inside `window`, preceded by the last
    /// one before it so the curve can be drawn from the left edge.
    pub fn control_value_events(&self, track: &Track, window: TickRange) -> Vec<TrackEvent> {
        let value_type = self.control_type;
        let previous = track.last_event_before(window.start, |e| value_type.matches(&e.body));
        previous
            .into_iter()
            .chain(
                track
                    .events()
                    .iter()
                    .filter(|e| value_type.matches(&e.body) && window.overlaps_event(e)),
            )
            .cloned()
            .collect()
    }

    pub fn event_ids_in_selection(&self, track: &Track, selection: &ControlSelection) -> Vec<EventId> {
        let value_type = self.control_type;
        selection.event_ids(track.events(), |e| value_type.matches(&e.body))
    }
}

#![allow(dead_code)]

use tickroll_core::EditorState;
use tickroll_types::{EventBody, EventId, Tick, TickTransform, TrackEvent};

/// Default state with 1 px per tick in every view.
pub fn make_state() -> EditorState {
    let mut state = EditorState::default();
    let one_px_per_tick = TickTransform::new(0.5, 2.0);
    state.piano_roll.transform.horizontal = one_px_per_tick;
    state.tempo_editor.transform.horizontal = one_px_per_tick;
    state.arrange.transform.horizontal = one_px_per_tick;
    state
}

/// Add notes to the selected track and return their ids.
pub fn add_notes(state: &mut EditorState, notes: &[(Tick, u8, u8)]) -> Vec<EventId> {
    let track = state.selected_track_mut().unwrap();
    notes
        .iter()
        .map(|&(tick, note_number, velocity)| {
            track
                .add_event(tick, EventBody::note(note_number, velocity, 60))
                .unwrap()
                .id
        })
        .collect()
}

pub fn notes(state: &EditorState) -> Vec<TrackEvent> {
    state
        .selected_track()
        .unwrap()
        .events()
        .iter()
        .filter(|e| matches!(e.body, EventBody::Note { .. }))
        .cloned()
        .collect()
}

pub fn controller_values(state: &EditorState, controller: u8) -> Vec<(Tick, u8)> {
    state
        .selected_track()
        .unwrap()
        .events()
        .iter()
        .filter_map(|e| match e.body {
            EventBody::Controller {
                controller_type,
                value,
            } if controller_type == controller => Some((e.tick, value)),
            _ => None,
        })
        .collect()
}

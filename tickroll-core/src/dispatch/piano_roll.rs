use tickroll_types::{EventBody, Tick};

use super::{report, report_paste};
use crate::action::{DispatchResult, PianoRollAction};
use crate::actions;
use crate::state::EditorState;

pub(super) fn dispatch_piano_roll(action: &PianoRollAction, state: &mut EditorState) -> DispatchResult {
    match action {
        PianoRollAction::Copy => report(actions::copy_selected_notes(state), |_| false),
        PianoRollAction::Paste => report_paste(actions::paste_notes(state)),
        PianoRollAction::Duplicate => {
            report(actions::duplicate_selected_notes(state), |added| !added.is_empty())
        }
        PianoRollAction::Delete => {
            DispatchResult::from_changed(actions::delete_selected_notes(state) > 0)
        }
        PianoRollAction::SelectTrack(id) => {
            if state.song.track(*id).is_none() {
                return DispatchResult::with_status(format!("no track with id {}", id));
            }
            let piano_roll = &mut state.piano_roll;
            piano_roll.selected_track_id = Some(*id);
            piano_roll.selected_note_ids.clear();
            piano_roll.selection = None;
            state.control_pane.selected_event_ids.clear();
            state.control_pane.selection = None;
            DispatchResult::changed()
        }
        PianoRollAction::CreateNote { note_number, tick } => {
            if state.selected_track().is_none() {
                return DispatchResult::none();
            }
            let duration = state.piano_roll.quantizer.unit().round().max(1.0) as Tick;
            let body = EventBody::note(*note_number, state.piano_roll.new_note_velocity, duration);
            match actions::create_event(state, body, *tick) {
                Ok(id) => {
                    state.piano_roll.selected_note_ids = vec![id];
                    DispatchResult::changed()
                }
                Err(e) => report::<(), _>(Err(e), |_| false),
            }
        }
        PianoRollAction::SetVelocity(velocity) => {
            let ids = state.piano_roll.selected_note_ids.clone();
            if ids.is_empty() {
                return DispatchResult::none();
            }
            actions::change_notes_velocity(state, &ids, *velocity);
            DispatchResult::changed()
        }
        PianoRollAction::BatchVelocity(operation) => DispatchResult::from_changed(
            !actions::batch_update_selected_notes_velocity(state, *operation).is_empty(),
        ),
        PianoRollAction::VelocityRamp {
            start_tick,
            start_value,
            end_tick,
            end_value,
        } => {
            if state.selected_track().is_none() {
                return DispatchResult::none();
            }
            state.push_history();
            let updated = actions::update_velocities_in_range(
                state,
                *start_tick,
                *start_value,
                *end_tick,
                *end_value,
            );
            DispatchResult::from_changed(!updated.is_empty())
        }
        PianoRollAction::ToggleGhostTrack(id) => {
            state.piano_roll.toggle_ghost_track(*id);
            DispatchResult::changed()
        }
        PianoRollAction::ToggleAllGhostTracks => {
            state.piano_roll.toggle_all_ghost_tracks(&state.song);
            DispatchResult::changed()
        }
    }
}

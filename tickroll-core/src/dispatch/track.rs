use super::report;
use crate::action::{DispatchResult, TrackAction};
use crate::actions;
use crate::state::EditorState;

pub(super) fn dispatch_track(action: &TrackAction, state: &mut EditorState) -> DispatchResult {
    match action {
        TrackAction::SetName(name) => {
            DispatchResult::from_changed(actions::set_track_name(state, name))
        }
        TrackAction::SetVolume { track_id, volume } => report(
            actions::set_track_volume(state, *track_id, *volume),
            Option::is_some,
        ),
        TrackAction::SetPan { track_id, pan } => {
            report(actions::set_track_pan(state, *track_id, *pan), Option::is_some)
        }
        TrackAction::SetInstrument {
            track_id,
            program_number,
        } => report(
            actions::set_track_instrument(state, *track_id, *program_number),
            Option::is_some,
        ),
        TrackAction::MuteNote(note_number) => {
            actions::mute_note(state, *note_number);
            DispatchResult::none()
        }
    }
}

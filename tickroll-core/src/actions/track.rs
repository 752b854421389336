//! Per-track settings: name, instrument and the mixer controllers.
//!
//! Volume and pan are stored as controller events at the playback position,
//! so they can change over the song. Settings that a listener would hear are
//! also sent to the live output on the track's channel.

use tickroll_types::{Tick, TrackEvent, TrackId};

use crate::error::EditError;
use crate::state::EditorState;
use crate::track::Track;

/// Rename the selected track. Returns false when no track is selected.
pub fn set_track_name(state: &mut EditorState, name: &str) -> bool {
    if state.selected_track().is_none() {
        return false;
    }
    state.push_history();
    match state.selected_track_mut() {
        Some(track) => {
            track.name = name.to_string();
            true
        }
        None => false,
    }
}

pub fn set_track_volume(
    state: &mut EditorState,
    track_id: TrackId,
    volume: u8,
) -> Result<Option<TrackEvent>, EditError> {
    write_track_setting(state, track_id, |track, position| track.set_volume(volume, position))
}

pub fn set_track_pan(
    state: &mut EditorState,
    track_id: TrackId,
    pan: u8,
) -> Result<Option<TrackEvent>, EditError> {
    write_track_setting(state, track_id, |track, position| track.set_pan(pan, position))
}

/// Switch the track's instrument. The program change sits at the start of
/// the track, independent of the playback position.
pub fn set_track_instrument(
    state: &mut EditorState,
    track_id: TrackId,
    program_number: u8,
) -> Result<Option<TrackEvent>, EditError> {
    write_track_setting(state, track_id, |track, _| track.set_program_number(program_number))
}

/// Stop a previewed note on the selected track's channel.
pub fn mute_note(state: &mut EditorState, note_number: u8) -> bool {
    let Some(channel) = state.selected_track().and_then(|t| t.channel) else {
        return false;
    };
    state.player.stop_note(channel, note_number);
    true
}

fn write_track_setting<F>(
    state: &mut EditorState,
    track_id: TrackId,
    write: F,
) -> Result<Option<TrackEvent>, EditError>
where
    F: FnOnce(&mut Track, Tick) -> Result<TrackEvent, EditError>,
{
    if state.song.track(track_id).is_none() {
        log::debug!(target: "track", "no track {} to update", track_id);
        return Ok(None);
    }
    let position = state.player.position();
    state.push_history();
    let track = state.song.require_track_mut(track_id)?;
    let channel = track.channel;
    let event = write(track, position)?;
    if let Some(channel) = channel {
        state.player.send_event(channel, &event);
    }
    Ok(Some(event))
}

//! Tempo and time-signature edits on the conductor track.

use tickroll_types::{EventBody, EventId, EventKind, EventPatch, Measure, Tick, TrackEvent};

use crate::error::EditError;
use crate::state::EditorState;

pub fn change_tempo(
    state: &mut EditorState,
    id: EventId,
    microseconds_per_beat: u32,
) -> Result<Option<TrackEvent>, EditError> {
    if state.song.conductor_track().is_none() {
        return Ok(None);
    }
    state.push_history();
    let Some(track) = state.song.conductor_track_mut() else {
        return Ok(None);
    };
    track
        .update_event(id, &EventPatch::microseconds_per_beat(microseconds_per_beat as i64))
        .map(Some)
}

/// Add a time signature at the start of the measure containing `tick`.
/// Returns `None` when one already sits there or the song has no conductor track.
pub fn add_time_signature(
    state: &mut EditorState,
    tick: Tick,
    numerator: u8,
    denominator: u8,
) -> Result<Option<TrackEvent>, EditError> {
    let measures = state.song.measures();
    let start = Measure::measure_start(&measures, tick, state.song.timebase);
    let occupied = state
        .song
        .time_signatures()
        .iter()
        .any(|e| e.tick == start);
    if occupied {
        log::debug!(target: "track", "time signature already at tick {}", start);
        return Ok(None);
    }
    if state.song.conductor_track().is_none() {
        return Ok(None);
    }
    state.push_history();
    let Some(track) = state.song.conductor_track_mut() else {
        return Ok(None);
    };
    track
        .add_event(
            start,
            EventBody::TimeSignature {
                numerator,
                denominator,
            },
        )
        .map(Some)
}

pub fn update_time_signature(
    state: &mut EditorState,
    id: EventId,
    numerator: u8,
    denominator: u8,
) -> Result<Option<TrackEvent>, EditError> {
    let Some(conductor) = state.song.conductor_track() else {
        return Ok(None);
    };
    match conductor.get_event_by_id(id) {
        Some(e) if e.kind() == EventKind::TimeSignature => {}
        Some(e) => {
            return Err(EditError::KindMismatch {
                id,
                existing: e.kind(),
                candidate: EventKind::TimeSignature,
            })
        }
        None => return Err(EditError::EventNotFound(id)),
    }
    state.push_history();
    let Some(track) = state.song.conductor_track_mut() else {
        return Ok(None);
    };
    track
        .update_event(
            id,
            &EventPatch::time_signature(numerator as i64, denominator as i64),
        )
        .map(Some)
}

//! Copy, paste, duplicate and delete for the three event families.
//!
//! Notes and control events live on the selected track; tempo events live on
//! the conductor track. Pastes land at the playback position, duplicates right
//! after the copied span. Every paste parses the payload before touching
//! history or the track, so a rejected payload leaves no trace.

use tickroll_types::{ClipboardData, ClipboardKind, EventId, Tick, TrackEvent, TrackId};

use crate::clipboard;
use crate::error::{ClipboardError, EditError};
use crate::state::EditorState;
use crate::track::Track;

fn selected_events<'a>(track: &'a Track, ids: &[EventId]) -> Vec<&'a TrackEvent> {
    track.events().iter().filter(|e| ids.contains(&e.id)).collect()
}

fn conductor_track_id(state: &EditorState) -> Option<TrackId> {
    state.song.conductor_track().map(|t| t.id)
}

/// Write the events `ids` of `track_id` to the clipboard.
/// Returns false when there was nothing to copy.
fn copy_events(
    state: &mut EditorState,
    track_id: Option<TrackId>,
    ids: &[EventId],
    kind: ClipboardKind,
) -> Result<bool, ClipboardError> {
    let Some(track) = track_id.and_then(|id| state.song.track(id)) else {
        return Ok(false);
    };
    let events = selected_events(track, ids)
        .into_iter()
        .filter(|e| kind.accepts(e.kind()));
    let Some(data) = ClipboardData::from_events(kind, events) else {
        return Ok(false);
    };
    log::debug!(target: "clipboard", "copying {} {}", data.events.len(), kind);
    clipboard::write(state.clipboard.as_mut(), &data)?;
    Ok(true)
}

/// Read a `kind` payload and insert it at the playback position in one commit.
fn paste_events(
    state: &mut EditorState,
    track_id: Option<TrackId>,
    kind: ClipboardKind,
) -> Result<Vec<TrackEvent>, ClipboardError> {
    let Some(track_id) = track_id else {
        return Ok(Vec::new());
    };
    let data = match clipboard::read(state.clipboard.as_ref(), kind) {
        Ok(data) => data,
        Err(e) => {
            log::debug!(target: "clipboard", "rejected {} paste: {}", kind, e);
            return Err(e);
        }
    };
    let drafts = data.drafts_at(state.player.position());
    let track = state
        .song
        .track(track_id)
        .ok_or(EditError::TrackNotFound(track_id))?;
    for draft in &drafts {
        track.check_accepts(draft.body.kind())?;
    }
    state.push_history();
    let track = state.song.require_track_mut(track_id)?;
    Ok(track.add_events(drafts)?)
}

/// Copy `ids` shifted by `offset` into the same track.
fn duplicate_events(
    track: &mut Track,
    ids: &[EventId],
    offset: Tick,
) -> Result<Vec<TrackEvent>, EditError> {
    let drafts: Vec<_> = selected_events(track, ids)
        .into_iter()
        .map(|e| {
            let mut draft = e.to_draft();
            draft.tick = e.tick.saturating_add(offset);
            draft
        })
        .collect();
    track.add_events(drafts)
}

/// Span from the first selected event to the last one.
fn point_span(track: &Track, ids: &[EventId]) -> Option<Tick> {
    let events = selected_events(track, ids);
    let min = events.iter().map(|e| e.tick).min()?;
    let max = events.iter().map(|e| e.tick).max()?;
    Some(max - min)
}

pub fn copy_selected_notes(state: &mut EditorState) -> Result<bool, ClipboardError> {
    let ids = state.piano_roll.selected_note_ids.clone();
    let track_id = state.piano_roll.selected_track_id;
    copy_events(state, track_id, &ids, ClipboardKind::NoteEvents)
}

pub fn paste_notes(state: &mut EditorState) -> Result<Vec<TrackEvent>, ClipboardError> {
    let track_id = state.piano_roll.selected_track_id;
    paste_events(state, track_id, ClipboardKind::NoteEvents)
}

/// Duplicate the selected notes right after the selection (or, without a
/// selection rectangle, after the last selected note ends) and select the copies.
pub fn duplicate_selected_notes(state: &mut EditorState) -> Result<Vec<TrackEvent>, EditError> {
    let ids = state.piano_roll.selected_note_ids.clone();
    let selection = state.piano_roll.selection;
    let Some(track) = state.selected_track() else {
        return Ok(Vec::new());
    };
    let notes = selected_events(track, &ids);
    let Some(min_tick) = notes.iter().map(|e| e.tick).min() else {
        return Ok(Vec::new());
    };
    let end_tick = notes.iter().map(|e| e.end_tick()).max().unwrap_or(min_tick);
    let offset = match selection {
        Some(s) if s.to.tick > s.from.tick => (s.to.tick - s.from.tick) as Tick,
        _ => end_tick - min_tick,
    };

    state.push_history();
    let Some(track) = state.selected_track_mut() else {
        return Ok(Vec::new());
    };
    let added = duplicate_events(track, &ids, offset)?;
    state.piano_roll.selected_note_ids = added.iter().map(|e| e.id).collect();
    state.piano_roll.selection = selection.map(|s| s.moved(offset as f64, 0.0));
    Ok(added)
}

pub fn delete_selected_notes(state: &mut EditorState) -> usize {
    let ids = std::mem::take(&mut state.piano_roll.selected_note_ids);
    state.piano_roll.selection = None;
    let track_id = state.piano_roll.selected_track_id;
    delete_events(state, track_id, &ids)
}

pub fn copy_control_selection(state: &mut EditorState) -> Result<bool, ClipboardError> {
    let ids = state.control_pane.selected_event_ids.clone();
    let track_id = state.piano_roll.selected_track_id;
    copy_events(state, track_id, &ids, ClipboardKind::ControlEvents)
}

pub fn paste_control_selection(state: &mut EditorState) -> Result<Vec<TrackEvent>, ClipboardError> {
    let track_id = state.piano_roll.selected_track_id;
    paste_events(state, track_id, ClipboardKind::ControlEvents)
}

pub fn duplicate_control_selection(state: &mut EditorState) -> Result<Vec<TrackEvent>, EditError> {
    let ids = state.control_pane.selected_event_ids.clone();
    let track_id = state.piano_roll.selected_track_id;
    let added = duplicate_point_events(state, track_id, &ids)?;
    if !added.is_empty() {
        state.control_pane.selected_event_ids = added.iter().map(|e| e.id).collect();
    }
    Ok(added)
}

pub fn delete_control_selection(state: &mut EditorState) -> usize {
    let ids = std::mem::take(&mut state.control_pane.selected_event_ids);
    state.control_pane.selection = None;
    let track_id = state.piano_roll.selected_track_id;
    delete_events(state, track_id, &ids)
}

pub fn copy_tempo_selection(state: &mut EditorState) -> Result<bool, ClipboardError> {
    let ids = state.tempo_editor.selected_event_ids.clone();
    let track_id = conductor_track_id(state);
    copy_events(state, track_id, &ids, ClipboardKind::TempoEvents)
}

pub fn paste_tempo_selection(state: &mut EditorState) -> Result<Vec<TrackEvent>, ClipboardError> {
    let track_id = conductor_track_id(state);
    paste_events(state, track_id, ClipboardKind::TempoEvents)
}

pub fn duplicate_tempo_selection(state: &mut EditorState) -> Result<Vec<TrackEvent>, EditError> {
    let ids = state.tempo_editor.selected_event_ids.clone();
    let track_id = conductor_track_id(state);
    let added = duplicate_point_events(state, track_id, &ids)?;
    if !added.is_empty() {
        state.tempo_editor.selected_event_ids = added.iter().map(|e| e.id).collect();
    }
    Ok(added)
}

pub fn delete_tempo_selection(state: &mut EditorState) -> usize {
    let ids = std::mem::take(&mut state.tempo_editor.selected_event_ids);
    state.tempo_editor.selection = None;
    let track_id = conductor_track_id(state);
    delete_events(state, track_id, &ids)
}

/// Duplicate for curves: point events are offset by their own tick span.
fn duplicate_point_events(
    state: &mut EditorState,
    track_id: Option<TrackId>,
    ids: &[EventId],
) -> Result<Vec<TrackEvent>, EditError> {
    let Some(offset) = track_id
        .and_then(|id| state.song.track(id))
        .and_then(|t| point_span(t, ids))
    else {
        return Ok(Vec::new());
    };
    state.push_history();
    let Some(track) = track_id.and_then(|id| state.song.track_mut(id)) else {
        return Ok(Vec::new());
    };
    duplicate_events(track, ids, offset)
}

fn delete_events(state: &mut EditorState, track_id: Option<TrackId>, ids: &[EventId]) -> usize {
    if ids.is_empty() {
        return 0;
    }
    let Some(track_id) = track_id.filter(|id| state.song.track(*id).is_some()) else {
        return 0;
    };
    state.push_history();
    state
        .song
        .track_mut(track_id)
        .map(|t| t.remove_events(ids))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickroll_types::{EventBody, NotePoint, Selection};

    fn state_with_notes(ticks: &[Tick]) -> (EditorState, Vec<EventId>) {
        let mut state = EditorState::default();
        let track = state.selected_track_mut().unwrap();
        let ids = ticks
            .iter()
            .map(|t| track.add_event(*t, EventBody::note(60, 100, 30)).unwrap().id)
            .collect();
        (state, ids)
    }

    fn ticks(track: &Track) -> Vec<Tick> {
        track.events().iter().map(|e| e.tick).collect()
    }

    #[test]
    fn copy_with_nothing_selected_leaves_clipboard_alone() {
        let (mut state, _) = state_with_notes(&[0]);
        assert!(!copy_selected_notes(&mut state).unwrap());
        assert!(state.clipboard.read_text().is_none());
    }

    #[test]
    fn paste_reanchors_at_playback_position() {
        let (mut state, ids) = state_with_notes(&[100, 150]);
        state.piano_roll.selected_note_ids = ids.clone();
        assert!(copy_selected_notes(&mut state).unwrap());
        delete_selected_notes(&mut state);
        state.player.set_position(50);

        let pasted = paste_notes(&mut state).unwrap();
        assert_eq!(pasted.iter().map(|e| e.tick).collect::<Vec<_>>(), vec![50, 100]);
        assert!(pasted.iter().all(|e| !ids.contains(&e.id)));
    }

    #[test]
    fn wrong_payload_kind_is_not_pasted() {
        let (mut state, ids) = state_with_notes(&[0]);
        state.piano_roll.selected_note_ids = ids;
        copy_selected_notes(&mut state).unwrap();
        let undo_before = state.history.undo_len();
        let err = paste_control_selection(&mut state).unwrap_err();
        assert!(matches!(err, ClipboardError::TagMismatch { .. }));
        assert_eq!(state.history.undo_len(), undo_before);
        assert_eq!(state.selected_track().unwrap().events().len(), 1);
    }

    #[test]
    fn duplicate_notes_uses_selection_span() {
        let (mut state, ids) = state_with_notes(&[0, 100]);
        state.piano_roll.selected_note_ids = ids.clone();
        state.piano_roll.selection = Some(Selection::from_points(
            NotePoint { tick: 0.0, note_number: 50.0 },
            NotePoint { tick: 480.0, note_number: 70.0 },
        ));
        let added = duplicate_selected_notes(&mut state).unwrap();
        assert_eq!(added.iter().map(|e| e.tick).collect::<Vec<_>>(), vec![480, 580]);
        assert_eq!(state.piano_roll.selected_note_ids, added.iter().map(|e| e.id).collect::<Vec<_>>());
        assert_eq!(state.piano_roll.selection.unwrap().from.tick, 480.0);
    }

    #[test]
    fn duplicate_notes_without_rectangle_uses_note_extent() {
        let (mut state, ids) = state_with_notes(&[0, 100]);
        state.piano_roll.selected_note_ids = ids;
        duplicate_selected_notes(&mut state).unwrap();
        assert_eq!(ticks(state.selected_track().unwrap()), vec![0, 100, 130, 230]);
    }

    #[test]
    fn duplicate_tempo_appends_after_span() {
        let mut state = EditorState::default();
        let conductor = state.song.conductor_track_mut().unwrap();
        let a = conductor.add_event(480, EventBody::tempo_bpm(100.0)).unwrap();
        let b = conductor.add_event(960, EventBody::tempo_bpm(140.0)).unwrap();
        state.tempo_editor.selected_event_ids = vec![a.id, b.id];
        let added = duplicate_tempo_selection(&mut state).unwrap();
        assert_eq!(added.iter().map(|e| e.tick).collect::<Vec<_>>(), vec![960, 1440]);
    }

    #[test]
    fn delete_with_empty_selection_does_not_touch_history() {
        let (mut state, _) = state_with_notes(&[0]);
        assert_eq!(delete_selected_notes(&mut state), 0);
        assert!(!state.history.can_undo());
    }
}

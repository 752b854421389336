//! Arrangement view edits: events selected across several tracks at once.

use tickroll_types::{EventDraft, EventId, EventPatch, Tick, TrackEvent};

use crate::error::EditError;
use crate::song::Song;
use crate::state::arrange::ArrangeEventIds;
use crate::state::EditorState;

fn shift_tick(tick: Tick, delta: i64) -> Tick {
    (tick as i64 + delta).clamp(0, Tick::MAX as i64) as Tick
}

/// Fails when a conductor-only event in `ids` would land on an instrument
/// track after moving `delta_track` tracks.
pub fn check_move_between_tracks(
    song: &Song,
    ids: &ArrangeEventIds,
    delta_track: i64,
) -> Result<(), EditError> {
    if delta_track == 0 {
        return Ok(());
    }
    for (&index, event_ids) in ids {
        let Some(source) = song.track_at(index) else {
            continue;
        };
        let Some(destination) = usize::try_from(index as i64 + delta_track)
            .ok()
            .and_then(|i| song.track_at(i))
        else {
            continue;
        };
        for e in source.events().iter().filter(|e| event_ids.contains(&e.id)) {
            destination.check_accepts(e.kind())?;
        }
    }
    Ok(())
}

/// Move the events in `ids` by `delta_tick` ticks and `delta_track` tracks.
///
/// Within a track the events keep their ids. Across tracks they are
/// re-created on the destination with fresh ids. Returns the resulting ids
/// keyed by their new track index. Destinations outside the song are skipped.
/// Nothing is changed when a conductor-only event would land on an
/// instrument track.
pub fn move_events_between_tracks(
    song: &mut Song,
    ids: &ArrangeEventIds,
    delta_tick: i64,
    delta_track: i64,
) -> Result<ArrangeEventIds, EditError> {
    let mut result = ArrangeEventIds::new();

    if delta_track == 0 {
        for (&index, event_ids) in ids {
            let Some(track) = song.track_at_mut(index) else {
                continue;
            };
            let updates: Vec<_> = track
                .events()
                .iter()
                .filter(|e| event_ids.contains(&e.id))
                .map(|e| (e.id, EventPatch::tick(shift_tick(e.tick, delta_tick))))
                .collect();
            let moved = track.update_events(&updates);
            result.insert(index, moved.iter().map(|e| e.id).collect());
        }
        return Ok(result);
    }

    check_move_between_tracks(song, ids, delta_track)?;
    let mut moves: Vec<(usize, usize, Vec<EventId>, Vec<EventDraft>)> = Vec::new();
    for (&index, event_ids) in ids {
        let Some(source) = song.track_at(index) else {
            continue;
        };
        let destination_index = index as i64 + delta_track;
        let destination = usize::try_from(destination_index)
            .ok()
            .and_then(|i| song.track_at(i));
        if destination.is_none() {
            log::debug!(target: "track", "no track at index {}, skipping move", destination_index);
            continue;
        }
        let events: Vec<&TrackEvent> = source
            .events()
            .iter()
            .filter(|e| event_ids.contains(&e.id))
            .collect();
        let drafts = events
            .iter()
            .map(|e| EventDraft::new(shift_tick(e.tick, delta_tick), e.body.clone()))
            .collect();
        let removed = events.iter().map(|e| e.id).collect();
        moves.push((index, destination_index as usize, removed, drafts));
    }

    for (source, _, removed, _) in &moves {
        if let Some(track) = song.track_at_mut(*source) {
            track.remove_events(removed);
        }
    }
    for (_, destination, _, drafts) in moves {
        if let Some(track) = song.track_at_mut(destination) {
            let added = track.add_events(drafts)?;
            result
                .entry(destination)
                .or_default()
                .extend(added.iter().map(|e| e.id));
        }
    }
    Ok(result)
}

/// Copy the selected events of every track to just after the selection and
/// move the selection onto the copies.
pub fn duplicate_arrange_selection(state: &mut EditorState) -> Result<ArrangeEventIds, EditError> {
    let Some(selection) = state.arrange.selection else {
        return Ok(ArrangeEventIds::new());
    };
    if state.arrange.selected_event_ids.is_empty() {
        return Ok(ArrangeEventIds::new());
    }
    let offset = selection.to_tick - selection.from_tick;
    state.push_history();

    let mut added_ids = ArrangeEventIds::new();
    for (&index, ids) in &state.arrange.selected_event_ids {
        let Some(track) = state.song.track_at_mut(index) else {
            continue;
        };
        let drafts: Vec<EventDraft> = track
            .events()
            .iter()
            .filter(|e| ids.contains(&e.id))
            .map(|e| EventDraft::new(e.tick.saturating_add(offset), e.body.clone()))
            .collect();
        let added = track.add_events(drafts)?;
        added_ids.insert(index, added.iter().map(|e| e.id).collect());
    }
    state.arrange.selection = Some(selection.moved(offset as i64, 0));
    state.arrange.selected_event_ids = added_ids.clone();
    Ok(added_ids)
}

pub fn delete_arrange_selection(state: &mut EditorState) -> usize {
    if state.arrange.selected_event_ids.is_empty() {
        return 0;
    }
    state.push_history();
    let ids = std::mem::take(&mut state.arrange.selected_event_ids);
    ids.iter()
        .filter_map(|(&index, ids)| state.song.track_at_mut(index).map(|t| t.remove_events(ids)))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickroll_types::{ArrangeSelection, EventBody};

    fn song_with_two_tracks() -> (Song, EventId) {
        let mut song = Song::default();
        song.create_track("Bass", Some(1));
        let id = song
            .track_at_mut(1)
            .unwrap()
            .add_event(480, EventBody::note(60, 100, 120))
            .unwrap()
            .id;
        (song, id)
    }

    #[test]
    fn move_within_track_keeps_ids() {
        let (mut song, id) = song_with_two_tracks();
        let ids = ArrangeEventIds::from([(1, vec![id])]);
        let moved = move_events_between_tracks(&mut song, &ids, -600, 0).unwrap();
        assert_eq!(moved.get(&1), Some(&vec![id]));
        assert_eq!(song.track_at(1).unwrap().events()[0].tick, 0);
    }

    #[test]
    fn move_to_next_track() {
        let (mut song, id) = song_with_two_tracks();
        let ids = ArrangeEventIds::from([(1, vec![id])]);
        let moved = move_events_between_tracks(&mut song, &ids, 120, 1).unwrap();
        assert!(song.track_at(1).unwrap().is_empty());
        let bass = song.track_at(2).unwrap();
        assert_eq!(bass.events().len(), 1);
        assert_eq!(bass.events()[0].tick, 600);
        assert_eq!(moved.get(&2), Some(&vec![bass.events()[0].id]));
    }

    #[test]
    fn tempo_cannot_leave_conductor_track() {
        let (mut song, _) = song_with_two_tracks();
        let tempo = song.track_at(0).unwrap().events()[0].id;
        let before = song.snapshot();
        let ids = ArrangeEventIds::from([(0, vec![tempo])]);
        let err = move_events_between_tracks(&mut song, &ids, 0, 1).unwrap_err();
        assert!(matches!(err, EditError::ConductorOnlyEvent { .. }));
        assert_eq!(song.snapshot(), before);
    }

    #[test]
    fn duplicate_moves_selection_onto_copies() {
        let (song, id) = song_with_two_tracks();
        let mut state = EditorState::new(song);
        state.arrange.selection = Some(ArrangeSelection {
            from_tick: 0,
            to_tick: 960,
            from_track_index: 1,
            to_track_index: 2,
        });
        state.arrange.selected_event_ids = ArrangeEventIds::from([(1, vec![id])]);
        let added = duplicate_arrange_selection(&mut state).unwrap();
        let track = state.song.track_at(1).unwrap();
        assert_eq!(track.events().iter().map(|e| e.tick).collect::<Vec<_>>(), vec![480, 1440]);
        assert_eq!(state.arrange.selection.unwrap().from_tick, 960);
        assert_eq!(state.arrange.selected_event_ids, added);
    }

    #[test]
    fn delete_clears_selected_ids() {
        let (song, id) = song_with_two_tracks();
        let mut state = EditorState::new(song);
        state.arrange.selected_event_ids = ArrangeEventIds::from([(1, vec![id])]);
        assert_eq!(delete_arrange_selection(&mut state), 1);
        assert!(state.arrange.selected_event_ids.is_empty());
        assert!(state.history.can_undo());
    }
}

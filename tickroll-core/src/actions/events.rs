//! Note and control-curve edits on the selected track.

use tickroll_types::{
    EventBody, EventDraft, EventId, EventPatch, Quantizer, Tick, TrackEvent, ValueEventType,
    MAX_VELOCITY, MIN_VELOCITY,
};

use crate::error::EditError;
use crate::state::EditorState;
use crate::track::Track;

/// Linear ramp through `(start_tick, start_value)` and `(end_tick, end_value)`,
/// clamped to the span of the two values and floored.
fn ramp(start_tick: f64, start_value: f64, end_tick: f64, end_value: f64) -> impl Fn(f64) -> f64 {
    let min_value = start_value.min(end_value);
    let max_value = start_value.max(end_value);
    move |tick| {
        if end_tick == start_tick {
            return end_value.floor();
        }
        let t = (tick - start_tick) / (end_tick - start_tick);
        (t * (end_value - start_value) + start_value)
            .clamp(min_value, max_value)
            .floor()
    }
}

/// Replace the `value_type` events under a pencil stroke with a grid-aligned ramp.
///
/// Existing matching events between the two ticks (widened to the snapped
/// boundaries) are removed, except one sitting exactly on `start_tick`, which
/// is the point the stroke began at. One event per grid tick in the closed
/// snapped range is then inserted. Both steps form one transaction.
pub fn update_events_in_range(
    track: &mut Track,
    quantizer: &Quantizer,
    value_type: ValueEventType,
    start_value: f64,
    end_value: f64,
    start_tick: f64,
    end_tick: f64,
) -> Result<Vec<TrackEvent>, EditError> {
    let min_tick = start_tick.min(end_tick);
    let max_tick = start_tick.max(end_tick);
    let snapped_start = quantizer.floor(min_tick.max(0.0));
    let snapped_end = quantizer.floor(max_tick.max(0.0));
    let value_at = ramp(start_tick, start_value, end_tick, end_value);

    let low = min_tick.min(snapped_start as f64);
    let high = max_tick.max(snapped_end as f64);
    let replaced: Vec<EventId> = track
        .events()
        .iter()
        .filter(|e| {
            let tick = e.tick as f64;
            value_type.matches(&e.body) && tick != start_tick && tick >= low && tick <= high
        })
        .map(|e| e.id)
        .collect();

    let drafts: Vec<EventDraft> = quantizer
        .grid_ticks(snapped_start, snapped_end)
        .into_iter()
        .map(|tick| EventDraft::new(tick, value_type.create(value_at(tick as f64) as i64)))
        .collect();

    track.transaction(|it| {
        it.remove_events(&replaced);
        it.add_events(drafts)
    })
}

/// [`update_events_in_range`] on the track that holds `value_type`: the
/// conductor track for tempo, the selected track otherwise. No track, no-op.
pub fn update_value_events(
    state: &mut EditorState,
    value_type: ValueEventType,
    start_value: f64,
    end_value: f64,
    start_tick: f64,
    end_tick: f64,
) -> Result<Vec<TrackEvent>, EditError> {
    let (track, quantizer) = match value_type {
        ValueEventType::Tempo => (state.song.conductor_track_mut(), state.tempo_editor.quantizer),
        ValueEventType::Controller(_) | ValueEventType::PitchBend => {
            let quantizer = state.piano_roll.quantizer;
            let id = state.piano_roll.selected_track_id;
            (id.and_then(|id| state.song.track_mut(id)), quantizer)
        }
    };
    match track {
        Some(track) => update_events_in_range(
            track,
            &quantizer,
            value_type,
            start_value,
            end_value,
            start_tick,
            end_tick,
        ),
        None => Ok(Vec::new()),
    }
}

/// Insert `body` on the selected track at the snapped `tick`, or at the
/// playback position when no tick is given. An explicit tick also sounds the
/// event right away.
///
/// # Panics
///
/// Panics when no track is selected: callers only offer this with a track open.
pub fn create_event(
    state: &mut EditorState,
    body: EventBody,
    tick: Option<Tick>,
) -> Result<EventId, EditError> {
    let (track_id, channel) = state
        .selected_track()
        .map(|t| (t.id, t.channel))
        .expect("create_event called without a selected track");
    state.push_history();
    let at = state
        .piano_roll
        .quantizer
        .round(tick.unwrap_or_else(|| state.player.position()) as f64);
    let event = state
        .song
        .require_track_mut(track_id)?
        .create_or_update(EventDraft::new(at, body))?;
    if let (Some(_), Some(channel)) = (tick, channel) {
        state.player.send_event(channel, &event);
    }
    Ok(event.id)
}

/// Set the value of the selected control events, or create one at the
/// playback position when none are selected.
pub fn create_or_update_control_value(
    state: &mut EditorState,
    value_type: ValueEventType,
    value: i64,
) -> Result<(), EditError> {
    if state.selected_track().is_none() {
        return Ok(());
    }
    state.push_history();
    let position = state.player.position();
    let selected = state.control_pane.selected_event_ids.clone();
    let Some(track) = state.selected_track_mut() else {
        return Ok(());
    };
    let existing: Vec<EventId> = selected
        .into_iter()
        .filter(|id| track.get_event_by_id(*id).is_some())
        .collect();
    if existing.is_empty() {
        track.create_or_update(EventDraft::new(position, value_type.create(value)))?;
    } else {
        let patch = value_type.value_patch(value);
        let updates: Vec<(EventId, EventPatch)> =
            existing.into_iter().map(|id| (id, patch.clone())).collect();
        track.update_events(&updates);
    }
    Ok(())
}

/// Ramp the velocity of notes starting in `[min tick, max tick]`: the selected
/// notes when there are any, otherwise every note on the track.
pub fn update_velocities_in_range(
    state: &mut EditorState,
    start_tick: f64,
    start_value: f64,
    end_tick: f64,
    end_value: f64,
) -> Vec<TrackEvent> {
    let selected = state.piano_roll.selected_note_ids.clone();
    let Some(track) = state.selected_track_mut() else {
        return Vec::new();
    };
    let min_tick = start_tick.min(end_tick);
    let max_tick = start_tick.max(end_tick);
    let value_at = ramp(start_tick, start_value, end_tick, end_value);

    let notes: Vec<&TrackEvent> = if selected.is_empty() {
        track.events().iter().filter(|e| e.velocity().is_some()).collect()
    } else {
        selected
            .iter()
            .filter_map(|id| track.get_event_by_id(*id))
            .filter(|e| e.velocity().is_some())
            .collect()
    };
    let updates: Vec<(EventId, EventPatch)> = notes
        .into_iter()
        .filter(|e| (e.tick as f64) >= min_tick && (e.tick as f64) <= max_tick)
        .map(|e| (e.id, EventPatch::velocity(value_at(e.tick as f64) as i64)))
        .collect();
    track.update_events(&updates)
}

/// Set one velocity on `ids` and remember it for new notes.
pub fn change_notes_velocity(state: &mut EditorState, ids: &[EventId], velocity: u8) {
    if state.selected_track().is_none() {
        return;
    }
    state.push_history();
    if let Some(track) = state.selected_track_mut() {
        let updates: Vec<(EventId, EventPatch)> = ids
            .iter()
            .map(|id| (*id, EventPatch::velocity(velocity as i64)))
            .collect();
        track.update_events(&updates);
    }
    state.piano_roll.new_note_velocity = velocity.clamp(MIN_VELOCITY, MAX_VELOCITY);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BatchOperation {
    Set(f64),
    Add(f64),
    Multiply(f64),
}

impl BatchOperation {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            BatchOperation::Set(v) => v,
            BatchOperation::Add(v) => value + v,
            BatchOperation::Multiply(v) => value * v,
        }
    }
}

/// Apply `operation` to the velocity of each note in `ids`, floored and clamped
/// to `[1, 127]`. Ids that are missing or not notes are skipped.
pub fn batch_update_notes_velocity(
    track: &mut Track,
    ids: &[EventId],
    operation: BatchOperation,
) -> Vec<TrackEvent> {
    let updates: Vec<(EventId, EventPatch)> = ids
        .iter()
        .filter_map(|id| track.get_event_by_id(*id))
        .filter_map(|e| e.velocity().map(|v| (e.id, v)))
        .map(|(id, v)| {
            let value = operation
                .apply(v as f64)
                .floor()
                .clamp(MIN_VELOCITY as f64, MAX_VELOCITY as f64);
            (id, EventPatch::velocity(value as i64))
        })
        .collect();
    track.update_events(&updates)
}

pub fn batch_update_selected_notes_velocity(
    state: &mut EditorState,
    operation: BatchOperation,
) -> Vec<TrackEvent> {
    if state.selected_track().is_none() {
        return Vec::new();
    }
    state.push_history();
    let ids = state.piano_roll.selected_note_ids.clone();
    match state.selected_track_mut() {
        Some(track) => batch_update_notes_velocity(track, &ids, operation),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickroll_types::TrackId;

    fn cc_values(track: &Track) -> Vec<(Tick, u8)> {
        track
            .events()
            .iter()
            .filter_map(|e| match e.body {
                EventBody::Controller { value, .. } => Some((e.tick, value)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn range_fill_hits_grid_with_exact_endpoints() {
        let mut track = Track::new(TrackId::new(1), "Lead", Some(0));
        let q = Quantizer::new(480, 4);
        update_events_in_range(
            &mut track,
            &q,
            ValueEventType::Controller(7),
            10.0,
            100.0,
            0.0,
            480.0,
        )
        .unwrap();
        assert_eq!(
            cc_values(&track),
            vec![(0, 10), (120, 32), (240, 55), (360, 77), (480, 100)]
        );
    }

    #[test]
    fn range_fill_keeps_event_at_stroke_origin() {
        let mut track = Track::new(TrackId::new(1), "Lead", Some(0));
        let q = Quantizer::new(480, 4);
        let origin = track
            .add_event(130, EventBody::Controller { controller_type: 7, value: 1 })
            .unwrap();
        let other = track
            .add_event(200, EventBody::Controller { controller_type: 7, value: 2 })
            .unwrap();
        let pan = track
            .add_event(200, EventBody::Controller { controller_type: 10, value: 2 })
            .unwrap();
        update_events_in_range(&mut track, &q, ValueEventType::Controller(7), 50.0, 50.0, 130.0, 250.0)
            .unwrap();
        assert!(track.get_event_by_id(origin.id).is_some());
        assert!(track.get_event_by_id(other.id).is_none());
        assert!(track.get_event_by_id(pan.id).is_some());
        assert_eq!(
            cc_values(&track).iter().filter(|(t, _)| *t == 120 || *t == 240).count(),
            2
        );
    }

    #[test]
    fn range_fill_backwards_drag() {
        let mut track = Track::new(TrackId::new(1), "Lead", Some(0));
        let q = Quantizer::new(480, 4);
        update_events_in_range(&mut track, &q, ValueEventType::PitchBend, 0.0, 8000.0, 240.0, 0.0)
            .unwrap();
        let values: Vec<(Tick, u16)> = track
            .events()
            .iter()
            .filter_map(|e| match e.body {
                EventBody::PitchBend { value } => Some((e.tick, value)),
                _ => None,
            })
            .collect();
        assert_eq!(values, vec![(0, 8000), (120, 4000), (240, 0)]);
    }

    #[test]
    fn same_tick_stroke_is_constant() {
        let mut track = Track::new(TrackId::new(1), "Lead", Some(0));
        let q = Quantizer::new(480, 4);
        update_events_in_range(&mut track, &q, ValueEventType::Controller(1), 10.0, 64.0, 250.0, 250.0)
            .unwrap();
        assert_eq!(cc_values(&track), vec![(240, 64)]);
    }

    #[test]
    fn multiply_clamps_velocity() {
        let mut track = Track::new(TrackId::new(1), "Lead", Some(0));
        let n = track.add_event(0, EventBody::note(60, 64, 120)).unwrap();
        batch_update_notes_velocity(&mut track, &[n.id], BatchOperation::Multiply(2.0));
        assert_eq!(track.events()[0].velocity(), Some(127));
        batch_update_notes_velocity(&mut track, &[n.id], BatchOperation::Add(-500.0));
        assert_eq!(track.events()[0].velocity(), Some(1));
        batch_update_notes_velocity(&mut track, &[n.id], BatchOperation::Set(80.7));
        assert_eq!(track.events()[0].velocity(), Some(80));
    }

    #[test]
    fn batch_skips_non_notes() {
        let mut track = Track::new(TrackId::new(1), "Lead", Some(0));
        let pb = track.add_event(0, EventBody::PitchBend { value: 100 }).unwrap();
        let updated = batch_update_notes_velocity(&mut track, &[pb.id, EventId::new(9)], BatchOperation::Set(1.0));
        assert!(updated.is_empty());
    }

    #[test]
    fn create_event_snaps_to_grid() {
        let mut state = EditorState::default();
        state.player.set_position(250);
        let id = create_event(&mut state, EventBody::note(60, 100, 120), None).unwrap();
        let event = state.selected_track().unwrap().get_event_by_id(id).unwrap().clone();
        assert_eq!(event.tick, 480);
        assert_eq!(state.history.undo_len(), 1);
    }

    #[test]
    #[should_panic(expected = "create_event called without a selected track")]
    fn create_event_needs_selected_track() {
        let mut state = EditorState::default();
        state.piano_roll.selected_track_id = None;
        let _ = create_event(&mut state, EventBody::note(60, 100, 120), Some(0));
    }
}

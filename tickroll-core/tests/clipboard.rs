mod common;

use tickroll_core::action::{Action, ControlAction, PianoRollAction, TempoAction};
use tickroll_core::clipboard::{self, ClipboardIo, MemoryClipboard};
use tickroll_core::{dispatch_action, ClipboardError, EditorState};
use tickroll_types::{ClipboardData, ClipboardKind, EventBody, EventId, TrackEvent};

#[test]
fn paste_reanchors_at_playhead_with_fresh_ids() {
    let mut state = common::make_state();
    let ids = common::add_notes(&mut state, &[(100, 60, 100), (150, 64, 90)]);
    state.piano_roll.selected_note_ids = ids.clone();

    dispatch_action(&Action::PianoRoll(PianoRollAction::Copy), &mut state);
    state.player.set_position(50);
    let result = dispatch_action(&Action::PianoRoll(PianoRollAction::Paste), &mut state);
    assert!(result.changed);

    let notes = common::notes(&state);
    assert_eq!(notes.len(), 4);
    let pasted: Vec<_> = notes.iter().filter(|e| !ids.contains(&e.id)).collect();
    assert_eq!(
        pasted.iter().map(|e| (e.tick, e.note_number().unwrap())).collect::<Vec<_>>(),
        vec![(50, 60), (100, 64)]
    );
    assert_eq!(state.history.undo_len(), 1);
}

#[test]
fn payload_of_another_kind_is_rejected_without_trace() {
    let mut state = common::make_state();
    state
        .song
        .conductor_track_mut()
        .unwrap()
        .add_event(480, EventBody::tempo_bpm(90.0))
        .unwrap();
    state.tempo_editor.selected_event_ids = state
        .song
        .conductor_track()
        .unwrap()
        .events()
        .iter()
        .filter(|e| matches!(e.body, EventBody::Tempo { .. }))
        .map(|e| e.id)
        .collect();
    dispatch_action(&Action::Tempo(TempoAction::Copy), &mut state);

    let before = common::notes(&state);
    let err = tickroll_core::actions::paste_notes(&mut state).unwrap_err();
    assert!(matches!(
        err,
        ClipboardError::TagMismatch {
            expected: ClipboardKind::NoteEvents,
            found: ClipboardKind::TempoEvents,
        }
    ));
    assert_eq!(common::notes(&state), before);
    assert!(!state.history.can_undo());

    // Through dispatch the rejection becomes a status line.
    let result = dispatch_action(&Action::PianoRoll(PianoRollAction::Paste), &mut state);
    assert!(!result.changed);
    assert!(result.status.is_some());
}

#[test]
fn malformed_payloads_paste_nothing() {
    let smuggled = ClipboardData {
        kind: ClipboardKind::NoteEvents,
        events: vec![TrackEvent {
            id: EventId::new(1),
            tick: 0,
            body: EventBody::tempo_bpm(120.0),
        }],
    };
    let mut io = MemoryClipboard::new();
    clipboard::write(&mut io, &smuggled).unwrap();

    assert_rejected(Box::new(io), |e| matches!(e, ClipboardError::Schema(_)));
    assert_rejected(Box::new(text_clipboard("not json")), |e| {
        matches!(e, ClipboardError::Json(_))
    });
    assert_rejected(Box::new(text_clipboard("   ")), |e| matches!(e, ClipboardError::Empty));
    assert_rejected(Box::new(MemoryClipboard::new()), |e| {
        matches!(e, ClipboardError::Empty)
    });
}

fn assert_rejected(io: Box<dyn ClipboardIo>, expected: fn(&ClipboardError) -> bool) {
    let mut state = EditorState::default().with_clipboard(io);
    let err = tickroll_core::actions::paste_notes(&mut state).unwrap_err();
    assert!(expected(&err), "unexpected error {:?}", err);
    assert!(common::notes(&state).is_empty());
    assert!(!state.history.can_undo());
}

#[test]
fn control_events_round_trip_through_clipboard() {
    let mut state = common::make_state();
    let track = state.selected_track_mut().unwrap();
    let a = track
        .add_event(240, EventBody::Controller { controller_type: 7, value: 20 })
        .unwrap();
    let b = track
        .add_event(360, EventBody::Controller { controller_type: 7, value: 90 })
        .unwrap();
    state.control_pane.selected_event_ids = vec![a.id, b.id];

    dispatch_action(&Action::Control(ControlAction::Copy), &mut state);
    state.player.set_position(960);
    dispatch_action(&Action::Control(ControlAction::Paste), &mut state);
    assert_eq!(
        common::controller_values(&state, 7),
        vec![(240, 20), (360, 90), (960, 20), (1080, 90)]
    );

    dispatch_action(&Action::Control(ControlAction::Delete), &mut state);
    assert_eq!(common::controller_values(&state, 7), vec![(960, 20), (1080, 90)]);
    assert!(state.control_pane.selected_event_ids.is_empty());
}

fn text_clipboard(text: &str) -> MemoryClipboard {
    let mut io = MemoryClipboard::new();
    io.write_text(text.to_string());
    io
}

#[test]
fn paste_onto_missing_track_leaves_no_undo_step() {
    let mut state = common::make_state();
    let ids = common::add_notes(&mut state, &[(0, 60, 100)]);
    state.piano_roll.selected_note_ids = ids;
    dispatch_action(&Action::PianoRoll(PianoRollAction::Copy), &mut state);

    state.piano_roll.selected_track_id = Some(tickroll_types::TrackId::new(77));
    let err = tickroll_core::actions::paste_notes(&mut state).unwrap_err();
    assert!(matches!(
        err,
        ClipboardError::Edit(tickroll_core::EditError::TrackNotFound(_))
    ));
    assert!(!state.history.can_undo());
}

use tickroll_types::{
    events_in_selection, ControlSelection, CoordTransform, NotePoint, Point, Selection, Tick,
};

use super::{Gesture, Phase};
use crate::error::EditError;
use crate::state::EditorState;

/// Rubber-band selection of notes in the piano roll.
#[derive(Debug)]
pub struct NoteSelectionGesture {
    phase: Phase,
    start_px: Point,
    start: NotePoint,
}

impl NoteSelectionGesture {
    /// Press on empty grid space. Moves the playhead there when stopped and
    /// starts an empty selection.
    pub fn pointer_down(state: &mut EditorState, start_px: Point) -> Self {
        let start = state.piano_roll.transform.point_fractional(start_px);
        if !state.player.is_playing() {
            let tick = state.piano_roll.quantizer.round(start.tick);
            state.player.set_position(tick);
        }
        state.control_pane.selected_event_ids.clear();
        state.piano_roll.selection = Some(Selection::from_points(start, start));
        Self {
            phase: Phase::Dragging,
            start_px,
            start,
        }
    }
}

impl Gesture for NoteSelectionGesture {
    fn phase(&self) -> Phase {
        self.phase
    }

    fn pointer_move(&mut self, state: &mut EditorState, delta: Point) -> Result<(), EditError> {
        let piano_roll = &mut state.piano_roll;
        let end = piano_roll.transform.point_fractional(self.start_px.add(delta));
        let q = piano_roll.quantizer;
        piano_roll.selection = Some(Selection::from_points(
            NotePoint {
                tick: q.round(self.start.tick) as f64,
                ..self.start
            },
            NotePoint {
                tick: q.round(end.tick) as f64,
                ..end
            },
        ));
        Ok(())
    }

    /// A click without a drag clears the selection; otherwise the notes in
    /// the rectangle become selected and the rectangle stays.
    fn pointer_up(&mut self, state: &mut EditorState) -> Result<(), EditError> {
        self.phase = Phase::Settled;
        let Some(selection) = state.piano_roll.selection else {
            return Ok(());
        };
        if selection.is_empty() {
            state.piano_roll.selection = None;
            state.piano_roll.selected_note_ids.clear();
            return Ok(());
        }
        let ids = state
            .selected_track()
            .map(|track| {
                events_in_selection(track.events(), &selection)
                    .into_iter()
                    .map(|e| e.id)
                    .collect()
            })
            .unwrap_or_default();
        state.piano_roll.selected_note_ids = ids;
        Ok(())
    }
}

/// Tick-range selection in the control pane.
#[derive(Debug)]
pub struct ControlSelectionGesture {
    phase: Phase,
    start_x: f64,
    start_tick: Tick,
}

impl ControlSelectionGesture {
    pub fn pointer_down(state: &mut EditorState, start_px: Point) -> Self {
        state.control_pane.selected_event_ids.clear();
        let horizontal = state.piano_roll.transform.horizontal;
        let start_tick = state.piano_roll.quantizer.round(horizontal.get_tick(start_px.x));
        state.piano_roll.selection = None;
        state.piano_roll.selected_note_ids.clear();
        if !state.player.is_playing() {
            state.player.set_position(start_tick);
        }
        state.control_pane.selection = Some(ControlSelection::from_ticks(start_tick, start_tick));
        Self {
            phase: Phase::Dragging,
            start_x: start_px.x,
            start_tick,
        }
    }
}

impl Gesture for ControlSelectionGesture {
    fn phase(&self) -> Phase {
        self.phase
    }

    fn pointer_move(&mut self, state: &mut EditorState, delta: Point) -> Result<(), EditError> {
        let horizontal = state.piano_roll.transform.horizontal;
        let end_tick = state
            .piano_roll
            .quantizer
            .round(horizontal.get_tick(self.start_x + delta.x));
        state.control_pane.selection = Some(ControlSelection::from_ticks(self.start_tick, end_tick));
        Ok(())
    }

    /// Select the events under the range; the range itself is dropped.
    fn pointer_up(&mut self, state: &mut EditorState) -> Result<(), EditError> {
        self.phase = Phase::Settled;
        let selection = state.control_pane.selection.take();
        let ids = match (selection, state.selected_track()) {
            (Some(selection), Some(track)) => {
                state.control_pane.event_ids_in_selection(track, &selection)
            }
            _ => Vec::new(),
        };
        state.control_pane.selected_event_ids = ids;
        Ok(())
    }
}

/// Tick-range selection in the tempo graph. Resolves to the tempo events in
/// the range on release.
#[derive(Debug)]
pub struct TempoSelectionGesture {
    phase: Phase,
    start_x: f64,
    start_tick: Tick,
}

impl TempoSelectionGesture {
    pub fn pointer_down(state: &mut EditorState, start_px: Point) -> Self {
        let tempo_editor = &mut state.tempo_editor;
        tempo_editor.selected_event_ids.clear();
        let horizontal = tempo_editor.transform.horizontal;
        let start_tick = tempo_editor.quantizer.round(horizontal.get_tick(start_px.x));
        tempo_editor.selection = Some(ControlSelection::from_ticks(start_tick, start_tick));
        if !state.player.is_playing() {
            state.player.set_position(start_tick);
        }
        Self {
            phase: Phase::Dragging,
            start_x: start_px.x,
            start_tick,
        }
    }
}

impl Gesture for TempoSelectionGesture {
    fn phase(&self) -> Phase {
        self.phase
    }

    fn pointer_move(&mut self, state: &mut EditorState, delta: Point) -> Result<(), EditError> {
        let tempo_editor = &mut state.tempo_editor;
        let horizontal = tempo_editor.transform.horizontal;
        let end_tick = tempo_editor
            .quantizer
            .round(horizontal.get_tick(self.start_x + delta.x));
        tempo_editor.selection = Some(ControlSelection::from_ticks(self.start_tick, end_tick));
        Ok(())
    }

    fn pointer_up(&mut self, state: &mut EditorState) -> Result<(), EditError> {
        self.phase = Phase::Settled;
        let ids = match state.tempo_editor.selection.take() {
            Some(selection) => state.tempo_editor.event_ids_in_selection(&state.song, &selection),
            None => Vec::new(),
        };
        state.tempo_editor.selected_event_ids = ids;
        Ok(())
    }
}

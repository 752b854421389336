use tickroll_types::{ArrangePoint, CoordTransform, Point};

use super::{Gesture, Phase};
use crate::actions::{check_move_between_tracks, move_events_between_tracks};
use crate::error::EditError;
use crate::history::GestureId;
use crate::state::EditorState;

/// Rubber-band selection across tracks in the arrangement view.
#[derive(Debug)]
pub struct ArrangeCreateSelectionGesture {
    phase: Phase,
    start_px: Point,
    start: ArrangePoint,
}

impl ArrangeCreateSelectionGesture {
    pub fn pointer_down(state: &mut EditorState, start_px: Point) -> Self {
        let arrange = &mut state.arrange;
        let start = arrange.transform.point_fractional(start_px);
        arrange.reset_selection();
        arrange.selected_track_index = start.track_index.max(0.0).floor() as usize;
        if !state.player.is_playing() {
            let tick = state.arrange.quantizer.round(start.tick);
            state.player.set_position(tick);
        }
        Self {
            phase: Phase::Dragging,
            start_px,
            start,
        }
    }
}

impl Gesture for ArrangeCreateSelectionGesture {
    fn phase(&self) -> Phase {
        self.phase
    }

    fn pointer_move(&mut self, state: &mut EditorState, delta: Point) -> Result<(), EditError> {
        let track_count = state.song.tracks().len();
        let arrange = &mut state.arrange;
        let end = arrange.transform.point_fractional(self.start_px.add(delta));
        arrange.resize_selection(self.start, end, track_count);
        Ok(())
    }

    fn pointer_up(&mut self, state: &mut EditorState) -> Result<(), EditError> {
        self.phase = Phase::Settled;
        state.arrange.end_selection(&state.song);
        Ok(())
    }
}

/// Drag of the arrangement selection and its events, snapped to the grid on
/// the time axis and to whole tracks vertically. The first real movement
/// records the undo step.
#[derive(Debug)]
pub struct ArrangeMoveSelectionGesture {
    phase: Phase,
    gesture: GestureId,
    origin_px: Point,
    moved: bool,
}

impl ArrangeMoveSelectionGesture {
    /// Press inside the current selection. Idle when there is none.
    pub fn pointer_down(state: &mut EditorState) -> Self {
        let gesture = state.history.begin_gesture();
        let transform = state.arrange.transform;
        let (phase, origin_px) = match state.arrange.selection {
            Some(selection) => (
                Phase::Dragging,
                Point::new(
                    transform.get_x(selection.from_tick as f64),
                    transform.get_y(selection.from_track_index as f64),
                ),
            ),
            None => (Phase::Idle, Point::default()),
        };
        Self {
            phase,
            gesture,
            origin_px,
            moved: false,
        }
    }
}

impl Gesture for ArrangeMoveSelectionGesture {
    fn phase(&self) -> Phase {
        self.phase
    }

    fn pointer_move(&mut self, state: &mut EditorState, delta: Point) -> Result<(), EditError> {
        let Some(selection) = state.arrange.selection else {
            return Ok(());
        };
        let quantizer = state.arrange.quantizer;
        let raw = state
            .arrange
            .transform
            .point_fractional(self.origin_px.add(delta));
        let max_track_index = state.song.tracks().len().saturating_sub(selection.track_count());
        let point = ArrangePoint {
            tick: quantizer.round(raw.tick) as f64,
            track_index: raw.track_index.round(),
        }
        .clamp(max_track_index as f64);

        let step = point.sub(selection.start());
        let (delta_tick, delta_track) = (step.tick as i64, step.track_index as i64);
        if delta_tick == 0 && delta_track == 0 {
            return Ok(());
        }
        check_move_between_tracks(&state.song, &state.arrange.selected_event_ids, delta_track)?;
        if !self.moved {
            state.push_history_for(self.gesture);
            self.moved = true;
        }

        let ids = move_events_between_tracks(
            &mut state.song,
            &state.arrange.selected_event_ids,
            delta_tick,
            delta_track,
        )?;
        state.arrange.selection = Some(selection.moved(delta_tick, delta_track));
        state.arrange.selected_event_ids = ids;
        Ok(())
    }

    fn pointer_up(&mut self, _state: &mut EditorState) -> Result<(), EditError> {
        self.phase = Phase::Settled;
        Ok(())
    }
}

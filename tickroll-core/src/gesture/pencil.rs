use tickroll_types::{
    ControlCoordTransform, EventBody, EventDraft, Point, Quantizer, TrackId, ValueEventType,
};

use super::{Gesture, Phase};
use crate::actions::update_value_events;
use crate::error::EditError;
use crate::history::GestureId;
use crate::state::EditorState;

/// Freehand drawing on a value curve: a controller or pitch-bend lane in the
/// control pane, or the tempo graph when `value_type` is
/// [`ValueEventType::Tempo`].
///
/// The press writes one event at the snapped tick. Each move then replaces
/// the stretch between the previous pointer position and the new one with a
/// grid-aligned ramp. The whole stroke is a single undo step.
#[derive(Debug)]
pub struct ValuePencilGesture {
    phase: Phase,
    gesture: GestureId,
    value_type: ValueEventType,
    start_px: Point,
    last_tick: f64,
    last_value: f64,
}

impl ValuePencilGesture {
    /// Returns a gesture in [`Phase::Idle`] when there is no track to draw on.
    pub fn pointer_down(
        state: &mut EditorState,
        value_type: ValueEventType,
        start_px: Point,
    ) -> Result<Self, EditError> {
        let gesture = state.history.begin_gesture();
        let (tick, value) = locate(state, value_type, start_px);
        let mut this = Self {
            phase: Phase::Idle,
            gesture,
            value_type,
            start_px,
            last_tick: tick,
            last_value: value,
        };
        let Some(track_id) = target_track(state, value_type) else {
            log::debug!(target: "gesture", "pencil pressed without a target track");
            return Ok(this);
        };

        state.push_history_for(gesture);
        let at = quantizer(state, value_type).round(tick);
        let body = match value_type {
            ValueEventType::Tempo => EventBody::tempo_bpm(value),
            ValueEventType::Controller(_) | ValueEventType::PitchBend => {
                value_type.create(value.round() as i64)
            }
        };
        state
            .song
            .require_track_mut(track_id)?
            .create_or_update(EventDraft::new(at, body))?;
        this.phase = Phase::Dragging;
        Ok(this)
    }
}

impl Gesture for ValuePencilGesture {
    fn phase(&self) -> Phase {
        self.phase
    }

    fn pointer_move(&mut self, state: &mut EditorState, delta: Point) -> Result<(), EditError> {
        let (tick, value) = locate(state, self.value_type, self.start_px.add(delta));
        state.push_history_for(self.gesture);
        update_value_events(
            state,
            self.value_type,
            self.last_value,
            value,
            self.last_tick,
            tick,
        )?;
        self.last_tick = tick;
        self.last_value = value;
        Ok(())
    }

    fn pointer_up(&mut self, _state: &mut EditorState) -> Result<(), EditError> {
        self.phase = Phase::Settled;
        Ok(())
    }
}

fn target_track(state: &EditorState, value_type: ValueEventType) -> Option<TrackId> {
    match value_type {
        ValueEventType::Tempo => state.song.conductor_track().map(|t| t.id),
        ValueEventType::Controller(_) | ValueEventType::PitchBend => {
            state.selected_track().map(|t| t.id)
        }
    }
}

fn quantizer(state: &EditorState, value_type: ValueEventType) -> Quantizer {
    match value_type {
        ValueEventType::Tempo => state.tempo_editor.quantizer,
        ValueEventType::Controller(_) | ValueEventType::PitchBend => state.piano_roll.quantizer,
    }
}

/// Tick and value under `px`, with the value clamped to the curve's range.
fn locate(state: &EditorState, value_type: ValueEventType, px: Point) -> (f64, f64) {
    match value_type {
        ValueEventType::Tempo => {
            let transform = &state.tempo_editor.transform;
            let bpm = transform.bpm(px.y).clamp(0.0, transform.max_bpm);
            (transform.horizontal.get_tick(px.x), bpm)
        }
        ValueEventType::Controller(_) | ValueEventType::PitchBend => {
            // The lane being drawn, not necessarily the one on display.
            let transform = ControlCoordTransform::new(
                state.piano_roll.transform.horizontal,
                value_type,
                state.control_pane.height,
            );
            (transform.horizontal.get_tick(px.x), transform.value_fractional(px.y))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickroll_types::{TickTransform, TrackEvent};

    fn tempo_events(state: &EditorState) -> Vec<(u32, f64)> {
        state
            .song
            .conductor_track()
            .unwrap()
            .events()
            .iter()
            .filter_map(|e: &TrackEvent| {
                ValueEventType::Tempo.value_of(&e.body).map(|bpm| (e.tick, bpm))
            })
            .collect()
    }

    fn tempo_state() -> EditorState {
        let mut state = EditorState::default();
        // 1 px per tick; 1 px per BPM.
        state.tempo_editor.transform.horizontal = TickTransform::new(0.5, 2.0);
        state.tempo_editor.transform.max_bpm = 320.0;
        state.tempo_editor.transform.height = 320.0;
        state
    }

    #[test]
    fn stroke_is_one_undo_step() {
        let mut state = tempo_state();
        let before = tempo_events(&state);
        let mut g =
            ValuePencilGesture::pointer_down(&mut state, ValueEventType::Tempo, Point::new(480.0, 220.0))
                .unwrap();
        assert_eq!(g.phase(), Phase::Dragging);
        g.pointer_move(&mut state, Point::new(120.0, 0.0)).unwrap();
        g.pointer_move(&mut state, Point::new(240.0, -20.0)).unwrap();
        g.pointer_up(&mut state).unwrap();
        assert_eq!(state.history.undo_len(), 1);
        assert!(tempo_events(&state).contains(&(480, 100.0)));

        state.undo();
        assert_eq!(tempo_events(&state), before);
    }

    #[test]
    fn control_stroke_replaces_press_point_with_ramp() {
        let mut state = EditorState::default();
        state.piano_roll.transform.horizontal = TickTransform::new(0.5, 2.0);
        state.control_pane.height = 131.0;
        // Drawable height is 127 px: value 127 at y = 2, value 0 at y = 129.
        let volume = ValueEventType::Controller(7);
        let mut g = ValuePencilGesture::pointer_down(&mut state, volume, Point::new(5.0, 129.0)).unwrap();
        g.pointer_move(&mut state, Point::new(475.0, -127.0)).unwrap();
        let values: Vec<(u32, u8)> = state
            .selected_track()
            .unwrap()
            .events()
            .iter()
            .filter_map(|e| match e.body {
                EventBody::Controller { value, .. } => Some((e.tick, value)),
                _ => None,
            })
            .collect();
        assert_eq!(values, vec![(0, 0), (120, 30), (240, 62), (360, 94), (480, 127)]);
    }

    #[test]
    fn no_track_means_idle() {
        let mut state = EditorState::default();
        state.piano_roll.selected_track_id = None;
        let g = ValuePencilGesture::pointer_down(&mut state, ValueEventType::PitchBend, Point::new(0.0, 0.0))
            .unwrap();
        assert_eq!(g.phase(), Phase::Idle);
        assert!(!state.history.can_undo());
    }
}

use tickroll_types::{
    bpm_to_usec_per_beat, usec_per_beat_to_bpm, CoordTransform, EventBody, EventId, EventPatch,
    Point, TempoPoint, Tick,
};

use super::{Gesture, Phase, TempoSelectionGesture};
use crate::error::EditError;
use crate::state::EditorState;

/// Press in the tempo graph: drag the tempo point under the pointer, or
/// start a range selection on empty space.
pub fn tempo_pointer_down(state: &mut EditorState, start_px: Point) -> Box<dyn Gesture> {
    match state.tempo_editor.event_at(&state.song, start_px) {
        Some(hit) => Box::new(TempoDragGesture::pointer_down(state, hit, start_px)),
        None => Box::new(TempoSelectionGesture::pointer_down(state, start_px)),
    }
}

#[derive(Debug, Clone, Copy)]
struct Origin {
    id: EventId,
    tick: Tick,
    bpm: f64,
}

/// Drag of the selected tempo points in the tempo graph.
///
/// Ticks move by whole grid cells measured on the grabbed point, so the
/// grabbed point lands on the grid and the others keep their offsets to it.
/// BPM moves by the raw pointer delta, clamped to the graph's range.
#[derive(Debug)]
pub struct TempoDragGesture {
    phase: Phase,
    start_px: Point,
    start: TempoPoint,
    grabbed_tick: Tick,
    origins: Vec<Origin>,
}

impl TempoDragGesture {
    /// Press on the tempo point `hit`. Selects it unless it is already part
    /// of the selection. Returns an idle gesture if `hit` is not a tempo event.
    pub fn pointer_down(state: &mut EditorState, hit: EventId, start_px: Point) -> Self {
        let start = state.tempo_editor.transform.point_fractional(start_px);
        let mut this = Self {
            phase: Phase::Idle,
            start_px,
            start,
            grabbed_tick: 0,
            origins: Vec::new(),
        };

        let gesture = state.history.begin_gesture();
        state.push_history_for(gesture);
        if !state.tempo_editor.selected_event_ids.contains(&hit) {
            state.tempo_editor.selected_event_ids = vec![hit];
        }

        let Some(conductor) = state.song.conductor_track() else {
            return this;
        };
        this.origins = state
            .tempo_editor
            .selected_event_ids
            .iter()
            .filter_map(|id| conductor.get_event_by_id(*id))
            .filter_map(|e| match e.body {
                EventBody::Tempo {
                    microseconds_per_beat,
                } => Some(Origin {
                    id: e.id,
                    tick: e.tick,
                    bpm: usec_per_beat_to_bpm(microseconds_per_beat as f64),
                }),
                _ => None,
            })
            .collect();
        let Some(grabbed) = this.origins.iter().find(|o| o.id == hit) else {
            log::debug!(target: "gesture", "tempo drag on non-tempo event {}", hit);
            return this;
        };
        this.grabbed_tick = grabbed.tick;
        this.phase = Phase::Dragging;
        this
    }
}

impl Gesture for TempoDragGesture {
    fn phase(&self) -> Phase {
        self.phase
    }

    fn pointer_move(&mut self, state: &mut EditorState, delta: Point) -> Result<(), EditError> {
        let transform = state.tempo_editor.transform;
        let quantizer = state.tempo_editor.quantizer;
        let pos = transform.point_fractional(self.start_px.add(delta));

        let delta_tick = pos.tick - self.start.tick;
        let moved = self.grabbed_tick as f64 + delta_tick;
        let quantized_delta_tick = delta_tick - (moved - quantizer.round(moved) as f64);
        let delta_bpm = pos.bpm - self.start.bpm;

        let updates: Vec<(EventId, EventPatch)> = self
            .origins
            .iter()
            .map(|o| {
                let tick = (o.tick as f64 + quantized_delta_tick).floor().max(0.0) as Tick;
                let bpm = (o.bpm + delta_bpm).clamp(0.0, transform.max_bpm);
                let usec = bpm_to_usec_per_beat(bpm).floor();
                (o.id, EventPatch::microseconds_per_beat(usec as i64).with_tick(tick))
            })
            .collect();
        if let Some(conductor) = state.song.conductor_track_mut() {
            conductor.update_events(&updates);
        }
        Ok(())
    }

    fn pointer_up(&mut self, _state: &mut EditorState) -> Result<(), EditError> {
        self.phase = Phase::Settled;
        Ok(())
    }
}

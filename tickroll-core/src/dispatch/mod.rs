mod arrange;
mod control;
mod piano_roll;
mod tempo;
mod track;

use std::fmt::Display;

use tickroll_types::Quantizer;

use crate::action::{Action, DispatchResult, QuantizeAction, QuantizeTarget};
use crate::error::ClipboardError;
use crate::state::EditorState;

/// Dispatch an action against the editor state.
///
/// Actions push their own undo snapshot right before their first write, so
/// no-op actions leave history untouched. Failures never propagate: they are
/// logged and reported back as a status message.
pub fn dispatch_action(action: &Action, state: &mut EditorState) -> DispatchResult {
    match action {
        Action::Undo => DispatchResult::from_changed(state.undo()),
        Action::Redo => DispatchResult::from_changed(state.redo()),
        Action::PianoRoll(a) => piano_roll::dispatch_piano_roll(a, state),
        Action::Control(a) => control::dispatch_control(a, state),
        Action::Tempo(a) => tempo::dispatch_tempo(a, state),
        Action::Arrange(a) => arrange::dispatch_arrange(a, state),
        Action::Track(a) => track::dispatch_track(a, state),
        Action::Quantize(target, a) => dispatch_quantize(*target, a, state),
        Action::None => DispatchResult::none(),
    }
}

fn dispatch_quantize(
    target: QuantizeTarget,
    action: &QuantizeAction,
    state: &mut EditorState,
) -> DispatchResult {
    let quantizer = match target {
        QuantizeTarget::PianoRoll => &mut state.piano_roll.quantizer,
        QuantizeTarget::Tempo => &mut state.tempo_editor.quantizer,
        QuantizeTarget::Arrange => &mut state.arrange.quantizer,
    };
    let next = match action {
        QuantizeAction::StepDenominator(delta) => quantizer.step_denominator(*delta),
        QuantizeAction::SetValue(value) => {
            Quantizer::from_value(quantizer.timebase, *value, quantizer.enabled)
        }
        QuantizeAction::ToggleEnabled => quantizer.enabled(!quantizer.enabled),
    };
    let changed = next != *quantizer;
    *quantizer = next;
    DispatchResult::from_changed(changed)
}

/// Map an action's outcome onto a dispatch result.
fn report<T, E: Display>(result: Result<T, E>, changed: impl FnOnce(&T) -> bool) -> DispatchResult {
    match result {
        Ok(value) => DispatchResult::from_changed(changed(&value)),
        Err(e) => {
            log::debug!(target: "dispatch", "action failed: {}", e);
            DispatchResult::with_status(e.to_string())
        }
    }
}

/// Like [`report`], but an empty clipboard is a quiet no-op.
fn report_paste<T>(result: Result<Vec<T>, ClipboardError>) -> DispatchResult {
    match result {
        Err(ClipboardError::Empty) => DispatchResult::none(),
        other => report(other, |pasted| !pasted.is_empty()),
    }
}

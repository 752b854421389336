use super::{report, report_paste};
use crate::action::{DispatchResult, TempoAction};
use crate::actions;
use crate::state::EditorState;

pub(super) fn dispatch_tempo(action: &TempoAction, state: &mut EditorState) -> DispatchResult {
    match action {
        TempoAction::Copy => report(actions::copy_tempo_selection(state), |_| false),
        TempoAction::Paste => report_paste(actions::paste_tempo_selection(state)),
        TempoAction::Duplicate => {
            report(actions::duplicate_tempo_selection(state), |added| !added.is_empty())
        }
        TempoAction::Delete => DispatchResult::from_changed(actions::delete_tempo_selection(state) > 0),
        TempoAction::ChangeTempo {
            id,
            microseconds_per_beat,
        } => report(
            actions::change_tempo(state, *id, *microseconds_per_beat),
            Option::is_some,
        ),
        TempoAction::AddTimeSignature {
            tick,
            numerator,
            denominator,
        } => report(
            actions::add_time_signature(state, *tick, *numerator, *denominator),
            Option::is_some,
        ),
        TempoAction::UpdateTimeSignature {
            id,
            numerator,
            denominator,
        } => report(
            actions::update_time_signature(state, *id, *numerator, *denominator),
            Option::is_some,
        ),
    }
}

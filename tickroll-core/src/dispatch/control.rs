use super::{report, report_paste};
use crate::action::{ControlAction, DispatchResult};
use crate::actions;
use crate::state::EditorState;

pub(super) fn dispatch_control(action: &ControlAction, state: &mut EditorState) -> DispatchResult {
    match action {
        ControlAction::Copy => report(actions::copy_control_selection(state), |_| false),
        ControlAction::Paste => report_paste(actions::paste_control_selection(state)),
        ControlAction::Duplicate => {
            report(actions::duplicate_control_selection(state), |added| !added.is_empty())
        }
        ControlAction::Delete => {
            DispatchResult::from_changed(actions::delete_control_selection(state) > 0)
        }
        ControlAction::SetControlType(value_type) => {
            let pane = &mut state.control_pane;
            if pane.control_type == *value_type {
                return DispatchResult::none();
            }
            pane.control_type = *value_type;
            pane.selection = None;
            pane.selected_event_ids.clear();
            DispatchResult::changed()
        }
        ControlAction::SetValue(value) => {
            if state.selected_track().is_none() {
                return DispatchResult::none();
            }
            let value_type = state.control_pane.control_type;
            report(
                actions::create_or_update_control_value(state, value_type, *value),
                |_| true,
            )
        }
    }
}

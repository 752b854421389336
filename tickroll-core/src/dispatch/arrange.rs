use super::report;
use crate::action::{ArrangeAction, DispatchResult};
use crate::actions;
use crate::state::EditorState;

pub(super) fn dispatch_arrange(action: &ArrangeAction, state: &mut EditorState) -> DispatchResult {
    match action {
        ArrangeAction::Duplicate => {
            report(actions::duplicate_arrange_selection(state), |added| !added.is_empty())
        }
        ArrangeAction::Delete => {
            DispatchResult::from_changed(actions::delete_arrange_selection(state) > 0)
        }
        ArrangeAction::ResetSelection => {
            let had_selection = state.arrange.selection.is_some();
            state.arrange.reset_selection();
            DispatchResult::from_changed(had_selection)
        }
    }
}

//! Pointer gestures as explicit state machines.
//!
//! A gesture is created by its `pointer_down` constructor, which performs the
//! press side effects and leaves it [`Phase::Dragging`]. It then receives
//! `pointer_move` with the pointer offset from the press point, and settles
//! on `pointer_up`. All per-gesture data lives in the gesture value, so a new
//! press always starts from fresh state.
//!
//! [`DragSession`] owns the active gesture and guarantees it is dropped when
//! the pointer is released, when the host detaches, or when another press
//! replaces it.

mod arrange;
mod pencil;
mod selection;
mod tempo_drag;

pub use arrange::{ArrangeCreateSelectionGesture, ArrangeMoveSelectionGesture};
pub use pencil::ValuePencilGesture;
pub use selection::{ControlSelectionGesture, NoteSelectionGesture, TempoSelectionGesture};
pub use tempo_drag::{tempo_pointer_down, TempoDragGesture};

use tickroll_types::Point;

use crate::error::EditError;
use crate::state::EditorState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Dragging,
    Settled,
}

pub trait Gesture {
    fn phase(&self) -> Phase;

    /// `delta` is the pointer offset in pixels from the press point.
    fn pointer_move(&mut self, state: &mut EditorState, delta: Point) -> Result<(), EditError>;

    fn pointer_up(&mut self, state: &mut EditorState) -> Result<(), EditError>;
}

/// Holds at most one gesture between press and release.
#[derive(Default)]
pub struct DragSession {
    active: Option<Box<dyn Gesture>>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start routing pointer input to `gesture`, dropping any gesture still
    /// attached without settling it.
    pub fn begin(&mut self, gesture: Box<dyn Gesture>) {
        if self.active.is_some() {
            log::debug!(target: "gesture", "replacing an unfinished gesture");
        }
        self.active = Some(gesture);
    }

    pub fn pointer_move(&mut self, state: &mut EditorState, delta: Point) -> Result<(), EditError> {
        match self.active.as_mut() {
            Some(gesture) if gesture.phase() == Phase::Dragging => {
                gesture.pointer_move(state, delta)
            }
            _ => Ok(()),
        }
    }

    /// Settle and drop the active gesture. The gesture is gone even when
    /// settling fails.
    pub fn pointer_up(&mut self, state: &mut EditorState) -> Result<(), EditError> {
        match self.active.take() {
            Some(mut gesture) if gesture.phase() == Phase::Dragging => gesture.pointer_up(state),
            _ => Ok(()),
        }
    }

    /// Drop the active gesture without settling it, e.g. when the view goes
    /// away mid-drag. Returns whether a gesture was attached.
    pub fn detach(&mut self) -> bool {
        let detached = self.active.take().is_some();
        if detached {
            log::debug!(target: "gesture", "detached mid-drag");
        }
        detached
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

impl std::fmt::Debug for DragSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragSession")
            .field("active", &self.active.as_ref().map(|g| g.phase()))
            .finish()
    }
}

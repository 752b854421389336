use std::collections::VecDeque;

use crate::song::{Song, SongSnapshot};

pub const DEFAULT_HISTORY_DEPTH: usize = 500;

/// Identifies one pointer gesture. All snapshot requests made with the same id
/// share the snapshot taken before the gesture's first mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GestureId(u64);

/// Snapshot-based undo/redo over the whole song.
pub struct History {
    undo_stack: VecDeque<SongSnapshot>,
    redo_stack: VecDeque<SongSnapshot>,
    max_depth: usize,
    last_gesture: Option<GestureId>,
    next_gesture: u64,
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_depth: max_depth.max(1),
            last_gesture: None,
            next_gesture: 0,
        }
    }

    pub fn begin_gesture(&mut self) -> GestureId {
        let id = GestureId(self.next_gesture);
        self.next_gesture += 1;
        id
    }

    /// Snapshot `song` before mutating it.
    pub fn push(&mut self, song: &Song) {
        self.last_gesture = None;
        self.push_entry(song.snapshot());
    }

    /// Snapshot once per gesture. Returns false when the gesture already has one.
    pub fn push_for_gesture(&mut self, gesture: GestureId, song: &Song) -> bool {
        if self.last_gesture == Some(gesture) {
            log::debug!(target: "history", "gesture {:?} already snapshotted", gesture);
            return false;
        }
        self.push_entry(song.snapshot());
        self.last_gesture = Some(gesture);
        true
    }

    fn push_entry(&mut self, entry: SongSnapshot) {
        if self.undo_stack.len() >= self.max_depth {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(entry);
        self.redo_stack.clear();
    }

    /// Returns false if there was nothing to undo.
    pub fn undo(&mut self, song: &mut Song) -> bool {
        self.last_gesture = None;
        let Some(entry) = self.undo_stack.pop_back() else {
            return false;
        };
        self.redo_stack.push_back(song.snapshot());
        song.restore(entry);
        true
    }

    /// Returns false if there was nothing to redo.
    pub fn redo(&mut self, song: &mut Song) -> bool {
        self.last_gesture = None;
        let Some(entry) = self.redo_stack.pop_back() else {
            return false;
        };
        self.undo_stack.push_back(song.snapshot());
        song.restore(entry);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.last_gesture = None;
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl std::fmt::Debug for History {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("History")
            .field("undo", &self.undo_stack.len())
            .field("redo", &self.redo_stack.len())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

pub mod arrange;
pub mod control_pane;
pub mod piano_roll;
pub mod tempo_editor;

pub use arrange::ArrangeViewState;
pub use control_pane::ControlPaneState;
pub use piano_roll::{GhostNote, PianoRollState};
pub use tempo_editor::TempoEditorState;

use crate::clipboard::{ClipboardIo, MemoryClipboard};
use crate::config::Config;
use crate::history::{GestureId, History};
use crate::player::{Player, PlayerState};
use crate::song::Song;
use crate::track::Track;

/// Everything an edit can touch, passed explicitly to actions and gestures.
pub struct EditorState {
    pub song: Song,
    /// Undo/redo history (owned by state so actions can push snapshots)
    pub history: History,
    pub player: Box<dyn Player>,
    pub clipboard: Box<dyn ClipboardIo>,
    pub piano_roll: PianoRollState,
    pub control_pane: ControlPaneState,
    pub tempo_editor: TempoEditorState,
    pub arrange: ArrangeViewState,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(Song::default())
    }
}

impl EditorState {
    /// Built-in defaults, an idle transport and an in-memory clipboard.
    /// The first instrument track is selected.
    pub fn new(song: Song) -> Self {
        let mut piano_roll = PianoRollState::default();
        piano_roll.selected_track_id = song
            .tracks()
            .iter()
            .find(|t| !t.is_conductor_track)
            .map(|t| t.id);
        Self {
            song,
            history: History::default(),
            player: Box::new(PlayerState::new()),
            clipboard: Box::new(MemoryClipboard::new()),
            piano_roll,
            control_pane: ControlPaneState::default(),
            tempo_editor: TempoEditorState::default(),
            arrange: ArrangeViewState::default(),
        }
    }

    pub fn from_config(config: &Config, song: Song) -> Self {
        let mut state = Self::new(song);
        let view = config.view();
        let quantizer = config.quantizer();
        state.history = History::new(config.history_depth());
        state.piano_roll.apply_settings(&view, quantizer);
        state.piano_roll.new_note_velocity = config.new_note_velocity();
        state.control_pane.height = view.control_height;
        state.tempo_editor.apply_settings(&view, quantizer);
        state.arrange.apply_settings(&view, quantizer);
        state
    }

    pub fn with_player(mut self, player: Box<dyn Player>) -> Self {
        self.player = player;
        self
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardIo>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Snapshot the song before an edit that is its own gesture.
    pub fn push_history(&mut self) {
        self.history.push(&self.song);
    }

    /// Snapshot the song unless `gesture` already did.
    pub fn push_history_for(&mut self, gesture: GestureId) -> bool {
        self.history.push_for_gesture(gesture, &self.song)
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.song)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.song)
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.piano_roll
            .selected_track_id
            .and_then(|id| self.song.track(id))
    }

    pub fn selected_track_mut(&mut self) -> Option<&mut Track> {
        let id = self.piano_roll.selected_track_id?;
        self.song.track_mut(id)
    }
}

//! # tickroll-core
//!
//! Editing core for the tickroll piano-roll editor. Owns the song model,
//! undo history, clipboard plumbing and the pointer gestures of each view,
//! independent of any UI toolkit.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tickroll_core::action::{Action, PianoRollAction};
//! use tickroll_core::config::Config;
//! use tickroll_core::dispatch::dispatch_action;
//! use tickroll_core::gesture::{DragSession, NoteSelectionGesture};
//! use tickroll_core::song::Song;
//! use tickroll_core::state::EditorState;
//!
//! // 1. Build state from config (embedded defaults + user override)
//! let config = Config::load();
//! let mut state = EditorState::from_config(&config, Song::default());
//!
//! // 2. Commands go through dispatch; undo snapshots are taken by the actions
//! let result = dispatch_action(&Action::PianoRoll(PianoRollAction::Paste), &mut state);
//!
//! // 3. Pointer input is routed to one gesture at a time
//! let mut session = DragSession::new();
//! session.begin(Box::new(NoteSelectionGesture::pointer_down(&mut state, press)));
//! session.pointer_move(&mut state, offset)?;
//! session.pointer_up(&mut state)?;
//! ```
//!
//! ## Module Overview
//!
//! - [`track`] / [`song`]: sorted event storage with transactions and change notification
//! - [`history`]: snapshot undo/redo with per-gesture coalescing
//! - [`state`]: `EditorState` and the per-view state (piano roll, control pane, tempo, arrange)
//! - [`actions`]: the mutations behind every command
//! - [`action`] / [`dispatch`]: command enums and `dispatch_action()`
//! - [`gesture`]: pointer gestures and `DragSession`
//! - [`clipboard`]: JSON clipboard payloads behind the `ClipboardIo` seam
//! - [`config`]: TOML configuration loading

pub mod action;
pub mod actions;
pub mod clipboard;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod gesture;
pub mod history;
pub mod observe;
pub mod player;
pub mod song;
pub mod state;
pub mod track;

pub use action::{Action, DispatchResult};
pub use dispatch::dispatch_action;
pub use error::{ClipboardError, EditError};
pub use history::{GestureId, History};
pub use song::Song;
pub use state::EditorState;
pub use track::Track;

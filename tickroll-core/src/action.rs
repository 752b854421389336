//! Action types for the dispatch system.
//!
//! Keyboard shortcuts and menu commands become an [`Action`]; pointer drags go
//! through [`crate::gesture`] instead.

use tickroll_types::{EventId, Tick, TrackId, ValueEventType};

use crate::actions::events::BatchOperation;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Undo,
    Redo,
    PianoRoll(PianoRollAction),
    Control(ControlAction),
    Tempo(TempoAction),
    Arrange(ArrangeAction),
    Track(TrackAction),
    Quantize(QuantizeTarget, QuantizeAction),
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PianoRollAction {
    Copy,
    Paste,
    Duplicate,
    Delete,
    SelectTrack(TrackId),
    /// Insert a note with the current default velocity, one grid cell long.
    /// Without a tick it lands on the playback position.
    CreateNote { note_number: u8, tick: Option<Tick> },
    SetVelocity(u8),
    BatchVelocity(BatchOperation),
    VelocityRamp {
        start_tick: f64,
        start_value: f64,
        end_tick: f64,
        end_value: f64,
    },
    ToggleGhostTrack(TrackId),
    ToggleAllGhostTracks,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControlAction {
    Copy,
    Paste,
    Duplicate,
    Delete,
    SetControlType(ValueEventType),
    /// Set the selected events' value, or add one at the playback position.
    SetValue(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TempoAction {
    Copy,
    Paste,
    Duplicate,
    Delete,
    ChangeTempo { id: EventId, microseconds_per_beat: u32 },
    AddTimeSignature { tick: Tick, numerator: u8, denominator: u8 },
    UpdateTimeSignature { id: EventId, numerator: u8, denominator: u8 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrangeAction {
    Duplicate,
    Delete,
    ResetSelection,
}

/// Track header and mixer commands.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackAction {
    /// Rename the selected track.
    SetName(String),
    SetVolume { track_id: TrackId, volume: u8 },
    SetPan { track_id: TrackId, pan: u8 },
    SetInstrument { track_id: TrackId, program_number: u8 },
    /// Release a note previewed on the selected track.
    MuteNote(u8),
}

/// Which view's grid a quantize action applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantizeTarget {
    PianoRoll,
    Tempo,
    Arrange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuantizeAction {
    /// Wheel over the denominator selector.
    StepDenominator(i32),
    /// Combined denominator value, e.g. `12.0` for eighth triplets.
    SetValue(f64),
    ToggleEnabled,
}

/// Result of dispatching an action, for the host to redraw and report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchResult {
    /// Song or view state changed.
    pub changed: bool,
    pub status: Option<String>,
}

impl DispatchResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn changed() -> Self {
        Self {
            changed: true,
            status: None,
        }
    }

    pub fn from_changed(changed: bool) -> Self {
        Self {
            changed,
            status: None,
        }
    }

    pub fn with_status(message: impl Into<String>) -> Self {
        Self {
            changed: false,
            status: Some(message.into()),
        }
    }
}

//! # tickroll-types
//!
//! Shared type definitions for the tickroll editor core.
//! Everything in this crate is plain data or a pure function over plain data:
//! events, quantization, pixel <-> tick coordinate transforms, selections and
//! the clipboard payload shape. Stateful pieces (tracks, history, gestures)
//! live in tickroll-core.

pub mod clipboard;
pub mod event;
pub mod geometry;
pub mod measure;
pub mod quantizer;
pub mod selection;
pub mod transform;

pub use clipboard::{ClipboardData, ClipboardKind};
pub use event::*;
pub use geometry::{Point, Rect, TickRange};
pub use measure::Measure;
pub use quantizer::{Quantizer, DENOMINATORS};
pub use selection::{events_in_selection, ArrangeSelection, ControlSelection, Selection};
pub use transform::{
    ArrangeCoordTransform, ArrangePoint, ArrangePosition, ControlCoordTransform, ControlPoint,
    ControlPosition, CoordTransform, NoteCoordTransform, NotePoint, NotePosition,
    TempoCoordTransform, TempoPoint, TempoPosition, TickTransform,
};

/// Position on the musical timeline. `timebase` ticks make one quarter note.
pub type Tick = u32;

/// Unique identifier for an event within its track.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct EventId(u32);

impl EventId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a track within a song.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct TrackId(u32);

impl TrackId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

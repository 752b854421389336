use std::fmt;

use tickroll_types::{ClipboardKind, EventId, EventKind, TrackId};

/// Failure of a single track or song mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    EventNotFound(EventId),
    TrackNotFound(TrackId),
    /// Tempo and time-signature events belong on the conductor track only.
    ConductorOnlyEvent { kind: EventKind },
    /// Create-or-update matched an id that holds a different kind of event.
    KindMismatch {
        id: EventId,
        existing: EventKind,
        candidate: EventKind,
    },
    ConductorTrackExists,
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EventNotFound(id) => write!(f, "no event with id {}", id),
            Self::TrackNotFound(id) => write!(f, "no track with id {}", id),
            Self::ConductorOnlyEvent { kind } => {
                write!(f, "{} events can only be placed on the conductor track", kind)
            }
            Self::KindMismatch {
                id,
                existing,
                candidate,
            } => write!(
                f,
                "event {} is a {} event, cannot overwrite it with a {} event",
                id, existing, candidate
            ),
            Self::ConductorTrackExists => write!(f, "song already has a conductor track"),
        }
    }
}

impl std::error::Error for EditError {}

/// Why a clipboard payload was not pasted.
#[derive(Debug)]
pub enum ClipboardError {
    Empty,
    Json(serde_json::Error),
    Schema(String),
    TagMismatch {
        expected: ClipboardKind,
        found: ClipboardKind,
    },
    /// The payload was valid but writing it into the track failed.
    Edit(EditError),
}

impl From<EditError> for ClipboardError {
    fn from(e: EditError) -> Self {
        Self::Edit(e)
    }
}

impl From<serde_json::Error> for ClipboardError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "clipboard is empty"),
            Self::Json(e) => write!(f, "JSON error: {}", e),
            Self::Schema(msg) => write!(f, "invalid clipboard payload: {}", msg),
            Self::TagMismatch { expected, found } => {
                write!(f, "expected {} on the clipboard, found {}", expected, found)
            }
            Self::Edit(e) => write!(f, "paste failed: {}", e),
        }
    }
}

impl std::error::Error for ClipboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::Edit(e) => Some(e),
            _ => None,
        }
    }
}

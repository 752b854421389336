//! Clipboard payload shape.
//!
//! ```json
//! {"type": "note_events", "events": [{"id": 3, "tick": 0, "type": "note", ...}]}
//! ```
//!
//! Event ticks are relative to the earliest copied event.

use serde::{Deserialize, Serialize};

use crate::{EventDraft, EventKind, Tick, TrackEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipboardKind {
    NoteEvents,
    ControlEvents,
    TempoEvents,
}

impl ClipboardKind {
    pub fn accepts(self, kind: EventKind) -> bool {
        match self {
            ClipboardKind::NoteEvents => kind == EventKind::Note,
            ClipboardKind::ControlEvents => {
                matches!(kind, EventKind::Controller | EventKind::PitchBend)
            }
            ClipboardKind::TempoEvents => kind == EventKind::Tempo,
        }
    }
}

impl std::fmt::Display for ClipboardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            ClipboardKind::NoteEvents => "note_events",
            ClipboardKind::ControlEvents => "control_events",
            ClipboardKind::TempoEvents => "tempo_events",
        };
        f.write_str(tag)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardData {
    #[serde(rename = "type")]
    pub kind: ClipboardKind,
    pub events: Vec<TrackEvent>,
}

impl ClipboardData {
    /// Copy `events`, shifting ticks so the earliest one sits at 0.
    /// Returns `None` when there is nothing to copy.
    pub fn from_events<'a, I>(kind: ClipboardKind, events: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a TrackEvent>,
    {
        let mut events: Vec<TrackEvent> = events.into_iter().cloned().collect();
        let min_tick = events.iter().map(|e| e.tick).min()?;
        for e in &mut events {
            e.tick -= min_tick;
        }
        Some(Self { kind, events })
    }

    /// Every event must belong to the payload's kind.
    pub fn validate(&self) -> Result<(), String> {
        match self.events.iter().find(|e| !self.kind.accepts(e.kind())) {
            Some(e) => Err(format!(
                "{} payload contains a {} event (id {})",
                self.kind,
                e.kind(),
                e.id
            )),
            None => Ok(()),
        }
    }

    /// Drafts anchored at `position`, with ids dropped so the target track
    /// assigns fresh ones.
    pub fn drafts_at(&self, position: Tick) -> Vec<EventDraft> {
        self.events
            .iter()
            .map(|e| {
                let mut draft = e.to_draft();
                draft.tick = e.tick.saturating_add(position);
                draft
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EventBody, EventId};

    fn note(id: u32, tick: Tick) -> TrackEvent {
        TrackEvent {
            id: EventId::new(id),
            tick,
            body: EventBody::note(60, 100, 120),
        }
    }

    #[test]
    fn copy_normalizes_to_origin() {
        let events = [note(1, 100), note(2, 150)];
        let data = ClipboardData::from_events(ClipboardKind::NoteEvents, &events).unwrap();
        let ticks: Vec<Tick> = data.events.iter().map(|e| e.tick).collect();
        assert_eq!(ticks, vec![0, 50]);
        let drafts = data.drafts_at(50);
        assert_eq!(drafts[0].tick, 50);
        assert_eq!(drafts[1].tick, 100);
        assert!(drafts.iter().all(|d| d.id.is_none()));
    }

    #[test]
    fn nothing_to_copy() {
        assert!(ClipboardData::from_events(ClipboardKind::TempoEvents, &Vec::<TrackEvent>::new()).is_none());
    }

    #[test]
    fn validate_rejects_foreign_kinds() {
        let data = ClipboardData {
            kind: ClipboardKind::ControlEvents,
            events: vec![note(1, 0)],
        };
        assert!(data.validate().is_err());
        let data = ClipboardData {
            kind: ClipboardKind::NoteEvents,
            events: vec![note(1, 0)],
        };
        assert!(data.validate().is_ok());
    }

    #[test]
    fn tag_is_snake_case() {
        let data = ClipboardData {
            kind: ClipboardKind::TempoEvents,
            events: vec![],
        };
        assert_eq!(ClipboardKind::TempoEvents.to_string(), "tempo_events");
        assert_eq!(data.kind.to_string(), "tempo_events");
    }
}

//! Track event types: the tagged union every track stores, plus the partial
//! update and draft shapes used to write into a track.

use serde::{Deserialize, Serialize};

use crate::{EventId, Tick};

pub const MAX_NOTE_NUMBER: u8 = 127;
pub const MIN_VELOCITY: u8 = 1;
pub const MAX_VELOCITY: u8 = 127;
pub const MAX_CONTROLLER_VALUE: u8 = 127;
pub const MAX_PROGRAM_NUMBER: u8 = 127;
pub const CONTROLLER_VOLUME: u8 = 7;
pub const CONTROLLER_PAN: u8 = 10;
pub const MAX_PITCH_BEND: u16 = 16383;
pub const PITCH_BEND_CENTER: u16 = 8192;
/// Set-tempo meta events carry a 24-bit value.
pub const MAX_MICROSECONDS_PER_BEAT: u32 = 0xFF_FFFF;
pub const MAX_TIME_SIGNATURE_PART: u8 = 64;

/// Discriminant of an [`EventBody`], without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Note,
    Controller,
    PitchBend,
    ProgramChange,
    Tempo,
    TimeSignature,
}

impl EventKind {
    /// Kinds that only the conductor track may carry.
    pub fn is_conductor_only(self) -> bool {
        matches!(self, EventKind::Tempo | EventKind::TimeSignature)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EventKind::Note => "note",
            EventKind::Controller => "controller",
            EventKind::PitchBend => "pitch bend",
            EventKind::ProgramChange => "program change",
            EventKind::Tempo => "tempo",
            EventKind::TimeSignature => "time signature",
        };
        f.write_str(name)
    }
}

/// Kind-specific payload of a track event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EventBody {
    Note {
        note_number: u8,
        velocity: u8,
        duration: Tick,
    },
    Controller {
        controller_type: u8,
        value: u8,
    },
    PitchBend {
        value: u16,
    },
    ProgramChange {
        program_number: u8,
    },
    Tempo {
        microseconds_per_beat: u32,
    },
    TimeSignature {
        numerator: u8,
        denominator: u8,
    },
}

impl EventBody {
    pub fn note(note_number: u8, velocity: u8, duration: Tick) -> Self {
        EventBody::Note {
            note_number,
            velocity,
            duration,
        }
    }

    pub fn tempo_bpm(bpm: f64) -> Self {
        EventBody::Tempo {
            microseconds_per_beat: usec_from_bpm(bpm),
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            EventBody::Note { .. } => EventKind::Note,
            EventBody::Controller { .. } => EventKind::Controller,
            EventBody::PitchBend { .. } => EventKind::PitchBend,
            EventBody::ProgramChange { .. } => EventKind::ProgramChange,
            EventBody::Tempo { .. } => EventKind::Tempo,
            EventBody::TimeSignature { .. } => EventKind::TimeSignature,
        }
    }

    /// Clamp every numeric field into its valid range.
    pub fn clamped(self) -> Self {
        match self {
            EventBody::Note {
                note_number,
                velocity,
                duration,
            } => EventBody::Note {
                note_number: note_number.min(MAX_NOTE_NUMBER),
                velocity: velocity.clamp(MIN_VELOCITY, MAX_VELOCITY),
                duration,
            },
            EventBody::Controller {
                controller_type,
                value,
            } => EventBody::Controller {
                controller_type: controller_type.min(MAX_CONTROLLER_VALUE),
                value: value.min(MAX_CONTROLLER_VALUE),
            },
            EventBody::PitchBend { value } => EventBody::PitchBend {
                value: value.min(MAX_PITCH_BEND),
            },
            EventBody::ProgramChange { program_number } => EventBody::ProgramChange {
                program_number: program_number.min(MAX_PROGRAM_NUMBER),
            },
            EventBody::Tempo {
                microseconds_per_beat,
            } => EventBody::Tempo {
                microseconds_per_beat: microseconds_per_beat.clamp(1, MAX_MICROSECONDS_PER_BEAT),
            },
            EventBody::TimeSignature {
                numerator,
                denominator,
            } => EventBody::TimeSignature {
                numerator: numerator.clamp(1, MAX_TIME_SIGNATURE_PART),
                denominator: denominator.clamp(1, MAX_TIME_SIGNATURE_PART),
            },
        }
    }
}

/// An event stored in a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackEvent {
    pub id: EventId,
    pub tick: Tick,
    #[serde(flatten)]
    pub body: EventBody,
}

impl TrackEvent {
    pub fn kind(&self) -> EventKind {
        self.body.kind()
    }

    /// Tick where the event stops occupying the timeline.
    /// Only notes have a length; everything else is a point.
    pub fn end_tick(&self) -> Tick {
        match self.body {
            EventBody::Note { duration, .. } => self.tick.saturating_add(duration),
            _ => self.tick,
        }
    }

    pub fn note_number(&self) -> Option<u8> {
        match self.body {
            EventBody::Note { note_number, .. } => Some(note_number),
            _ => None,
        }
    }

    pub fn velocity(&self) -> Option<u8> {
        match self.body {
            EventBody::Note { velocity, .. } => Some(velocity),
            _ => None,
        }
    }

    /// Apply the fields of `patch` that make sense for this event's kind.
    /// Fields that belong to another kind are ignored.
    pub fn apply(&mut self, patch: &EventPatch) {
        if let Some(tick) = patch.tick {
            self.tick = tick;
        }
        match &mut self.body {
            EventBody::Note {
                note_number,
                velocity,
                duration,
            } => {
                if let Some(v) = patch.note_number {
                    *note_number = clamp_field(v, 0, MAX_NOTE_NUMBER as i64) as u8;
                }
                if let Some(v) = patch.velocity {
                    *velocity = clamp_field(v, MIN_VELOCITY as i64, MAX_VELOCITY as i64) as u8;
                }
                if let Some(v) = patch.duration {
                    *duration = clamp_field(v, 0, Tick::MAX as i64) as Tick;
                }
            }
            EventBody::Controller {
                controller_type,
                value,
            } => {
                if let Some(v) = patch.controller_type {
                    *controller_type = clamp_field(v, 0, MAX_CONTROLLER_VALUE as i64) as u8;
                }
                if let Some(v) = patch.value {
                    *value = clamp_field(v, 0, MAX_CONTROLLER_VALUE as i64) as u8;
                }
            }
            EventBody::PitchBend { value } => {
                if let Some(v) = patch.value {
                    *value = clamp_field(v, 0, MAX_PITCH_BEND as i64) as u16;
                }
            }
            EventBody::ProgramChange { program_number } => {
                if let Some(v) = patch.value {
                    *program_number = clamp_field(v, 0, MAX_PROGRAM_NUMBER as i64) as u8;
                }
            }
            EventBody::Tempo {
                microseconds_per_beat,
            } => {
                if let Some(v) = patch.microseconds_per_beat {
                    *microseconds_per_beat =
                        clamp_field(v, 1, MAX_MICROSECONDS_PER_BEAT as i64) as u32;
                }
            }
            EventBody::TimeSignature {
                numerator,
                denominator,
            } => {
                if let Some(v) = patch.numerator {
                    *numerator = clamp_field(v, 1, MAX_TIME_SIGNATURE_PART as i64) as u8;
                }
                if let Some(v) = patch.denominator {
                    *denominator = clamp_field(v, 1, MAX_TIME_SIGNATURE_PART as i64) as u8;
                }
            }
        }
    }

    /// Strip the id, keeping position and payload.
    pub fn to_draft(&self) -> EventDraft {
        EventDraft {
            id: None,
            tick: self.tick,
            body: self.body.clone(),
        }
    }
}

fn clamp_field(value: i64, min: i64, max: i64) -> i64 {
    value.clamp(min, max)
}

/// Candidate passed to a track's create-or-update.
/// `id: Some(..)` targets an existing event; `None` always inserts.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub id: Option<EventId>,
    pub tick: Tick,
    pub body: EventBody,
}

impl EventDraft {
    pub fn new(tick: Tick, body: EventBody) -> Self {
        Self {
            id: None,
            tick,
            body,
        }
    }

    pub fn with_id(id: EventId, tick: Tick, body: EventBody) -> Self {
        Self {
            id: Some(id),
            tick,
            body,
        }
    }
}

/// Partial field update. Numeric fields are wide so that out-of-range input
/// is clamped when written rather than wrapping at the call site.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub tick: Option<Tick>,
    pub note_number: Option<i64>,
    pub velocity: Option<i64>,
    pub duration: Option<i64>,
    pub controller_type: Option<i64>,
    /// Controller, pitch-bend or program number.
    pub value: Option<i64>,
    pub microseconds_per_beat: Option<i64>,
    pub numerator: Option<i64>,
    pub denominator: Option<i64>,
}

impl EventPatch {
    pub fn tick(tick: Tick) -> Self {
        Self {
            tick: Some(tick),
            ..Self::default()
        }
    }

    pub fn velocity(velocity: i64) -> Self {
        Self {
            velocity: Some(velocity),
            ..Self::default()
        }
    }

    pub fn value(value: i64) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    pub fn microseconds_per_beat(usec: i64) -> Self {
        Self {
            microseconds_per_beat: Some(usec),
            ..Self::default()
        }
    }

    pub fn time_signature(numerator: i64, denominator: i64) -> Self {
        Self {
            numerator: Some(numerator),
            denominator: Some(denominator),
            ..Self::default()
        }
    }

    pub fn with_tick(mut self, tick: Tick) -> Self {
        self.tick = Some(tick);
        self
    }
}

/// Event families edited as a continuous curve (control pane, tempo graph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueEventType {
    Controller(u8),
    PitchBend,
    /// Values are expressed in BPM on the curve and stored as microseconds per beat.
    Tempo,
}

impl ValueEventType {
    pub fn matches(&self, body: &EventBody) -> bool {
        match (self, body) {
            (ValueEventType::Controller(ty), EventBody::Controller { controller_type, .. }) => {
                ty == controller_type
            }
            (ValueEventType::PitchBend, EventBody::PitchBend { .. }) => true,
            (ValueEventType::Tempo, EventBody::Tempo { .. }) => true,
            _ => false,
        }
    }

    /// Build an event body carrying `value` in this curve's value space.
    pub fn create(&self, value: i64) -> EventBody {
        match self {
            ValueEventType::Controller(controller_type) => EventBody::Controller {
                controller_type: *controller_type,
                value: clamp_field(value, 0, MAX_CONTROLLER_VALUE as i64) as u8,
            },
            ValueEventType::PitchBend => EventBody::PitchBend {
                value: clamp_field(value, 0, MAX_PITCH_BEND as i64) as u16,
            },
            ValueEventType::Tempo => EventBody::tempo_bpm(value as f64),
        }
    }

    /// Read an event's value in this curve's value space.
    pub fn value_of(&self, body: &EventBody) -> Option<f64> {
        if !self.matches(body) {
            return None;
        }
        match body {
            EventBody::Controller { value, .. } => Some(*value as f64),
            EventBody::PitchBend { value } => Some(*value as f64),
            EventBody::Tempo {
                microseconds_per_beat,
            } => Some(usec_per_beat_to_bpm(*microseconds_per_beat as f64)),
            _ => None,
        }
    }

    /// Patch that sets the value, for updating existing events of this type.
    pub fn value_patch(&self, value: i64) -> EventPatch {
        match self {
            ValueEventType::Controller(_) | ValueEventType::PitchBend => EventPatch::value(value),
            ValueEventType::Tempo => EventPatch::microseconds_per_beat(usec_from_bpm(value as f64) as i64),
        }
    }

    pub fn max_value(&self) -> f64 {
        match self {
            ValueEventType::Controller(_) => MAX_CONTROLLER_VALUE as f64,
            ValueEventType::PitchBend => MAX_PITCH_BEND as f64,
            ValueEventType::Tempo => f64::from(u16::MAX),
        }
    }
}

pub fn bpm_to_usec_per_beat(bpm: f64) -> f64 {
    60_000_000.0 / bpm
}

pub fn usec_per_beat_to_bpm(usec: f64) -> f64 {
    60_000_000.0 / usec
}

/// Rounded and clamped microseconds per beat. Non-positive BPM maps to the slowest tempo.
fn usec_from_bpm(bpm: f64) -> u32 {
    if bpm <= 0.0 || !bpm.is_finite() {
        return MAX_MICROSECONDS_PER_BEAT;
    }
    let usec = bpm_to_usec_per_beat(bpm).round();
    usec.clamp(1.0, MAX_MICROSECONDS_PER_BEAT as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(velocity: u8) -> TrackEvent {
        TrackEvent {
            id: EventId::new(1),
            tick: 0,
            body: EventBody::note(60, velocity, 120),
        }
    }

    #[test]
    fn patch_clamps_velocity() {
        let mut e = note(64);
        e.apply(&EventPatch::velocity(128));
        assert_eq!(e.velocity(), Some(127));
        e.apply(&EventPatch::velocity(0));
        assert_eq!(e.velocity(), Some(1));
    }

    #[test]
    fn patch_ignores_fields_of_other_kinds() {
        let mut e = note(64);
        e.apply(&EventPatch::value(10));
        assert_eq!(e.body, EventBody::note(60, 64, 120));
    }

    #[test]
    fn clamped_fixes_out_of_range_fields() {
        let body = EventBody::Note {
            note_number: 200,
            velocity: 0,
            duration: 10,
        }
        .clamped();
        assert_eq!(body, EventBody::note(127, 1, 10));

        let tempo = EventBody::Tempo {
            microseconds_per_beat: 0,
        }
        .clamped();
        assert_eq!(
            tempo,
            EventBody::Tempo {
                microseconds_per_beat: 1
            }
        );
    }

    #[test]
    fn end_tick_only_extends_notes() {
        assert_eq!(note(64).end_tick(), 120);
        let cc = TrackEvent {
            id: EventId::new(2),
            tick: 50,
            body: EventBody::PitchBend { value: 8192 },
        };
        assert_eq!(cc.end_tick(), 50);
    }

    #[test]
    fn value_type_matches_controller_number() {
        let body = EventBody::Controller {
            controller_type: 7,
            value: 100,
        };
        assert!(ValueEventType::Controller(7).matches(&body));
        assert!(!ValueEventType::Controller(10).matches(&body));
        assert!(!ValueEventType::PitchBend.matches(&body));
        assert_eq!(ValueEventType::Controller(7).value_of(&body), Some(100.0));
    }

    #[test]
    fn tempo_value_is_bpm() {
        let body = ValueEventType::Tempo.create(120);
        assert_eq!(
            body,
            EventBody::Tempo {
                microseconds_per_beat: 500_000
            }
        );
        assert_eq!(ValueEventType::Tempo.value_of(&body), Some(120.0));
    }

    #[test]
    fn zero_bpm_maps_to_slowest_tempo() {
        assert_eq!(
            EventBody::tempo_bpm(0.0),
            EventBody::Tempo {
                microseconds_per_beat: MAX_MICROSECONDS_PER_BEAT
            }
        );
    }

    #[test]
    fn conductor_only_kinds() {
        assert!(EventKind::Tempo.is_conductor_only());
        assert!(EventKind::TimeSignature.is_conductor_only());
        assert!(!EventKind::Note.is_conductor_only());
    }
}

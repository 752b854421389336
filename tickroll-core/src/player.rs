use tickroll_types::{Tick, TrackEvent};

use crate::observe::{Observable, SubscriptionId};

/// Playback collaborator. The editor only reads the position, moves it when
/// the user clicks on an idle timeline, and forwards events for live preview.
pub trait Player {
    fn position(&self) -> Tick;
    fn is_playing(&self) -> bool;
    fn set_position(&mut self, tick: Tick);
    /// Sound `event` on `channel` immediately. Backends without live output ignore it.
    fn send_event(&mut self, _channel: u8, _event: &TrackEvent) {}
    /// Silence a previewed note.
    fn stop_note(&mut self, _channel: u8, _note_number: u8) {}
}

/// Message handed to the live output.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveOutput {
    Event { channel: u8, event: TrackEvent },
    NoteOff { channel: u8, note_number: u8 },
}

/// Transport state without an audio backend. Live output is queued until
/// drained, which is what a MIDI output thread would consume.
#[derive(Debug, Default)]
pub struct PlayerState {
    position: Observable<Tick>,
    pub playing: bool,
    sent: Vec<LiveOutput>,
}

impl PlayerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the new tick whenever the playhead moves.
    pub fn subscribe_position<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Tick) + 'static,
    {
        self.position.subscribe(callback)
    }

    pub fn drain_sent(&mut self) -> Vec<LiveOutput> {
        std::mem::take(&mut self.sent)
    }
}

impl Player for PlayerState {
    fn position(&self) -> Tick {
        *self.position.get()
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn set_position(&mut self, tick: Tick) {
        if *self.position.get() != tick {
            self.position.set(tick);
        }
    }

    fn send_event(&mut self, channel: u8, event: &TrackEvent) {
        self.sent.push(LiveOutput::Event {
            channel,
            event: event.clone(),
        });
    }

    fn stop_note(&mut self, channel: u8, note_number: u8) {
        self.sent.push(LiveOutput::NoteOff {
            channel,
            note_number,
        });
    }
}

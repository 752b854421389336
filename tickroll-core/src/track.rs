//! Per-track event store.
//!
//! Events are kept in a `Vec` sorted by `(tick, id)`. Ids are handed out by the
//! track in increasing order, so for equal ticks the id order is the insertion
//! order and reads are deterministic.
//!
//! Every mutation goes through the track's own methods. Each standalone
//! mutation publishes one [`TrackCommit`]; inside [`Track::transaction`] the
//! commit is deferred to the end of the outermost transaction.

use serde::{Deserialize, Serialize};

use tickroll_types::{
    usec_per_beat_to_bpm, EventBody, EventDraft, EventId, EventKind, EventPatch, Tick, TrackEvent,
    TrackId, CONTROLLER_PAN, CONTROLLER_VOLUME,
};

use crate::error::EditError;
use crate::observe::{Observers, SubscriptionId};

/// Published once per committed change to a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackCommit {
    pub track_id: TrackId,
    pub revision: u64,
}

/// Owned copy of a track's data, used by history and for rollback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSnapshot {
    pub id: TrackId,
    pub name: String,
    pub channel: Option<u8>,
    pub is_conductor_track: bool,
    pub is_rhythm_track: bool,
    pub events: Vec<TrackEvent>,
    pub next_event_id: u32,
}

#[derive(Debug)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    pub channel: Option<u8>,
    pub is_conductor_track: bool,
    /// Drum tracks. Only affects how notes are drawn.
    pub is_rhythm_track: bool,
    events: Vec<TrackEvent>,
    next_event_id: u32,
    revision: u64,
    transaction_depth: u32,
    dirty: bool,
    observers: Observers<TrackCommit>,
}

impl Track {
    pub fn new(id: TrackId, name: impl Into<String>, channel: Option<u8>) -> Self {
        Self {
            id,
            name: name.into(),
            channel,
            is_conductor_track: false,
            is_rhythm_track: false,
            events: Vec::new(),
            next_event_id: 0,
            revision: 0,
            transaction_depth: 0,
            dirty: false,
            observers: Observers::new(),
        }
    }

    pub fn conductor(id: TrackId) -> Self {
        let mut track = Self::new(id, "Conductor", None);
        track.is_conductor_track = true;
        track
    }

    pub fn from_snapshot(snapshot: TrackSnapshot) -> Self {
        let mut track = Self::new(snapshot.id, snapshot.name, snapshot.channel);
        track.is_conductor_track = snapshot.is_conductor_track;
        track.is_rhythm_track = snapshot.is_rhythm_track;
        track.events = snapshot.events;
        track.events.sort_by_key(|e| (e.tick, e.id));
        track.next_event_id = snapshot.next_event_id;
        track
    }

    /// Tick-ordered events; equal ticks keep insertion order.
    pub fn events(&self) -> &[TrackEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get_event_by_id(&self, id: EventId) -> Option<&TrackEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Tick after the last event ends.
    pub fn end_of_track(&self) -> Tick {
        self.events.iter().map(|e| e.end_tick()).max().unwrap_or(0)
    }

    /// Replace the event whose id matches `draft.id`, or insert a new one with a
    /// fresh id. Field values are clamped to their valid ranges.
    pub fn create_or_update(&mut self, draft: EventDraft) -> Result<TrackEvent, EditError> {
        let kind = draft.body.kind();
        self.check_accepts(kind)?;
        let body = draft.body.clamped();

        if let Some(id) = draft.id {
            if let Some(index) = self.index_of(id) {
                let existing = self.events[index].kind();
                if existing != kind {
                    return Err(EditError::KindMismatch {
                        id,
                        existing,
                        candidate: kind,
                    });
                }
                let mut event = self.events.remove(index);
                event.tick = draft.tick;
                event.body = body;
                let updated = event.clone();
                self.insert_sorted(event);
                self.touch();
                return Ok(updated);
            }
        }

        let event = TrackEvent {
            id: self.allocate_id(),
            tick: draft.tick,
            body,
        };
        self.insert_sorted(event.clone());
        self.touch();
        Ok(event)
    }

    /// Whether events of `kind` may be written to this track.
    pub fn check_accepts(&self, kind: EventKind) -> Result<(), EditError> {
        if kind.is_conductor_only() && !self.is_conductor_track {
            return Err(EditError::ConductorOnlyEvent { kind });
        }
        Ok(())
    }

    pub fn add_event(&mut self, tick: Tick, body: EventBody) -> Result<TrackEvent, EditError> {
        self.create_or_update(EventDraft::new(tick, body))
    }

    /// Insert all drafts as one commit, always with fresh ids.
    pub fn add_events<I>(&mut self, drafts: I) -> Result<Vec<TrackEvent>, EditError>
    where
        I: IntoIterator<Item = EventDraft>,
    {
        self.transaction(|track| {
            drafts
                .into_iter()
                .map(|draft| track.create_or_update(EventDraft { id: None, ..draft }))
                .collect()
        })
    }

    /// Apply a partial update to one event.
    pub fn update_event(&mut self, id: EventId, patch: &EventPatch) -> Result<TrackEvent, EditError> {
        let index = self.index_of(id).ok_or(EditError::EventNotFound(id))?;
        let mut event = self.events.remove(index);
        event.apply(patch);
        let updated = event.clone();
        self.insert_sorted(event);
        self.touch();
        Ok(updated)
    }

    /// Batched [`Track::update_event`] under a single commit. Unknown ids are
    /// skipped; the rest of the batch still applies.
    pub fn update_events(&mut self, updates: &[(EventId, EventPatch)]) -> Vec<TrackEvent> {
        let result: Result<Vec<TrackEvent>, EditError> = self.transaction(|track| {
            let mut updated = Vec::with_capacity(updates.len());
            for (id, patch) in updates {
                match track.update_event(*id, patch) {
                    Ok(event) => updated.push(event),
                    Err(e) => log::debug!(target: "track", "skipping update: {}", e),
                }
            }
            Ok(updated)
        });
        result.unwrap_or_default()
    }

    /// Remove matching events; unknown ids are ignored. Returns how many were removed.
    pub fn remove_events(&mut self, ids: &[EventId]) -> usize {
        let before = self.events.len();
        self.events.retain(|e| !ids.contains(&e.id));
        let removed = before - self.events.len();
        if removed > 0 {
            self.touch();
        }
        removed
    }

    pub fn remove_event(&mut self, id: EventId) -> bool {
        self.remove_events(&[id]) > 0
    }

    /// Run `f` as one atomic edit.
    ///
    /// On `Ok` the outermost transaction publishes a single commit if anything
    /// changed. On `Err` the events and id counter are restored to their state
    /// on entry and nothing is published; an enclosing transaction only loses
    /// the changes made inside this one.
    pub fn transaction<R, E, F>(&mut self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut Track) -> Result<R, E>,
    {
        let saved_events = self.events.clone();
        let saved_next_id = self.next_event_id;
        let saved_dirty = self.dirty;

        self.transaction_depth += 1;
        let result = f(self);
        self.transaction_depth -= 1;

        match result {
            Ok(value) => {
                if self.transaction_depth == 0 && self.dirty {
                    self.commit();
                }
                Ok(value)
            }
            Err(e) => {
                log::debug!(target: "track", "rolling back transaction on track {}", self.id);
                self.events = saved_events;
                self.next_event_id = saved_next_id;
                self.dirty = saved_dirty;
                Err(e)
            }
        }
    }

    pub fn snapshot(&self) -> TrackSnapshot {
        TrackSnapshot {
            id: self.id,
            name: self.name.clone(),
            channel: self.channel,
            is_conductor_track: self.is_conductor_track,
            is_rhythm_track: self.is_rhythm_track,
            events: self.events.clone(),
            next_event_id: self.next_event_id,
        }
    }

    /// Replace the track's contents with `snapshot`, keeping subscribers.
    pub fn restore(&mut self, snapshot: TrackSnapshot) {
        self.name = snapshot.name;
        self.channel = snapshot.channel;
        self.is_conductor_track = snapshot.is_conductor_track;
        self.is_rhythm_track = snapshot.is_rhythm_track;
        self.events = snapshot.events;
        self.events.sort_by_key(|e| (e.tick, e.id));
        self.next_event_id = snapshot.next_event_id;
        self.touch();
    }

    /// BPM of the last tempo event at or before `tick`.
    pub fn tempo_at(&self, tick: Tick) -> Option<f64> {
        self.last_event_before(tick.saturating_add(1), |e| {
            matches!(e.body, EventBody::Tempo { .. })
        })
        .and_then(|e| match e.body {
            EventBody::Tempo {
                microseconds_per_beat,
            } => Some(usec_per_beat_to_bpm(microseconds_per_beat as f64)),
            _ => None,
        })
    }

    /// Value of the last controller `controller_type` at or before `tick`.
    pub fn controller_value_at(&self, controller_type: u8, tick: Tick) -> Option<u8> {
        self.last_event_before(tick.saturating_add(1), |e| {
            matches!(e.body, EventBody::Controller { controller_type: t, .. } if t == controller_type)
        })
        .and_then(|e| match e.body {
            EventBody::Controller { value, .. } => Some(value),
            _ => None,
        })
    }

    /// Write controller `controller_type` at `tick`, overwriting one that is
    /// already there.
    pub fn set_controller_value(
        &mut self,
        controller_type: u8,
        value: u8,
        tick: Tick,
    ) -> Result<TrackEvent, EditError> {
        let existing = self
            .events
            .iter()
            .find(|e| {
                e.tick == tick
                    && matches!(e.body, EventBody::Controller { controller_type: t, .. } if t == controller_type)
            })
            .map(|e| e.id);
        self.create_or_update(EventDraft {
            id: existing,
            tick,
            body: EventBody::Controller {
                controller_type,
                value,
            },
        })
    }

    pub fn volume_at(&self, tick: Tick) -> Option<u8> {
        self.controller_value_at(CONTROLLER_VOLUME, tick)
    }

    pub fn set_volume(&mut self, value: u8, tick: Tick) -> Result<TrackEvent, EditError> {
        self.set_controller_value(CONTROLLER_VOLUME, value, tick)
    }

    pub fn pan_at(&self, tick: Tick) -> Option<u8> {
        self.controller_value_at(CONTROLLER_PAN, tick)
    }

    pub fn set_pan(&mut self, value: u8, tick: Tick) -> Result<TrackEvent, EditError> {
        self.set_controller_value(CONTROLLER_PAN, value, tick)
    }

    /// Instrument of the track: the first program change.
    pub fn program_number(&self) -> Option<u8> {
        self.events.iter().find_map(|e| match e.body {
            EventBody::ProgramChange { program_number } => Some(program_number),
            _ => None,
        })
    }

    /// Rewrite the first program change, or add one at tick 0.
    pub fn set_program_number(&mut self, program_number: u8) -> Result<TrackEvent, EditError> {
        let existing = self
            .events
            .iter()
            .find(|e| e.kind() == EventKind::ProgramChange)
            .map(|e| (e.id, e.tick));
        let (id, tick) = match existing {
            Some((id, tick)) => (Some(id), tick),
            None => (None, 0),
        };
        self.create_or_update(EventDraft {
            id,
            tick,
            body: EventBody::ProgramChange { program_number },
        })
    }

    /// Latest event strictly before `tick` accepted by `predicate`.
    pub fn last_event_before<P>(&self, tick: Tick, predicate: P) -> Option<&TrackEvent>
    where
        P: Fn(&TrackEvent) -> bool,
    {
        let end = self.events.partition_point(|e| e.tick < tick);
        self.events[..end].iter().rev().find(|e| predicate(e))
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&TrackCommit) + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn index_of(&self, id: EventId) -> Option<usize> {
        self.events.iter().position(|e| e.id == id)
    }

    fn allocate_id(&mut self) -> EventId {
        let id = EventId::new(self.next_event_id);
        self.next_event_id += 1;
        id
    }

    fn insert_sorted(&mut self, event: TrackEvent) {
        let key = (event.tick, event.id);
        let pos = self.events.partition_point(|e| (e.tick, e.id) < key);
        self.events.insert(pos, event);
    }

    fn touch(&mut self) {
        self.dirty = true;
        if self.transaction_depth == 0 {
            self.commit();
        }
    }

    fn commit(&mut self) {
        self.dirty = false;
        self.revision += 1;
        let commit = TrackCommit {
            track_id: self.id,
            revision: self.revision,
        };
        self.observers.notify(&commit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn track() -> Track {
        Track::new(TrackId::new(1), "Piano", Some(0))
    }

    fn note(tick: Tick, note_number: u8) -> EventDraft {
        EventDraft::new(tick, EventBody::note(note_number, 100, 120))
    }

    fn commits(track: &mut Track) -> Rc<RefCell<Vec<u64>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        track.subscribe(move |c| sink.borrow_mut().push(c.revision));
        log
    }

    #[test]
    fn create_assigns_fresh_ids() {
        let mut t = track();
        let a = t.create_or_update(note(0, 60)).unwrap();
        let b = t.create_or_update(note(0, 62)).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(t.events().len(), 2);
    }

    #[test]
    fn create_or_update_replaces_in_place() {
        let mut t = track();
        let a = t.create_or_update(note(0, 60)).unwrap();
        let updated = t
            .create_or_update(EventDraft::with_id(a.id, 240, EventBody::note(64, 90, 60)))
            .unwrap();
        assert_eq!(updated.id, a.id);
        assert_eq!(t.events().len(), 1);
        assert_eq!(t.events()[0].tick, 240);
        assert_eq!(t.events()[0].note_number(), Some(64));
    }

    #[test]
    fn unknown_id_in_draft_inserts() {
        let mut t = track();
        let e = t
            .create_or_update(EventDraft::with_id(EventId::new(99), 0, EventBody::note(60, 100, 10)))
            .unwrap();
        assert_eq!(e.id, EventId::new(0));
    }

    #[test]
    fn equal_ticks_keep_insertion_order() {
        let mut t = track();
        t.create_or_update(note(480, 60)).unwrap();
        let first = t.create_or_update(note(0, 70)).unwrap();
        let second = t.create_or_update(note(0, 50)).unwrap();
        let third = t.create_or_update(note(0, 60)).unwrap();
        let ids: Vec<EventId> = t.events().iter().take(3).map(|e| e.id).collect();
        assert_eq!(ids, vec![first.id, second.id, third.id]);

        // Moving an event keeps its original place among equal ticks.
        t.update_event(first.id, &EventPatch::tick(10)).unwrap();
        t.update_event(first.id, &EventPatch::tick(0)).unwrap();
        assert_eq!(t.events()[0].id, first.id);
    }

    #[test]
    fn update_event_reports_missing_id() {
        let mut t = track();
        let err = t.update_event(EventId::new(5), &EventPatch::velocity(10));
        assert_eq!(err, Err(EditError::EventNotFound(EventId::new(5))));
    }

    #[test]
    fn update_events_skips_unknown_ids() {
        let mut t = track();
        let a = t.create_or_update(note(0, 60)).unwrap();
        let updated = t.update_events(&[
            (EventId::new(42), EventPatch::velocity(1)),
            (a.id, EventPatch::velocity(200)),
        ]);
        assert_eq!(updated.len(), 1);
        assert_eq!(t.events()[0].velocity(), Some(127));
    }

    #[test]
    fn remove_ignores_unknown_ids() {
        let mut t = track();
        let a = t.create_or_update(note(0, 60)).unwrap();
        assert_eq!(t.remove_events(&[EventId::new(7), a.id]), 1);
        assert!(t.is_empty());
    }

    #[test]
    fn conductor_events_rejected_on_instrument_track() {
        let mut t = track();
        let err = t.add_event(0, EventBody::tempo_bpm(120.0));
        assert!(matches!(err, Err(EditError::ConductorOnlyEvent { .. })));
        let mut c = Track::conductor(TrackId::new(0));
        assert!(c.add_event(0, EventBody::tempo_bpm(120.0)).is_ok());
    }

    #[test]
    fn kind_mismatch_on_update() {
        let mut t = track();
        let a = t.create_or_update(note(0, 60)).unwrap();
        let err = t.create_or_update(EventDraft::with_id(a.id, 0, EventBody::PitchBend { value: 0 }));
        assert!(matches!(err, Err(EditError::KindMismatch { .. })));
    }

    #[test]
    fn transaction_commits_once() {
        let mut t = track();
        let log = commits(&mut t);
        t.transaction(|it| -> Result<(), EditError> {
            it.create_or_update(note(0, 60))?;
            it.create_or_update(note(10, 61))?;
            it.create_or_update(note(20, 62))?;
            Ok(())
        })
        .unwrap();
        assert_eq!(*log.borrow(), vec![1]);
        t.create_or_update(note(30, 63)).unwrap();
        assert_eq!(*log.borrow(), vec![1, 2]);
    }

    #[test]
    fn failed_transaction_rolls_back_everything() {
        let mut t = track();
        t.create_or_update(note(0, 40)).unwrap();
        let log = commits(&mut t);
        let result = t.transaction(|it| {
            it.create_or_update(note(0, 60))?;
            it.add_event(10, EventBody::tempo_bpm(90.0))?;
            it.create_or_update(note(20, 62))
        });
        assert!(result.is_err());
        assert_eq!(t.events().len(), 1);
        assert!(log.borrow().is_empty());

        // The id counter was restored too.
        let next = t.create_or_update(note(0, 41)).unwrap();
        assert_eq!(next.id, EventId::new(1));
    }

    #[test]
    fn nested_failure_only_undoes_inner_scope() {
        let mut t = track();
        let log = commits(&mut t);
        t.transaction(|it| -> Result<(), EditError> {
            it.create_or_update(note(0, 60))?;
            let inner: Result<(), EditError> = it.transaction(|inner| {
                inner.create_or_update(note(10, 61))?;
                Err(EditError::ConductorTrackExists)
            });
            assert!(inner.is_err());
            Ok(())
        })
        .unwrap();
        assert_eq!(t.events().len(), 1);
        assert_eq!(*log.borrow(), vec![1]);
    }

    #[test]
    fn empty_transaction_does_not_notify() {
        let mut t = track();
        let log = commits(&mut t);
        t.transaction(|_| Ok::<_, EditError>(())).unwrap();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn tempo_at_uses_last_change() {
        let mut c = Track::conductor(TrackId::new(0));
        c.add_event(0, EventBody::tempo_bpm(120.0)).unwrap();
        c.add_event(960, EventBody::tempo_bpm(150.0)).unwrap();
        assert_eq!(c.tempo_at(959), Some(120.0));
        assert_eq!(c.tempo_at(960), Some(150.0));
        assert_eq!(track().tempo_at(0), None);
    }

    #[test]
    fn volume_overwrites_at_same_tick() {
        let mut t = track();
        let first = t.set_volume(100, 480).unwrap();
        t.set_pan(20, 480).unwrap();
        let again = t.set_volume(90, 480).unwrap();
        assert_eq!(first.id, again.id);
        assert_eq!(t.events().len(), 2);
        assert_eq!(t.volume_at(479), None);
        assert_eq!(t.volume_at(2000), Some(90));
        assert_eq!(t.pan_at(480), Some(20));
    }

    #[test]
    fn program_change_lives_in_one_event() {
        let mut t = track();
        assert_eq!(t.program_number(), None);
        let added = t.set_program_number(5).unwrap();
        assert_eq!(added.tick, 0);
        t.set_program_number(200).unwrap();
        assert_eq!(t.events().len(), 1);
        assert_eq!(t.program_number(), Some(127));
    }

    #[test]
    fn snapshot_restore_round_trip() {
        let mut t = track();
        t.create_or_update(note(0, 60)).unwrap();
        let snap = t.snapshot();
        t.create_or_update(note(10, 61)).unwrap();
        t.restore(snap.clone());
        assert_eq!(t.snapshot(), snap);
    }
}

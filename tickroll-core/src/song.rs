use serde::{Deserialize, Serialize};

use tickroll_types::{EventBody, EventKind, Measure, TrackEvent, TrackId};

use crate::error::EditError;
use crate::track::{Track, TrackSnapshot};

pub const DEFAULT_TIMEBASE: u32 = 480;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongSnapshot {
    pub tracks: Vec<TrackSnapshot>,
    pub next_track_id: u32,
}

/// The tracks of one song. At most one of them is the conductor track.
#[derive(Debug)]
pub struct Song {
    pub timebase: u32,
    tracks: Vec<Track>,
    next_track_id: u32,
}

impl Song {
    pub fn new(timebase: u32) -> Self {
        Self {
            timebase,
            tracks: Vec::new(),
            next_track_id: 0,
        }
    }

    /// A conductor track with 120 BPM and 4/4 at tick 0, plus one instrument track.
    pub fn with_default_tracks(timebase: u32) -> Self {
        let mut song = Self::new(timebase);
        let conductor_id = song.allocate_track_id();
        let mut conductor = Track::conductor(conductor_id);
        conductor
            .add_event(0, EventBody::tempo_bpm(120.0))
            .expect("fresh conductor track accepts tempo");
        conductor
            .add_event(
                0,
                EventBody::TimeSignature {
                    numerator: 4,
                    denominator: 4,
                },
            )
            .expect("fresh conductor track accepts time signature");
        song.tracks.push(conductor);
        song.create_track("Track 1", Some(0));
        song
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn tracks_mut(&mut self) -> &mut [Track] {
        &mut self.tracks
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn track_mut(&mut self, id: TrackId) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.id == id)
    }

    pub fn require_track_mut(&mut self, id: TrackId) -> Result<&mut Track, EditError> {
        self.track_mut(id).ok_or(EditError::TrackNotFound(id))
    }

    pub fn track_at(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn track_at_mut(&mut self, index: usize) -> Option<&mut Track> {
        self.tracks.get_mut(index)
    }

    pub fn track_index(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    pub fn conductor_track(&self) -> Option<&Track> {
        self.tracks.iter().find(|t| t.is_conductor_track)
    }

    pub fn conductor_track_mut(&mut self) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.is_conductor_track)
    }

    pub fn create_track(&mut self, name: impl Into<String>, channel: Option<u8>) -> TrackId {
        let id = self.allocate_track_id();
        self.tracks.push(Track::new(id, name, channel));
        id
    }

    pub fn create_conductor_track(&mut self) -> Result<TrackId, EditError> {
        if self.conductor_track().is_some() {
            return Err(EditError::ConductorTrackExists);
        }
        let id = self.allocate_track_id();
        self.tracks.insert(0, Track::conductor(id));
        Ok(id)
    }

    /// Add a track built elsewhere. Its id is reassigned to stay unique.
    pub fn add_track(&mut self, mut track: Track) -> Result<TrackId, EditError> {
        if track.is_conductor_track && self.conductor_track().is_some() {
            return Err(EditError::ConductorTrackExists);
        }
        track.id = self.allocate_track_id();
        let id = track.id;
        self.tracks.push(track);
        Ok(id)
    }

    pub fn remove_track(&mut self, id: TrackId) -> Option<Track> {
        let index = self.track_index(id)?;
        Some(self.tracks.remove(index))
    }

    pub fn time_signatures(&self) -> Vec<&TrackEvent> {
        self.conductor_track()
            .map(|t| {
                t.events()
                    .iter()
                    .filter(|e| e.kind() == EventKind::TimeSignature)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn measures(&self) -> Vec<Measure> {
        let events = self.conductor_track().map(|t| t.events()).unwrap_or(&[]);
        Measure::from_time_signatures(events, self.timebase)
    }

    pub fn snapshot(&self) -> SongSnapshot {
        SongSnapshot {
            tracks: self.tracks.iter().map(Track::snapshot).collect(),
            next_track_id: self.next_track_id,
        }
    }

    /// Restore track contents. Tracks that survive keep their subscribers.
    pub fn restore(&mut self, snapshot: SongSnapshot) {
        let mut previous: Vec<Track> = std::mem::take(&mut self.tracks);
        for data in snapshot.tracks {
            match previous.iter().position(|t| t.id == data.id) {
                Some(index) => {
                    let mut track = previous.swap_remove(index);
                    track.restore(data);
                    self.tracks.push(track);
                }
                None => self.tracks.push(Track::from_snapshot(data)),
            }
        }
        self.next_track_id = snapshot.next_track_id;
    }

    fn allocate_track_id(&mut self) -> TrackId {
        let id = TrackId::new(self.next_track_id);
        self.next_track_id += 1;
        id
    }
}

impl Default for Song {
    fn default() -> Self {
        Self::with_default_tracks(DEFAULT_TIMEBASE)
    }
}

use serde::{Deserialize, Serialize};

use crate::{EventBody, Tick, TrackEvent};

/// A stretch of the timeline governed by one time signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measure {
    pub start_tick: Tick,
    /// Index of the bar that begins at `start_tick`.
    pub measure: u32,
    pub numerator: u8,
    pub denominator: u8,
}

impl Measure {
    fn four_four() -> Self {
        Self {
            start_tick: 0,
            measure: 0,
            numerator: 4,
            denominator: 4,
        }
    }

    pub fn ticks_per_beat(&self, timebase: u32) -> u32 {
        timebase * 4 / self.denominator.max(1) as u32
    }

    pub fn ticks_per_bar(&self, timebase: u32) -> u32 {
        (self.ticks_per_beat(timebase) * self.numerator.max(1) as u32).max(1)
    }

    /// One entry per time-signature event in tick order. A song without any
    /// time signature, or whose first one starts late, is 4/4 from tick 0.
    pub fn from_time_signatures(events: &[TrackEvent], timebase: u32) -> Vec<Measure> {
        let mut signatures: Vec<(Tick, u8, u8)> = events
            .iter()
            .filter_map(|e| match e.body {
                EventBody::TimeSignature {
                    numerator,
                    denominator,
                } => Some((e.tick, numerator, denominator)),
                _ => None,
            })
            .collect();
        signatures.sort_by_key(|s| s.0);

        let mut measures = Vec::with_capacity(signatures.len() + 1);
        if signatures.first().map_or(true, |s| s.0 > 0) {
            measures.push(Measure::four_four());
        }
        for (tick, numerator, denominator) in signatures {
            let measure = match measures.last() {
                Some(prev) => {
                    prev.measure + (tick - prev.start_tick) / prev.ticks_per_bar(timebase)
                }
                None => 0,
            };
            let next = Measure {
                start_tick: tick,
                measure,
                numerator,
                denominator,
            };
            match measures.last_mut() {
                // A later signature on the same tick wins.
                Some(prev) if prev.start_tick == tick => *prev = next,
                _ => measures.push(next),
            }
        }
        measures
    }

    /// The measure in force at `tick`.
    pub fn at(measures: &[Measure], tick: Tick) -> Measure {
        let i = measures.partition_point(|m| m.start_tick <= tick);
        if i == 0 {
            Measure::four_four()
        } else {
            measures[i - 1]
        }
    }

    /// Start tick of the bar containing `tick`.
    pub fn measure_start(measures: &[Measure], tick: Tick, timebase: u32) -> Tick {
        let m = Measure::at(measures, tick);
        let bar = m.ticks_per_bar(timebase);
        m.start_tick + (tick - m.start_tick) / bar * bar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventId;

    fn ts(id: u32, tick: Tick, numerator: u8, denominator: u8) -> TrackEvent {
        TrackEvent {
            id: EventId::new(id),
            tick,
            body: EventBody::TimeSignature {
                numerator,
                denominator,
            },
        }
    }

    #[test]
    fn default_is_four_four() {
        let measures = Measure::from_time_signatures(&[], 480);
        assert_eq!(measures, vec![Measure::four_four()]);
        assert_eq!(Measure::measure_start(&measures, 2000, 480), 1920);
    }

    #[test]
    fn bar_length_follows_signature() {
        let m = Measure {
            start_tick: 0,
            measure: 0,
            numerator: 6,
            denominator: 8,
        };
        assert_eq!(m.ticks_per_beat(480), 240);
        assert_eq!(m.ticks_per_bar(480), 1440);
    }

    #[test]
    fn measures_count_bars_across_changes() {
        let events = vec![ts(2, 3840, 3, 4), ts(1, 0, 4, 4)];
        let measures = Measure::from_time_signatures(&events, 480);
        assert_eq!(measures.len(), 2);
        assert_eq!(measures[1].measure, 2);
        // 3/4 bars are 1440 ticks long.
        assert_eq!(Measure::measure_start(&measures, 3840 + 1500, 480), 3840 + 1440);
        assert_eq!(Measure::measure_start(&measures, 3000, 480), 1920);
    }

    #[test]
    fn late_first_signature_keeps_default_before_it() {
        let measures = Measure::from_time_signatures(&[ts(1, 1920, 3, 4)], 480);
        assert_eq!(measures[0], Measure::four_four());
        assert_eq!(measures[1].measure, 1);
    }
}

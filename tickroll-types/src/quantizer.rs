//! Grid snapping over a configurable subdivision.

use serde::{Deserialize, Serialize};

use crate::Tick;

/// Denominators offered by the quantize selector.
pub const DENOMINATORS: [u32; 8] = [1, 2, 4, 8, 16, 32, 64, 128];

const DOTTED_FACTOR: f64 = 1.5;
const TRIPLET_FACTOR: f64 = 1.5;

/// Snaps fractional ticks onto a grid of `timebase / effective_denominator`.
///
/// Dotted divides the denominator by 1.5 (longer cells), triplet multiplies it
/// by 1.5 (shorter cells). The two modifiers compose; keeping them exclusive
/// is the selector's job, not the quantizer's.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantizer {
    pub timebase: u32,
    pub denominator: u32,
    pub dotted: bool,
    pub triplet: bool,
    pub enabled: bool,
}

impl Quantizer {
    pub fn new(timebase: u32, denominator: u32) -> Self {
        Self {
            timebase,
            denominator,
            dotted: false,
            triplet: false,
            enabled: true,
        }
    }

    /// Decode a combined denominator value (e.g. `8.0 / 1.5` for a dotted
    /// eighth grid, `12.0` for an eighth triplet) back into its parts.
    pub fn from_value(timebase: u32, value: f64, enabled: bool) -> Self {
        let dotted = !is_integral(value) && is_integral(value * DOTTED_FACTOR);
        let triplet = is_integral(value / TRIPLET_FACTOR);
        let mut base = value;
        if dotted {
            base *= DOTTED_FACTOR;
        }
        if triplet {
            base /= TRIPLET_FACTOR;
        }
        Self {
            timebase,
            denominator: base.round().max(1.0) as u32,
            dotted,
            triplet,
            enabled,
        }
    }

    pub fn dotted(mut self, dotted: bool) -> Self {
        self.dotted = dotted;
        self
    }

    pub fn triplet(mut self, triplet: bool) -> Self {
        self.triplet = triplet;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Denominator after applying the dotted/triplet modifiers.
    pub fn value(&self) -> f64 {
        let mut d = self.denominator.max(1) as f64;
        if self.dotted {
            d /= DOTTED_FACTOR;
        }
        if self.triplet {
            d *= TRIPLET_FACTOR;
        }
        d
    }

    /// Grid cell length in ticks.
    pub fn unit(&self) -> f64 {
        self.timebase as f64 / self.value()
    }

    /// Nearest grid tick; ties go to the later cell.
    /// Disabled quantizers only drop the fractional part.
    pub fn round(&self, tick: f64) -> Tick {
        if !self.enabled {
            return to_tick(tick.floor());
        }
        let unit = self.unit();
        let n = (tick / unit + 0.5).floor();
        to_tick((n * unit).round())
    }

    /// Latest grid tick not after `tick`.
    pub fn floor(&self, tick: f64) -> Tick {
        if !self.enabled {
            return to_tick(tick.floor());
        }
        let unit = self.unit();
        let mut n = (tick / unit).floor();
        // The grid is the set of rounded multiples, so a rounded multiple can
        // land on either side of `tick` when the unit is fractional.
        if ((n + 1.0) * unit).round() <= tick {
            n += 1.0;
        }
        while (n * unit).round() > tick {
            n -= 1.0;
        }
        to_tick((n * unit).round())
    }

    /// Move to the neighbouring entry of [`DENOMINATORS`], keeping the modifiers.
    pub fn step_denominator(&self, delta: i32) -> Self {
        let current = DENOMINATORS
            .iter()
            .position(|&d| d == self.denominator)
            .unwrap_or(2) as i32;
        let index = (current + delta).clamp(0, DENOMINATORS.len() as i32 - 1) as usize;
        Self {
            denominator: DENOMINATORS[index],
            ..*self
        }
    }

    /// Ticks in the closed range `[from, to]`, stepping by one unit from `from`.
    /// The step ignores `enabled` so a disabled grid still spaces curve points.
    pub fn grid_ticks(&self, from: Tick, to: Tick) -> Vec<Tick> {
        let unit = self.unit();
        if unit <= 0.0 || !unit.is_finite() {
            return vec![from];
        }
        let mut ticks = Vec::new();
        let mut i = 0.0;
        loop {
            let tick = to_tick((from as f64 + i * unit).round());
            if tick > to {
                break;
            }
            if ticks.last() != Some(&tick) {
                ticks.push(tick);
            }
            i += 1.0;
        }
        ticks
    }
}

impl Default for Quantizer {
    fn default() -> Self {
        Self::new(480, 4)
    }
}

fn is_integral(value: f64) -> bool {
    (value - value.round()).abs() < 1e-9
}

fn to_tick(value: f64) -> Tick {
    // `as` saturates: negatives land on 0, overflow on Tick::MAX.
    value as Tick
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_for_plain_dotted_and_triplet() {
        let q = Quantizer::new(480, 4);
        assert_eq!(q.unit(), 120.0);
        assert!((q.dotted(true).value() - 8.0 / 3.0).abs() < 1e-9);
        assert!((q.dotted(true).unit() - 180.0).abs() < 1e-9);
        assert_eq!(q.triplet(true).value(), 6.0);
        assert!((q.triplet(true).unit() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn round_and_floor_on_quarter_grid() {
        let q = Quantizer::new(480, 4);
        assert_eq!(q.round(130.0), 120);
        assert_eq!(q.round(190.0), 240);
        assert_eq!(q.floor(190.0), 120);
    }

    #[test]
    fn round_ties_go_up() {
        let q = Quantizer::new(480, 4);
        assert_eq!(q.round(60.0), 120);
        assert_eq!(q.round(180.0), 240);
    }

    #[test]
    fn disabled_only_floors() {
        let q = Quantizer::new(480, 4).enabled(false);
        assert_eq!(q.round(130.7), 130);
        assert_eq!(q.floor(190.2), 190);
    }

    #[test]
    fn snapping_is_idempotent() {
        let grids = [
            Quantizer::new(480, 4),
            Quantizer::new(480, 16).triplet(true),
            Quantizer::new(480, 8).dotted(true),
            Quantizer::new(480, 18),
            Quantizer::new(96, 32).triplet(true),
        ];
        for q in grids {
            let mut x = 0.0;
            while x < 2000.0 {
                let r = q.round(x);
                assert_eq!(q.round(r as f64), r, "round {:?} at {}", q, x);
                let f = q.floor(x);
                assert_eq!(q.floor(f as f64), f, "floor {:?} at {}", q, x);
                x += 7.3;
            }
        }
    }

    #[test]
    fn floor_stays_below_fractional_ticks_on_fractional_grid() {
        // Dotted 1/128: unit 5.625, so 1 * unit rounds up to 6.
        let q = Quantizer::new(480, 128).dotted(true);
        assert!((q.unit() - 5.625).abs() < 1e-9);
        assert_eq!(q.floor(5.7), 0);
        assert_eq!(q.floor(6.0), 6);
        for i in 0..4000 {
            let tick = i as f64 * 0.37;
            let floored = q.floor(tick);
            assert!(floored as f64 <= tick, "floor({}) = {}", tick, floored);
            assert_eq!(q.floor(floored as f64), floored);
        }
    }

    #[test]
    fn floor_never_exceeds_input() {
        let q = Quantizer::new(480, 18);
        for t in 0..1000u32 {
            assert!(q.floor(t as f64) <= t);
        }
    }

    #[test]
    fn from_value_decodes_modifiers() {
        let dotted = Quantizer::from_value(480, 8.0 / 1.5, true);
        assert_eq!(dotted.denominator, 8);
        assert!(dotted.dotted);
        assert!(!dotted.triplet);

        let triplet = Quantizer::from_value(480, 12.0, true);
        assert_eq!(triplet.denominator, 8);
        assert!(triplet.triplet);
        assert!(!triplet.dotted);

        let plain = Quantizer::from_value(480, 16.0, false);
        assert_eq!(plain.denominator, 16);
        assert!(!plain.dotted && !plain.triplet && !plain.enabled);
    }

    #[test]
    fn step_denominator_clamps_at_ends() {
        let q = Quantizer::new(480, 4).triplet(true);
        assert_eq!(q.step_denominator(1).denominator, 8);
        assert!(q.step_denominator(1).triplet);
        assert_eq!(Quantizer::new(480, 1).step_denominator(-1).denominator, 1);
        assert_eq!(Quantizer::new(480, 128).step_denominator(3).denominator, 128);
    }

    #[test]
    fn grid_ticks_closed_range() {
        let q = Quantizer::new(480, 4);
        assert_eq!(q.grid_ticks(0, 480), vec![0, 120, 240, 360, 480]);
        assert_eq!(q.grid_ticks(240, 240), vec![240]);
        assert_eq!(q.enabled(false).grid_ticks(5, 250), vec![5, 125, 245]);
    }
}

//! Traffic lights

use rand::{Rng, seq::IndexedRandom};

use crate::types::{Heading, Light};

const PERIODS: [u32; 3] = [3, 4, 5];

/// A two-phase light that alternates between the north-south and the
/// east-west axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficLight {
    north_south_green: bool,
    period: u32,
    last_flip: u32,
}

impl TrafficLight {
    pub fn new(north_south_green: bool, period: u32) -> Self {
        Self {
            north_south_green,
            period: period.max(1),
            last_flip: 0,
        }
    }

    /// Random phase with a period of 3, 4 or 5 ticks.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let period = *PERIODS.choose(rng).unwrap_or(&PERIODS[0]);
        Self::new(rng.random::<bool>(), period)
    }

    /// Restart the phase clock for a new trial.
    pub fn reset(&mut self) {
        self.last_flip = 0;
    }

    /// Flip the phase once `period` ticks have passed since the last flip.
    pub fn update(&mut self, t: u32) {
        if t.saturating_sub(self.last_flip) >= self.period {
            self.north_south_green = !self.north_south_green;
            self.last_flip = t;
        }
    }

    /// Colour seen by a car travelling with `heading`.
    pub fn light_for(&self, heading: Heading) -> Light {
        if heading.is_vertical() == self.north_south_green {
            Light::Green
        } else {
            Light::Red
        }
    }

    pub fn period(&self) -> u32 {
        self.period
    }
}

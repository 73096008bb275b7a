use rand::Rng;
use rand::SeedableRng;

use crate::layout::HAND_BITS;
use crate::layout::HAND_SLOTS;

/// Degrees swept by an active phase, kept well below 90 where the tangent diverges.
pub const MAX_DEGREE: u8 = 45;

/// Peak brightness of an unlit LED.
pub const MAX_INTENSITY: f32 = 0.6;

/// Silent phases last a number of steps drawn from `0..MAX_SILENCE`.
pub const MAX_SILENCE: u8 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Emitting zero, `remaining` is never 0.
    Silent { remaining: u8 },
    Rising { degree: u8 },
    Falling { degree: u8 },
}

/// Brightness of the active phase at the given degree.
pub fn intensity(degree: u8) -> f32 {
    f32::from(degree).to_radians().tan() * MAX_INTENSITY
}

/// Endless brightness sequence of one LED: a random stretch of darkness followed by a tangent
/// shaped rise and fall, over and over.
#[derive(Debug, Clone)]
pub struct Oscillator<R> {
    rng: R,
    phase: Phase,
}

impl<R: Rng> Oscillator<R> {
    pub fn new(rng: R) -> Self {
        let mut oscillator = Self {
            rng,
            phase: Phase::Rising { degree: 0 },
        };
        oscillator.enter_silence();
        oscillator
    }

    /// The phase that produces the next value.
    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn step(&mut self) -> f32 {
        match self.phase {
            Phase::Silent { remaining } => {
                self.phase = match remaining - 1 {
                    0 => Phase::Rising { degree: 0 },
                    remaining => Phase::Silent { remaining },
                };
                0.0
            }

            Phase::Rising { degree } => {
                self.phase = if degree + 1 == MAX_DEGREE {
                    Phase::Falling { degree }
                } else {
                    Phase::Rising { degree: degree + 1 }
                };
                intensity(degree)
            }

            Phase::Falling { degree } => {
                if degree == 0 {
                    self.enter_silence();
                } else {
                    self.phase = Phase::Falling { degree: degree - 1 };
                }
                intensity(degree)
            }
        }
    }

    fn enter_silence(&mut self) {
        self.phase = match self.rng.gen_range(0..MAX_SILENCE) {
            0 => Phase::Rising { degree: 0 },
            remaining => Phase::Silent { remaining },
        };
    }
}

impl<R: Rng> Iterator for Oscillator<R> {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.step())
    }
}

/// One oscillator per bit of every hand slot.
#[derive(Debug, Clone)]
pub struct Oscillators<R> {
    slots: [[Oscillator<R>; HAND_BITS]; HAND_SLOTS],
}

impl<R: Rng> Oscillators<R> {
    pub fn new(mut make_rng: impl FnMut() -> R) -> Self {
        Self {
            slots: std::array::from_fn(|_| std::array::from_fn(|_| Oscillator::new(make_rng()))),
        }
    }

    /// Advances every oscillator by one step and returns the new brightness values.
    pub fn step(&mut self) -> [[f32; HAND_BITS]; HAND_SLOTS] {
        self.slots
            .each_mut()
            .map(|bits| bits.each_mut().map(|oscillator| oscillator.step()))
    }
}

impl Oscillators<rand::rngs::StdRng> {
    /// Oscillators with independent generators, all derived from `seed` when given.
    pub fn seeded(seed: Option<u64>) -> Self {
        let mut master = match seed {
            Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
            None => rand::rngs::StdRng::from_entropy(),
        };

        Self::new(|| rand::rngs::StdRng::seed_from_u64(master.gen()))
    }
}

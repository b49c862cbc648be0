//! Sources of randomness for request counts, durations and outcomes.
//!
//! Everything random in a race is drawn through [`Entropy`], so tests can pin
//! counts, durations and outcomes with [`Constant`] or [`Cycle`].

use core::fmt;
use core::ops::RangeInclusive;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

/// A uniform source of integers.
pub trait Entropy: Send + Sync {
    /// Draw a value from the inclusive `range`.
    ///
    /// Implementations must return a value inside `range`. An empty range
    /// yields its start.
    fn draw(&self, range: RangeInclusive<u64>) -> u64;
}

/// Draws from the thread-local generator of the `rand` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl Entropy for ThreadRandom {
    fn draw(&self, range: RangeInclusive<u64>) -> u64 {
        if range.is_empty() {
            return *range.start();
        }
        rand::thread_rng().gen_range(range)
    }
}

/// Always draws the same value, clamped into the requested range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constant(pub u64);

impl Entropy for Constant {
    fn draw(&self, range: RangeInclusive<u64>) -> u64 {
        clamp(self.0, &range)
    }
}

/// Draws from a fixed list of values in order, wrapping around at the end.
///
/// Each value is clamped into the requested range.
pub struct Cycle {
    values: Vec<u64>,
    cursor: AtomicUsize,
}

impl Cycle {
    /// Create a new instance of `Cycle`.
    pub fn new(values: impl IntoIterator<Item = u64>) -> Self {
        Self {
            values: values.into_iter().collect(),
            cursor: AtomicUsize::new(0),
        }
    }
}

impl fmt::Debug for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cycle")
            .field("values", &self.values)
            .field("cursor", &self.cursor.load(Ordering::Relaxed))
            .finish()
    }
}

impl Entropy for Cycle {
    fn draw(&self, range: RangeInclusive<u64>) -> u64 {
        if self.values.is_empty() {
            return *range.start();
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.values.len();
        clamp(self.values[index], &range)
    }
}

fn clamp(value: u64, range: &RangeInclusive<u64>) -> u64 {
    value.max(*range.start()).min(*range.end().max(range.start()))
}

/// Odds of a die roll: `favourable` faces out of `sides` count as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Odds {
    favourable: u64,
    sides: u64,
}

impl Odds {
    /// Create new odds of `favourable` out of `sides`.
    pub const fn new(favourable: u64, sides: u64) -> Self {
        Self { favourable, sides }
    }

    /// The number of faces that count as success.
    pub fn favourable(&self) -> u64 {
        self.favourable
    }

    /// The number of faces on the die.
    pub fn sides(&self) -> u64 {
        self.sides
    }

    /// The success probability these odds describe.
    pub fn probability(&self) -> f64 {
        if self.sides == 0 {
            return 0.0;
        }
        self.favourable as f64 / self.sides as f64
    }

    /// Roll the die once. Faces `0..favourable` are a success.
    pub fn roll(&self, entropy: &dyn Entropy) -> bool {
        if self.sides == 0 {
            return false;
        }
        entropy.draw(0..=self.sides - 1) < self.favourable
    }
}

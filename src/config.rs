//! Bounds for a race: how many requests, how long each may take, how likely
//! each is to succeed.

use core::fmt;
use core::time::Duration;
use std::error::Error;

use crate::Odds;

/// The most requests a single race spawns.
pub const MAX_REQUESTS: usize = 15;

/// The shortest simulated request latency.
pub const MIN_DURATION: Duration = Duration::from_millis(50);

/// The longest simulated request latency.
pub const MAX_DURATION: Duration = Duration::from_millis(10_000);

/// A request succeeds on four faces of a six-sided die, `p = 2/3`.
pub const SUCCESS_ODDS: Odds = Odds::new(4, 6);

/// The parameters of a race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    max_requests: usize,
    min_duration: Duration,
    max_duration: Duration,
    odds: Odds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_requests: MAX_REQUESTS,
            min_duration: MIN_DURATION,
            max_duration: MAX_DURATION,
            odds: SUCCESS_ODDS,
        }
    }
}

impl Config {
    /// Set the upper bound of the request count. The lower bound is always one.
    pub fn with_max_requests(mut self, max_requests: usize) -> Self {
        self.max_requests = max_requests;
        self
    }

    /// Set the inclusive range request durations are drawn from.
    pub fn with_durations(mut self, min: Duration, max: Duration) -> Self {
        self.min_duration = min;
        self.max_duration = max;
        self
    }

    /// Set the success odds of each request.
    pub fn with_odds(mut self, odds: Odds) -> Self {
        self.odds = odds;
        self
    }

    /// The upper bound of the request count.
    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    /// The shortest request duration.
    pub fn min_duration(&self) -> Duration {
        self.min_duration
    }

    /// The longest request duration.
    pub fn max_duration(&self) -> Duration {
        self.max_duration
    }

    /// The success odds of each request.
    pub fn odds(&self) -> Odds {
        self.odds
    }

    /// Check that the bounds describe at least one possible race.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_requests == 0 {
            return Err(ConfigError::NoRequests);
        }
        if self.min_duration > self.max_duration {
            return Err(ConfigError::InvertedDurations {
                min: self.min_duration,
                max: self.max_duration,
            });
        }
        if self.odds.sides() == 0 || self.odds.favourable() > self.odds.sides() {
            return Err(ConfigError::InvalidOdds(self.odds));
        }
        Ok(())
    }
}

/// Why a [`Config`] was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The request count upper bound is zero.
    NoRequests,
    /// The shortest duration is longer than the longest one.
    InvertedDurations {
        /// The configured shortest duration.
        min: Duration,
        /// The configured longest duration.
        max: Duration,
    },
    /// The die has no faces, or more favourable faces than it has sides.
    InvalidOdds(Odds),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRequests => write!(f, "a race needs at least one request"),
            Self::InvertedDurations { min, max } => write!(
                f,
                "minimum duration {}ms exceeds maximum duration {}ms",
                min.as_millis(),
                max.as_millis()
            ),
            Self::InvalidOdds(odds) => write!(
                f,
                "invalid odds of {} out of {}",
                odds.favourable(),
                odds.sides()
            ),
        }
    }
}

impl Error for ConfigError {}

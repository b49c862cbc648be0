//! Race a batch of simulated requests and keep the first success.
//!
//! A race spawns between one and [`MAX_REQUESTS`] requests. Each waits out a
//! random latency between [`MIN_DURATION`] and [`MAX_DURATION`], then succeeds
//! with the odds in [`SUCCESS_ODDS`]. The race resolves to `true` on the first
//! success, after cancelling every request still in flight and waiting for each
//! of them to stop. If every request fails it resolves to `false` once they have
//! all finished.
//!
//! # Operations
//!
//! - [`Spawner::spawn`]: Fan out a batch of [`Operation`]s.
//! - [`race()`]: Wait for the first successful operation, cancelling the rest.
//! - [`run`]: Both of the above in one go.
//!
//! # Examples
//!
//! ```rust
//! use request_race::{race, Config, Constant, Spawner};
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), request_race::ConfigError> {
//! let spawner = Spawner::new(Config::default())?
//!     // Always roll a winning face.
//!     .with_entropy(Constant(0));
//!
//! let fast = spawner.operation(1, Duration::from_millis(5));
//! let slow = spawner.operation(2, Duration::from_secs(60));
//! let slow_probe = slow.probe();
//!
//! let success = futures_lite::future::block_on(race(vec![fast, slow]));
//! assert!(success);
//! assert!(slow_probe.state().is_terminal());
//! # Ok(()) }
//! ```
//!
//! # Collaborators
//!
//! Randomness, latency and diagnostics are pluggable: see [`Entropy`],
//! [`Clock`] and [`Diagnostics`]. [`Constant`] and [`Cycle`] pin random draws
//! for reproducible races.

#![deny(missing_debug_implementations, nonstandard_style)]
#![warn(missing_docs, unreachable_pub)]

mod clock;
mod config;
mod diagnostics;
mod entropy;
mod operation;
mod race;
mod spawn;
mod utils;

pub use clock::{Clock, Timers};
pub use config::{Config, ConfigError, MAX_DURATION, MAX_REQUESTS, MIN_DURATION, SUCCESS_ODDS};
pub use diagnostics::{Diagnostics, Tracing};
pub use entropy::{Constant, Cycle, Entropy, Odds, ThreadRandom};
pub use operation::{CancelToken, Operation, Outcome, Probe, State, Termination};
pub use race::{race, Race};
pub use spawn::Spawner;

/// Spawn a batch from `spawner` and race it.
///
/// Reports the result to the spawner's diagnostics sink before returning it.
pub async fn run<C: Clock>(spawner: &Spawner<C>) -> bool {
    let success = race(spawner.spawn()).await;
    spawner.diagnostics().resolved(success);
    success
}

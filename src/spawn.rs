//! Fan-out: turning a [`Config`] into a batch of running operations.

use core::fmt;
use core::time::Duration;
use std::sync::Arc;

use crate::{
    Clock, Config, ConfigError, Diagnostics, Entropy, Operation, ThreadRandom, Timers, Tracing,
};

/// Spawns batches of [`Operation`]s within the bounds of a [`Config`].
///
/// The clock, the entropy and the diagnostics sink default to [`Timers`],
/// [`ThreadRandom`] and [`Tracing`], and can each be swapped out.
pub struct Spawner<C = Timers> {
    config: Config,
    clock: C,
    entropy: Arc<dyn Entropy>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl<C: fmt::Debug> fmt::Debug for Spawner<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spawner")
            .field("config", &self.config)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl Spawner<Timers> {
    /// Create a new spawner, rejecting a `config` which allows no race.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            clock: Timers,
            entropy: Arc::new(ThreadRandom),
            diagnostics: Arc::new(Tracing),
        })
    }
}

impl<C> Spawner<C> {
    /// Replace the clock which produces each operation's delay.
    pub fn with_clock<D: Clock>(self, clock: D) -> Spawner<D> {
        Spawner {
            config: self.config,
            clock,
            entropy: self.entropy,
            diagnostics: self.diagnostics,
        }
    }

    /// Replace the source of counts, durations and outcomes.
    pub fn with_entropy(mut self, entropy: impl Entropy + 'static) -> Self {
        self.entropy = Arc::new(entropy);
        self
    }

    /// Replace the diagnostics sink.
    pub fn with_diagnostics(mut self, diagnostics: impl Diagnostics + 'static) -> Self {
        self.diagnostics = Arc::new(diagnostics);
        self
    }

    /// The bounds this spawner draws from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn diagnostics(&self) -> &dyn Diagnostics {
        &*self.diagnostics
    }

    /// Draw a request count from `1..=max_requests`.
    pub fn request_count(&self) -> usize {
        let max = self.config.max_requests() as u64;
        self.entropy.draw(1..=max) as usize
    }

    /// Draw a duration from `min_duration..=max_duration`, in whole milliseconds.
    pub fn request_duration(&self) -> Duration {
        let min = millis(self.config.min_duration());
        let max = millis(self.config.max_duration());
        Duration::from_millis(self.entropy.draw(min..=max))
    }
}

impl<C: Clock> Spawner<C> {
    /// Spawn a batch of a random size with random durations.
    pub fn spawn(&self) -> Vec<Operation<C::Sleep>> {
        self.spawn_exact(self.request_count())
    }

    /// Spawn `count` operations with random durations, numbered from one.
    pub fn spawn_exact(&self, count: usize) -> Vec<Operation<C::Sleep>> {
        self.diagnostics.spawned(count);
        (1..=count)
            .map(|id| self.operation(id, self.request_duration()))
            .collect()
    }

    /// Spawn a single operation with a given `duration`.
    ///
    /// The duration is taken as is; it is not checked against the config.
    pub fn operation(&self, id: usize, duration: Duration) -> Operation<C::Sleep> {
        Operation::new(
            id,
            duration,
            self.clock.sleep(duration),
            self.config.odds(),
            self.entropy.clone(),
            self.diagnostics.clone(),
        )
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

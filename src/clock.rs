//! Where the simulated latency of a request comes from.

use core::future::Future;
use core::time::Duration;

use async_io::Timer;

/// Produces the delay an operation waits out before it settles.
pub trait Clock {
    /// The delay future. Its output is ignored.
    type Sleep: Future;

    /// Create a delay of `duration`.
    fn sleep(&self, duration: Duration) -> Self::Sleep;
}

/// Real timers from the `async-io` reactor.
///
/// The deadline is fixed when the timer is created, so an operation's clock
/// starts ticking when it is spawned rather than when it is first polled.
#[derive(Debug, Clone, Copy, Default)]
pub struct Timers;

impl Clock for Timers {
    type Sleep = Timer;

    fn sleep(&self, duration: Duration) -> Self::Sleep {
        Timer::after(duration)
    }
}

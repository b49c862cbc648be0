//! Race a batch of operations and keep the first success.

use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{ready, Context, Poll};
use futures_core::stream::Stream;

use crate::{Operation, Termination};
use group::CompletionGroup;

mod group;

/// Race `operations`, resolving to `true` as soon as one of them succeeds.
///
/// Completions are observed one at a time. A failed or cancelled operation is
/// dropped from the race and the rest keep going. On the first success every
/// operation still running is cancelled, and the race only resolves once each
/// of them has acknowledged by terminating. If no operation succeeds the race
/// resolves to `false` once all of them have terminated. An empty batch
/// resolves to `false` straight away.
///
/// Either way, every operation handed in is terminal by the time the race
/// resolves.
///
/// # Examples
///
/// ```rust
/// use request_race::{race, Config, Spawner};
/// use std::time::Duration;
///
/// # futures_lite::future::block_on(async {
/// let config = Config::default()
///     .with_durations(Duration::from_millis(1), Duration::from_millis(5));
/// let spawner = Spawner::new(config)?;
/// let operations = spawner.spawn();
/// let probes: Vec<_> = operations.iter().map(|op| op.probe()).collect();
///
/// let success = race(operations).await;
/// assert!(probes.iter().all(|probe| probe.state().is_terminal()));
/// # let _ = success;
/// # Ok::<(), request_race::ConfigError>(())
/// # }).unwrap();
/// ```
pub fn race<S, I>(operations: I) -> Race<S>
where
    S: Future,
    I: IntoIterator<Item = Operation<S>>,
{
    let mut group = CompletionGroup::new();
    let mut ids = vec![];
    for operation in operations {
        let id = operation.id();
        let key = group.insert(operation);
        debug_assert_eq!(key.index(), ids.len());
        ids.push(id);
    }
    Race {
        group,
        ids,
        phase: Phase::Racing,
    }
}

/// A future which resolves to whether any of its operations succeeded.
///
/// This `struct` is created by the [`race`] function. See its documentation
/// for more.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Race<S> {
    group: CompletionGroup<Operation<S>>,
    ids: Vec<usize>,
    phase: Phase,
}

/// The internal state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Waiting for the first success.
    Racing,
    /// A success was found; waiting for the cancelled rest to terminate.
    Draining,
    Completed,
}

impl<S> fmt::Debug for Race<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Race")
            .field("phase", &self.phase)
            .field("remaining", &self.remaining())
            .finish()
    }
}

impl<S> Race<S> {
    /// The number of operations the race has not yet seen terminate.
    pub fn remaining(&self) -> usize {
        self.group.len()
    }

    fn cancel_remaining(&self) {
        for (_, operation) in self.group.iter() {
            operation.cancel();
        }
    }
}

impl<S: Future> Future for Race<S> {
    type Output = bool;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        loop {
            match this.phase {
                Phase::Racing => match ready!(Pin::new(&mut this.group).poll_next(cx)) {
                    Some((key, Termination::Completed(outcome))) if outcome.is_success() => {
                        tracing::debug!(
                            winner = this.ids.get(key.index()).copied(),
                            remaining = this.group.len(),
                            "first success, cancelling the rest"
                        );
                        this.cancel_remaining();
                        this.phase = Phase::Draining;
                    }
                    Some((key, termination)) => {
                        tracing::trace!(
                            id = this.ids.get(key.index()).copied(),
                            state = %termination.state(),
                            "request out of the race"
                        );
                    }
                    None => {
                        this.phase = Phase::Completed;
                        return Poll::Ready(false);
                    }
                },
                Phase::Draining => match ready!(Pin::new(&mut this.group).poll_next(cx)) {
                    Some((key, termination)) => {
                        tracing::trace!(
                            id = this.ids.get(key.index()).copied(),
                            state = %termination.state(),
                            "request drained"
                        );
                    }
                    None => {
                        this.phase = Phase::Completed;
                        return Poll::Ready(true);
                    }
                },
                Phase::Completed => panic!("`Race` polled after completing"),
            }
        }
    }
}

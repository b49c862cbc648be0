use core::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Where an operation is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum State {
    /// Spawned, not yet polled.
    Pending,
    /// Waiting out its delay.
    Running,
    /// Settled on success.
    Succeeded,
    /// Settled on failure.
    Failed,
    /// Stopped before it settled.
    Cancelled,
}

impl State {
    /// Returns `true` for [`Succeeded`][Self::Succeeded],
    /// [`Failed`][Self::Failed] and [`Cancelled`][Self::Cancelled].
    #[must_use]
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Pending,
            1 => Self::Running,
            2 => Self::Succeeded,
            3 => Self::Failed,
            4 => Self::Cancelled,
            _ => unreachable!("invalid operation state {value}"),
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        })
    }
}

/// What a request settled on once its delay was over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The request succeeded.
    Succeeded,
    /// The request failed.
    Failed,
}

impl Outcome {
    /// Returns `true` if the outcome is [`Succeeded`][Self::Succeeded].
    #[must_use]
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        State::from(*self).fmt(f)
    }
}

impl From<Outcome> for State {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Succeeded => Self::Succeeded,
            Outcome::Failed => Self::Failed,
        }
    }
}

/// How an operation ended: with an outcome, or by being cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    /// The delay ran out and an outcome was drawn.
    Completed(Outcome),
    /// The operation was stopped before drawing an outcome.
    Cancelled,
}

impl Termination {
    /// Returns `true` only for a completed, successful operation.
    #[must_use]
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed(Outcome::Succeeded))
    }

    /// The terminal [`State`] this termination corresponds to.
    pub fn state(&self) -> State {
        match self {
            Self::Completed(outcome) => (*outcome).into(),
            Self::Cancelled => State::Cancelled,
        }
    }
}

/// The shared slot holding an operation's [`State`].
#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(State::Pending as u8))
    }

    pub(crate) fn get(&self) -> State {
        State::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Move from `Pending` to `Running`. Returns whether this call did so.
    pub(crate) fn start(&self) -> bool {
        self.0
            .compare_exchange(
                State::Pending as u8,
                State::Running as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Move into the terminal state `to`.
    ///
    /// Returns `false`, leaving the cell untouched, if it already holds a
    /// terminal state.
    pub(crate) fn finish(&self, to: State) -> bool {
        debug_assert!(to.is_terminal(), "`{to}` is not a terminal state");
        self.0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (!State::from_u8(current).is_terminal()).then_some(to as u8)
            })
            .is_ok()
    }
}

//! A single simulated request.
//!
//! An [`Operation`] waits out its delay, then rolls its odds and settles on an
//! [`Outcome`]. If its [`CancelToken`] fires first it stops without rolling and
//! terminates as [`Termination::Cancelled`].

use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{ready, Context, Poll};
use core::time::Duration;
use std::sync::Arc;

use crate::{Diagnostics, Entropy, Odds};

pub use cancel::CancelToken;
pub use state::{Outcome, State, Termination};

pub(crate) use state::StateCell;

mod cancel;
mod state;

/// A simulated request which settles after a delay, unless cancelled first.
///
/// This `struct` is created by the [`Spawner`]. Use [`probe`] to keep an eye
/// on it after it has been handed to a [`race`].
///
/// [`Spawner`]: crate::Spawner
/// [`probe`]: Operation::probe
/// [`race`]: crate::race()
#[pin_project::pin_project]
#[must_use = "operations do nothing unless raced or polled"]
pub struct Operation<S> {
    id: usize,
    duration: Duration,
    #[pin]
    sleep: S,
    odds: Odds,
    token: CancelToken,
    state: Arc<StateCell>,
    entropy: Arc<dyn Entropy>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl<S> fmt::Debug for Operation<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("id", &self.id)
            .field("duration", &self.duration)
            .field("state", &self.state.get())
            .finish()
    }
}

impl<S> Operation<S> {
    pub(crate) fn new(
        id: usize,
        duration: Duration,
        sleep: S,
        odds: Odds,
        entropy: Arc<dyn Entropy>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        Self {
            id,
            duration,
            sleep,
            odds,
            token: CancelToken::new(),
            state: Arc::new(StateCell::new()),
            entropy,
            diagnostics,
        }
    }

    /// The identifier of this operation, unique within its batch.
    pub fn id(&self) -> usize {
        self.id
    }

    /// How long this operation waits before it settles.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// The current lifecycle state.
    pub fn state(&self) -> State {
        self.state.get()
    }

    /// Ask the operation to stop. Has no effect once it is terminal.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Create an observer which outlives handing the operation off.
    pub fn probe(&self) -> Probe {
        Probe {
            id: self.id,
            state: self.state.clone(),
            token: self.token.clone(),
        }
    }
}

impl<S: Future> Future for Operation<S> {
    type Output = Termination;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        assert!(
            !this.state.get().is_terminal(),
            "operation polled after completing"
        );

        if this.token.is_cancelled() {
            return Poll::Ready(abort(*this.id, this.state, &**this.diagnostics));
        }
        this.state.start();
        this.token.register(cx.waker());
        if this.token.is_cancelled() {
            return Poll::Ready(abort(*this.id, this.state, &**this.diagnostics));
        }

        ready!(this.sleep.poll(cx));

        let outcome = if this.odds.roll(&**this.entropy) {
            Outcome::Succeeded
        } else {
            Outcome::Failed
        };
        this.state.finish(outcome.into());
        this.diagnostics.completed(*this.id, outcome, *this.duration);
        Poll::Ready(Termination::Completed(outcome))
    }
}

fn abort(id: usize, state: &StateCell, diagnostics: &dyn Diagnostics) -> Termination {
    state.finish(State::Cancelled);
    diagnostics.cancelled(id);
    Termination::Cancelled
}

/// Observes an [`Operation`] from the outside.
#[derive(Debug, Clone)]
pub struct Probe {
    id: usize,
    state: Arc<StateCell>,
    token: CancelToken,
}

impl Probe {
    /// The identifier of the observed operation.
    pub fn id(&self) -> usize {
        self.id
    }

    /// The current lifecycle state of the observed operation.
    pub fn state(&self) -> State {
        self.state.get()
    }

    /// Ask the observed operation to stop. Has no effect once it is terminal.
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

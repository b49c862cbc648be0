//! Deterministic stand-ins shared by the unit tests.

use core::future::{ready, Future, Ready};
use core::ops::RangeInclusive;
use core::pin::Pin;
use core::task::{Context, Poll};
use core::time::Duration;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Wake, Waker};

use crate::{Clock, Entropy};

/// A waker which counts how often it was woken.
#[derive(Debug, Default)]
pub(crate) struct CountingWaker {
    count: AtomicUsize,
}

impl CountingWaker {
    pub(crate) fn new() -> (Waker, Arc<Self>) {
        let this = Arc::new(Self::default());
        (this.clone().into(), this)
    }

    pub(crate) fn get(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl Wake for CountingWaker {
    fn wake(self: Arc<Self>) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

/// A clock whose delays are over as soon as they are polled.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Immediate;

impl Clock for Immediate {
    type Sleep = Ready<()>;

    fn sleep(&self, _duration: Duration) -> Self::Sleep {
        ready(())
    }
}

/// A clock on which time never advances: only zero-length delays are over.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frozen;

impl Clock for Frozen {
    type Sleep = FrozenSleep;

    fn sleep(&self, duration: Duration) -> Self::Sleep {
        FrozenSleep {
            over: duration.is_zero(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct FrozenSleep {
    over: bool,
}

impl Future for FrozenSleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        if self.over {
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }
}

/// Entropy which must never be drawn from.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Tripwire;

impl Entropy for Tripwire {
    fn draw(&self, _range: RangeInclusive<u64>) -> u64 {
        panic!("entropy drawn from a cancelled operation")
    }
}

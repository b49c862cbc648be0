use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::task::Waker;

/// A cooperative cancellation signal.
///
/// Cloning a token shares the signal. Cancelling wakes whichever task last
/// registered interest, so a suspended operation notices promptly.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    waker: Mutex<Option<Waker>>,
}

impl CancelToken {
    /// Create a new instance of `CancelToken`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation. Cancelling twice is a no-op.
    pub fn cancel(&self) {
        if self.inner.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }
        let waker = self.inner.waker.lock().unwrap().take();
        if let Some(waker) = waker {
            waker.wake();
        }
    }

    /// Returns `true` once [`cancel`][Self::cancel] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Register the waker to notify on cancellation.
    ///
    /// Callers must check [`is_cancelled`][Self::is_cancelled] again after
    /// registering.
    pub(crate) fn register(&self, waker: &Waker) {
        let mut slot = self.inner.waker.lock().unwrap();
        match &mut *slot {
            Some(prev) if prev.will_wake(waker) => {}
            slot => *slot = Some(waker.clone()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::testing::CountingWaker;

    #[test]
    fn cancel_wakes_registered_waker() {
        let token = CancelToken::new();
        let (waker, count) = CountingWaker::new();
        token.register(&waker);
        assert!(!token.is_cancelled());

        token.clone().cancel();
        assert!(token.is_cancelled());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn cancel_is_idempotent() {
        let token = CancelToken::new();
        let (waker, count) = CountingWaker::new();
        token.register(&waker);
        token.cancel();
        token.register(&waker);
        token.cancel();
        assert!(token.is_cancelled());
        assert_eq!(count.get(), 1);
    }
}

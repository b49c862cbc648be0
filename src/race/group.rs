use core::fmt::{self, Debug};
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures_core::stream::Stream;
use slab::Slab;

use crate::utils::SlotWakers;

/// The futures a race has not yet seen complete.
///
/// Yields one `(key, output)` pair per completion, removing the future before
/// yielding it, so every completion is observed exactly once. Each future gets
/// its own waker; only futures which were woken are polled again.
pub(crate) struct CompletionGroup<F> {
    futures: Slab<Pin<Box<F>>>,
    wakers: SlotWakers,
}

impl<F> Debug for CompletionGroup<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionGroup")
            .field("slab", &"[..]")
            .field("len", &self.len())
            .finish()
    }
}

impl<F> Default for CompletionGroup<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> CompletionGroup<F> {
    pub(crate) fn new() -> Self {
        Self {
            futures: Slab::new(),
            wakers: SlotWakers::default(),
        }
    }

    /// Return the number of futures still in the group.
    pub(crate) fn len(&self) -> usize {
        self.futures.len()
    }

    /// Insert a new future into the group.
    pub(crate) fn insert(&mut self, future: F) -> Key {
        let index = self.futures.insert(Box::pin(future));
        self.wakers.resize(self.futures.capacity().max(index + 1));
        self.wakers.readiness().set_ready(index);
        Key(index)
    }

    /// Iterate over the futures still in the group.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (Key, &F)> + '_ {
        self.futures
            .iter()
            .map(|(index, future)| (Key(index), future.as_ref().get_ref()))
    }
}

impl<F: Future> Stream for CompletionGroup<F> {
    type Item = (Key, F::Output);

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        // Short-circuit if we have no futures to iterate over
        if this.futures.is_empty() {
            return Poll::Ready(None);
        }

        {
            let mut readiness = this.wakers.readiness();
            readiness.set_waker(cx.waker());
            if !readiness.any_ready() {
                return Poll::Pending;
            }
        }

        let mut completed = None;
        for (index, future) in this.futures.iter_mut() {
            // The readiness lock must not be held while polling, the future
            // may wake itself.
            if !this.wakers.readiness().clear_ready(index) {
                continue;
            }

            let waker = this
                .wakers
                .get(index)
                .expect("a waker is allocated for every slot on insert");
            let mut cx = Context::from_waker(waker);
            if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
                completed = Some((Key(index), output));
                break;
            }
        }

        match completed {
            Some((key, output)) => {
                this.futures.remove(key.0);
                Poll::Ready(Some((key, output)))
            }
            None => Poll::Pending,
        }
    }
}

impl<F> FromIterator<F> for CompletionGroup<F> {
    fn from_iter<T: IntoIterator<Item = F>>(iter: T) -> Self {
        let mut this = Self::new();
        for future in iter {
            this.insert(future);
        }
        this
    }
}

/// A key used to index into the `CompletionGroup` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Key(usize);

impl Key {
    pub(crate) fn index(&self) -> usize {
        self.0
    }
}

use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Wake, Waker};

use fixedbitset::FixedBitSet;

/// Tracks which slots were woken and should be polled again.
#[derive(Debug)]
pub(crate) struct Readiness {
    ready_count: usize,
    slots: FixedBitSet,
    parent_waker: Option<Waker>,
}

impl Readiness {
    /// Create a new instance with every slot marked as ready.
    fn new(len: usize) -> Self {
        let mut slots = FixedBitSet::with_capacity(len);
        slots.set_range(.., true);
        Self {
            ready_count: len,
            slots,
            parent_waker: None,
        }
    }

    /// Set the ready state to `true` for the given index.
    ///
    /// Returns the old ready state for this index.
    pub(crate) fn set_ready(&mut self, index: usize) -> bool {
        if self.slots[index] {
            true
        } else {
            self.ready_count += 1;
            self.slots.set(index, true);
            false
        }
    }

    /// Set the ready state to `false` for the given index.
    ///
    /// Returns whether the index was previously ready.
    pub(crate) fn clear_ready(&mut self, index: usize) -> bool {
        if self.slots[index] {
            self.ready_count -= 1;
            self.slots.set(index, false);
            true
        } else {
            false
        }
    }

    /// Returns `true` if any of the slots are ready.
    pub(crate) fn any_ready(&self) -> bool {
        self.ready_count > 0
    }

    /// Set the parent `Waker`. This needs to be called at the start of every
    /// `poll` function.
    pub(crate) fn set_waker(&mut self, parent_waker: &Waker) {
        match &mut self.parent_waker {
            Some(prev) => prev.clone_from(parent_waker),
            None => self.parent_waker = Some(parent_waker.clone()),
        }
    }

    /// Grow to `len` slots. New slots start out ready.
    fn grow(&mut self, len: usize) {
        let old_len = self.slots.len();
        if len <= old_len {
            return;
        }
        self.slots.grow(len);
        self.slots.set_range(old_len..len, true);
        self.ready_count += len - old_len;
    }
}

/// Wakes a single slot: marks it ready and forwards to the parent waker.
#[derive(Debug)]
struct SlotWaker {
    index: usize,
    readiness: Arc<Mutex<Readiness>>,
}

impl Wake for SlotWaker {
    fn wake(self: Arc<Self>) {
        self.wake_by_ref()
    }

    fn wake_by_ref(self: &Arc<Self>) {
        let mut readiness = self.readiness.lock().unwrap();
        if !readiness.set_ready(self.index) {
            if let Some(parent) = readiness.parent_waker.as_ref() {
                parent.wake_by_ref();
            }
        }
    }
}

/// One waker per slot, all sharing a single readiness tracker.
#[derive(Debug)]
pub(crate) struct SlotWakers {
    wakers: Vec<Waker>,
    readiness: Arc<Mutex<Readiness>>,
}

impl Default for SlotWakers {
    fn default() -> Self {
        Self::new(0)
    }
}

impl SlotWakers {
    pub(crate) fn new(len: usize) -> Self {
        let mut this = Self {
            wakers: Vec::with_capacity(len),
            readiness: Arc::new(Mutex::new(Readiness::new(0))),
        };
        this.resize(len);
        this
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Waker> {
        self.wakers.get(index)
    }

    /// Lock the readiness tracker.
    pub(crate) fn readiness(&self) -> MutexGuard<'_, Readiness> {
        self.readiness.lock().unwrap()
    }

    /// Make sure there is a waker for every index below `len`.
    pub(crate) fn resize(&mut self, len: usize) {
        let mut index = self.wakers.len();
        let readiness = &self.readiness;
        self.wakers.resize_with(len.max(index), || {
            let waker = Arc::new(SlotWaker {
                index,
                readiness: readiness.clone(),
            })
            .into();
            index += 1;
            waker
        });
        self.readiness().grow(len);
    }
}

//! Utilities to implement the race machinery of this crate.

mod wakers;

#[cfg(test)]
pub(crate) mod testing;

pub(crate) use wakers::SlotWakers;

//! Bounded append buffer with an atomic slot counter.
//!
//! ```text
//!             counter.fetch_add(1)
//!   thread A ─────────┐
//!   thread B ───────┐ │
//!                   ▼ ▼
//!   slots: [ T0 | T1 | T2 | T3 | ·· | ·· ]   capacity = 6
//!                                ▲
//!                                counter = 4
//! ```
//!
//! Every append claims a unique slot with one `fetch_add`, so concurrent
//! writers never collide and never lose an update. Slots are `OnceLock`s:
//! each is written exactly once per epoch and read only after the dispatch
//! that filled it has joined. Appends past capacity are dropped and counted.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

pub struct AppendBuffer<T> {
  slots: Box<[OnceLock<T>]>,
  counter: AtomicU32,
  dropped: AtomicU32,
  /// One past the highest slot ever written since the last reset.
  high_water: AtomicU32,
}

impl<T> AppendBuffer<T> {
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      slots: (0..capacity).map(|_| OnceLock::new()).collect(),
      counter: AtomicU32::new(0),
      dropped: AtomicU32::new(0),
      high_water: AtomicU32::new(0),
    }
  }

  #[inline]
  pub fn capacity(&self) -> usize {
    self.slots.len()
  }

  /// Claim the next slot and store `value` in it.
  ///
  /// Returns the slot index, or `None` if the buffer is full.
  #[inline]
  pub fn append(&self, value: T) -> Option<u32> {
    let slot = self.counter.fetch_add(1, Ordering::Relaxed);
    if self.write_at(slot as usize, value) {
      Some(slot)
    } else {
      None
    }
  }

  /// Store `value` in a fixed slot without touching the counter.
  ///
  /// Returns `false` if the slot is out of range or already written.
  #[inline]
  pub fn write_at(&self, slot: usize, value: T) -> bool {
    let Some(cell) = self.slots.get(slot) else {
      self.dropped.fetch_add(1, Ordering::Relaxed);
      return false;
    };
    if cell.set(value).is_err() {
      self.dropped.fetch_add(1, Ordering::Relaxed);
      return false;
    }
    self.high_water.fetch_max(slot as u32 + 1, Ordering::Relaxed);
    true
  }

  /// Raw counter value. May exceed capacity if appends were dropped.
  #[inline]
  pub fn counter(&self) -> u32 {
    self.counter.load(Ordering::Acquire)
  }

  /// Number of appended values actually stored.
  #[inline]
  pub fn len(&self) -> u32 {
    self.counter().min(self.capacity() as u32)
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Writes rejected since the last reset.
  #[inline]
  pub fn dropped(&self) -> u32 {
    self.dropped.load(Ordering::Relaxed)
  }

  /// Value in `slot`, if one was written.
  #[inline]
  pub fn get(&self, slot: usize) -> Option<&T> {
    self.slots.get(slot).and_then(OnceLock::get)
  }

  /// Clear every written slot and zero the counters.
  ///
  /// Takes `&mut self`, so no dispatch can be appending concurrently.
  pub fn reset(&mut self) {
    let used = (*self.high_water.get_mut() as usize).min(self.slots.len());
    for slot in &mut self.slots[..used] {
      slot.take();
    }
    *self.counter.get_mut() = 0;
    *self.dropped.get_mut() = 0;
    *self.high_water.get_mut() = 0;
  }
}

impl<T: Clone> AppendBuffer<T> {
  /// Copy out the first `len()` appended values, in slot order.
  pub fn to_vec(&self) -> Vec<T> {
    (0..self.len() as usize)
      .filter_map(|slot| self.get(slot).cloned())
      .collect()
  }
}

impl<T> std::fmt::Debug for AppendBuffer<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AppendBuffer")
      .field("capacity", &self.capacity())
      .field("counter", &self.counter())
      .field("dropped", &self.dropped())
      .finish()
  }
}

#[cfg(test)]
#[path = "buffer_test.rs"]
mod buffer_test;

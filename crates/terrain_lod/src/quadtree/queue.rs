//! Lock-free fixed-capacity append buffers and the double-buffered work
//! queue.
//!
//! Slots are reserved with a single `fetch_add` on the cursor; the slot is
//! then written by the reserving task alone. Reads happen only after the
//! parallel phase has joined, so relaxed ordering is enough.
//!
//! ```text
//!   phase N:   read ──▶ tasks ──▶ write
//!                                   │
//!   swap():    read ◀───────────────┘   write cleared
//! ```
//!
//! Appends past capacity are refused; the cursor keeps counting so the
//! shortfall can be reported.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use super::PatchKey;

/// Fixed-capacity append-only buffer of `WORDS`-word records.
pub struct AppendBuffer<const WORDS: usize> {
  slots: Box<[AtomicU64]>,
  capacity: usize,
  cursor: AtomicUsize,
}

impl<const WORDS: usize> AppendBuffer<WORDS> {
  /// Allocate room for `capacity` records.
  pub fn with_capacity(capacity: usize) -> Self {
    let slots = (0..capacity.saturating_mul(WORDS))
      .map(|_| AtomicU64::new(0))
      .collect();
    Self {
      slots,
      capacity,
      cursor: AtomicUsize::new(0),
    }
  }

  #[inline]
  pub fn capacity(&self) -> usize {
    self.capacity
  }

  /// Reserve a slot and store the record.
  ///
  /// Returns the record index, or None when the buffer is full.
  #[inline]
  pub fn push(&self, record: [u64; WORDS]) -> Option<usize> {
    let index = self.cursor.fetch_add(1, Ordering::Relaxed);
    if index >= self.capacity {
      return None;
    }
    let base = index * WORDS;
    for (slot, word) in self.slots[base..base + WORDS].iter().zip(record) {
      slot.store(word, Ordering::Relaxed);
    }
    Some(index)
  }

  /// Number of stored records.
  #[inline]
  pub fn len(&self) -> usize {
    self.cursor.load(Ordering::Relaxed).min(self.capacity)
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Appends refused since the last clear.
  #[inline]
  pub fn overflowed(&self) -> usize {
    self
      .cursor
      .load(Ordering::Relaxed)
      .saturating_sub(self.capacity)
  }

  pub fn get(&self, index: usize) -> Option<[u64; WORDS]> {
    if index >= self.len() {
      return None;
    }
    let base = index * WORDS;
    Some(std::array::from_fn(|word| {
      self.slots[base + word].load(Ordering::Relaxed)
    }))
  }

  pub fn iter(&self) -> impl Iterator<Item = [u64; WORDS]> + '_ {
    (0..self.len()).filter_map(move |index| self.get(index))
  }

  /// Reset the cursor. Exclusive access guarantees no append is in flight.
  pub fn clear(&mut self) {
    *self.cursor.get_mut() = 0;
  }
}

/// Double-buffered queue of patch keys.
///
/// Tasks read from one buffer by index and append to the other; `swap`
/// separates phases.
pub struct WorkQueue {
  read: AppendBuffer<1>,
  write: AppendBuffer<1>,
}

impl WorkQueue {
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      read: AppendBuffer::with_capacity(capacity),
      write: AppendBuffer::with_capacity(capacity),
    }
  }

  #[inline]
  pub fn capacity(&self) -> usize {
    self.write.capacity()
  }

  /// Empty both buffers.
  pub fn reset(&mut self) {
    self.read.clear();
    self.write.clear();
  }

  /// Append a key for the next phase. Returns false when refused.
  #[inline]
  pub fn push(&self, key: PatchKey) -> bool {
    self.write.push([key.pack()]).is_some()
  }

  /// Keys available to the current phase.
  #[inline]
  pub fn pending(&self) -> usize {
    self.read.len()
  }

  /// Key at `index` in the current phase.
  #[inline]
  pub fn read(&self, index: usize) -> Option<PatchKey> {
    self.read.get(index).map(|[word]| PatchKey::unpack(word))
  }

  /// Keys appended for the next phase so far.
  #[inline]
  pub fn queued(&self) -> usize {
    self.write.len()
  }

  /// Promote the write buffer to the read side and clear the new write
  /// buffer.
  ///
  /// Returns the number of appends refused during the finished phase.
  pub fn swap(&mut self) -> usize {
    let overflowed = self.write.overflowed();
    std::mem::swap(&mut self.read, &mut self.write);
    self.write.clear();
    overflowed
  }
}

#[cfg(test)]
#[path = "queue_test.rs"]
mod queue_test;

use std::collections::HashSet;

use rayon::prelude::*;

use super::*;

// =========================================================================
// Batch 1: AppendBuffer Tests
// =========================================================================

#[test]
fn test_push_and_get() {
  let buffer = AppendBuffer::<2>::with_capacity(4);
  assert!(buffer.is_empty());

  assert_eq!(buffer.push([1, 10]), Some(0));
  assert_eq!(buffer.push([2, 20]), Some(1));

  assert_eq!(buffer.len(), 2);
  assert_eq!(buffer.get(0), Some([1, 10]));
  assert_eq!(buffer.get(1), Some([2, 20]));
  assert_eq!(buffer.get(2), None, "Unwritten slots are not readable");
}

/// Appends past capacity are refused and counted, never written.
#[test]
fn test_push_past_capacity_is_refused() {
  let buffer = AppendBuffer::<1>::with_capacity(2);
  assert!(buffer.push([1]).is_some());
  assert!(buffer.push([2]).is_some());
  assert!(buffer.push([3]).is_none());
  assert!(buffer.push([4]).is_none());

  assert_eq!(buffer.len(), 2, "Length is clamped to capacity");
  assert_eq!(buffer.overflowed(), 2);
  assert_eq!(buffer.iter().collect::<Vec<_>>(), vec![[1], [2]]);
}

#[test]
fn test_zero_capacity_refuses_everything() {
  let buffer = AppendBuffer::<1>::with_capacity(0);
  assert!(buffer.push([7]).is_none());
  assert!(buffer.is_empty());
  assert_eq!(buffer.overflowed(), 1);
}

#[test]
fn test_clear_resets_cursor() {
  let mut buffer = AppendBuffer::<1>::with_capacity(1);
  buffer.push([1]);
  buffer.push([2]);
  buffer.clear();
  assert!(buffer.is_empty());
  assert_eq!(buffer.overflowed(), 0);
  assert_eq!(buffer.push([3]), Some(0));
}

/// Concurrent appends reserve distinct slots and lose nothing.
#[test]
fn test_parallel_push_reserves_unique_slots() {
  let buffer = AppendBuffer::<1>::with_capacity(10_000);
  (0..10_000u64).into_par_iter().for_each(|value| {
    assert!(buffer.push([value]).is_some());
  });

  let values: HashSet<u64> = buffer.iter().map(|[value]| value).collect();
  assert_eq!(values.len(), 10_000);
  assert_eq!(buffer.overflowed(), 0);
}

/// Concurrent overflow never stores more than capacity.
#[test]
fn test_parallel_overflow_is_bounded() {
  let buffer = AppendBuffer::<1>::with_capacity(100);
  let accepted: usize = (0..1_000u64)
    .into_par_iter()
    .map(|value| buffer.push([value]).map_or(0, |_| 1))
    .sum();

  assert_eq!(accepted, 100);
  assert_eq!(buffer.len(), 100);
  assert_eq!(buffer.overflowed(), 900);
}

// =========================================================================
// Batch 2: WorkQueue Tests
// =========================================================================

#[test]
fn test_swap_promotes_writes() {
  let mut queue = WorkQueue::with_capacity(8);
  let keys = [PatchKey::new(0, 0, 2), PatchKey::new(1, 0, 2)];
  for key in keys {
    assert!(queue.push(key));
  }
  assert_eq!(queue.pending(), 0, "Writes are invisible until swap");
  assert_eq!(queue.queued(), 2);

  assert_eq!(queue.swap(), 0);
  assert_eq!(queue.pending(), 2);
  assert_eq!(queue.queued(), 0);

  let read: Vec<_> = (0..queue.pending()).filter_map(|i| queue.read(i)).collect();
  assert_eq!(read, keys.to_vec());
}

/// A second swap discards the keys consumed by the finished phase.
#[test]
fn test_swap_clears_consumed_phase() {
  let mut queue = WorkQueue::with_capacity(4);
  queue.push(PatchKey::new(0, 0, 1));
  queue.swap();
  queue.push(PatchKey::new(3, 3, 0));
  queue.swap();

  assert_eq!(queue.pending(), 1);
  assert_eq!(queue.read(0), Some(PatchKey::new(3, 3, 0)));
}

#[test]
fn test_swap_reports_overflow() {
  let mut queue = WorkQueue::with_capacity(1);
  assert!(queue.push(PatchKey::new(0, 0, 0)));
  assert!(!queue.push(PatchKey::new(1, 0, 0)));
  assert_eq!(queue.swap(), 1);
  assert_eq!(queue.pending(), 1);
}

#[test]
fn test_reset_empties_both_sides() {
  let mut queue = WorkQueue::with_capacity(4);
  queue.push(PatchKey::new(0, 0, 0));
  queue.swap();
  queue.push(PatchKey::new(1, 0, 0));
  queue.reset();
  assert_eq!(queue.pending(), 0);
  assert_eq!(queue.queued(), 0);
}

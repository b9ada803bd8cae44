use rayon::prelude::*;

use super::*;
use crate::quadtree::PatchKey;
use crate::stitching::{PackedCounts, StitchMode};

fn patch(x: u32, y: u32, level: u32) -> Patch {
  Patch {
    key: PatchKey::new(x, y, level),
    counts: PackedCounts::uniform(8),
    parent_counts: PackedCounts::uniform(4),
    mode: StitchMode::Binary,
  }
}

// =========================================================================
// Batch 1: Append Tests
// =========================================================================

#[test]
fn test_push_into_bucket() {
  let output = OutputPartition::new(3, 4);
  assert_eq!(output.push(1, &patch(0, 0, 1)), Ok(0));
  assert_eq!(output.push(1, &patch(1, 0, 1)), Ok(1));
  assert_eq!(output.push(2, &patch(0, 0, 2)), Ok(0));

  assert_eq!(output.bucket_len(0), 0);
  assert_eq!(output.bucket_len(1), 2);
  assert_eq!(output.bucket_len(2), 1);
  assert_eq!(output.len(), 3);
  assert_eq!(output.bucket(2).collect::<Vec<_>>(), vec![patch(0, 0, 2)]);
}

/// Out-of-range buckets are rejected, never aliased into bucket 0.
#[test]
fn test_out_of_range_bucket_is_rejected() {
  let output = OutputPartition::new(4, 4);
  assert_eq!(
    output.push(4, &patch(0, 0, 0)),
    Err(OutputError::BucketOutOfRange {
      bucket: 4,
      bucket_count: 4
    })
  );
  assert!(output.is_empty());
  assert_eq!(output.bucket_len(4), 0);
  assert_eq!(output.bucket(4).count(), 0);
}

#[test]
fn test_full_bucket_is_rejected() {
  let output = OutputPartition::new(1, 1);
  assert!(output.push(0, &patch(0, 0, 0)).is_ok());
  assert_eq!(
    output.push(0, &patch(1, 0, 0)),
    Err(OutputError::BucketFull {
      bucket: 0,
      capacity: 1
    })
  );
  assert_eq!(output.overflowed(), 1);
  assert_eq!(output.len(), 1);
}

/// Each bucket fills against its own capacity.
#[test]
fn test_buckets_have_own_capacity() {
  let output = OutputPartition::with_capacities([4, 1]);
  assert_eq!(output.allocated_buckets(), 2);
  assert_eq!(output.bucket_capacity(0), 4);
  assert_eq!(output.bucket_capacity(1), 1);
  assert_eq!(output.bucket_capacity(2), 0);

  assert!(output.push(1, &patch(0, 0, 1)).is_ok());
  assert_eq!(
    output.push(1, &patch(1, 0, 1)),
    Err(OutputError::BucketFull {
      bucket: 1,
      capacity: 1
    })
  );
  for x in 0..4 {
    assert_eq!(output.push(0, &patch(x, 0, 0)), Ok(x as usize));
  }
  assert_eq!(output.overflowed(), 1);
}

/// Parallel appends across buckets lose nothing.
#[test]
fn test_parallel_push() {
  let output = OutputPartition::new(4, 1024);
  (0..4096u32).into_par_iter().for_each(|i| {
    let bucket = (i % 4) as usize;
    assert!(output.push(bucket, &patch(i, 0, 0)).is_ok());
  });

  for bucket in 0..4 {
    assert_eq!(output.bucket_len(bucket), 1024);
  }
  let mut xs: Vec<u32> = output.patches().map(|p| p.key.x).collect();
  xs.sort_unstable();
  assert_eq!(xs, (0..4096).collect::<Vec<_>>());
}

// =========================================================================
// Batch 2: Reset Tests
// =========================================================================

#[test]
fn test_reset_clears_and_activates() {
  let mut output = OutputPartition::new(5, 4);
  output.push(4, &patch(0, 0, 0)).expect("bucket 4 active");

  output.reset(2).expect("2 <= 5 allocated");
  assert_eq!(output.bucket_count(), 2);
  assert!(output.is_empty());
  assert!(matches!(
    output.push(4, &patch(0, 0, 0)),
    Err(OutputError::BucketOutOfRange { .. })
  ));
}

#[test]
fn test_reset_beyond_allocation_fails() {
  let mut output = OutputPartition::new(2, 4);
  assert!(matches!(
    output.reset(3),
    Err(ConfigError::InsufficientCapacity { .. })
  ));
}

// =========================================================================
// Batch 3: Draw Batch Tests
// =========================================================================

#[test]
fn test_draw_batches_skip_empty_buckets() {
  let output = OutputPartition::new(3, 8);
  for i in 0..3 {
    output.push(0, &patch(i, 0, 0)).expect("room");
  }
  output.push(2, &patch(0, 0, 2)).expect("room");

  let batches = output.draw_batches(|bucket| (4 << bucket) * (4 << bucket) * 6);
  assert_eq!(
    batches,
    vec![
      DrawBatch {
        bucket: 0,
        instance_count: 3,
        vertices_per_patch: 96
      },
      DrawBatch {
        bucket: 2,
        instance_count: 1,
        vertices_per_patch: 1536
      },
    ]
  );
  assert_eq!(batches[0].vertex_count(), 288);
}

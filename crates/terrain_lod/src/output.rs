//! LOD-bucketed output lists.
//!
//! One fixed-capacity append buffer per bucket, each with its own atomic
//! cursor. Buckets are allocated once; each generation activates as many as
//! its stitch mode needs and clears them.
//!
//! ```text
//!   bucket 0  [p p p p · · · ·]
//!   bucket 1  [p p · · · · · ·]
//!   bucket 2  [p p p p p p · ·]
//!   ...                          one DrawBatch per non-empty bucket
//! ```

use crate::error::{ConfigError, OutputError};
use crate::patch::Patch;
use crate::quadtree::AppendBuffer;

/// Instanced draw summary for one bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawBatch {
  pub bucket: usize,
  pub instance_count: u32,
  pub vertices_per_patch: u32,
}

impl DrawBatch {
  /// Total vertices submitted by the batch.
  #[inline]
  pub fn vertex_count(&self) -> u64 {
    self.instance_count as u64 * self.vertices_per_patch as u64
  }
}

/// Disjoint fixed-capacity patch buckets.
pub struct OutputPartition {
  buckets: Vec<AppendBuffer<2>>,
  active: usize,
}

impl OutputPartition {
  /// Allocate `bucket_count` buckets of `bucket_capacity` patches each, all
  /// active.
  pub fn new(bucket_count: usize, bucket_capacity: usize) -> Self {
    Self::with_capacities((0..bucket_count).map(|_| bucket_capacity))
  }

  /// Allocate one bucket per entry, sized by that entry, all active.
  pub fn with_capacities(capacities: impl IntoIterator<Item = usize>) -> Self {
    let buckets: Vec<_> = capacities
      .into_iter()
      .map(AppendBuffer::with_capacity)
      .collect();
    let active = buckets.len();
    Self { buckets, active }
  }

  /// Buckets allocated at setup.
  #[inline]
  pub fn allocated_buckets(&self) -> usize {
    self.buckets.len()
  }

  /// Room in `bucket`, 0 when not allocated.
  #[inline]
  pub fn bucket_capacity(&self, bucket: usize) -> usize {
    self.buckets.get(bucket).map_or(0, |b| b.capacity())
  }

  /// Clear every bucket and activate the first `active`.
  pub fn reset(&mut self, active: usize) -> Result<(), ConfigError> {
    if active > self.buckets.len() {
      return Err(ConfigError::InsufficientCapacity {
        buffer: "bucket table",
        provided: self.buckets.len(),
        required: active,
      });
    }
    for bucket in &mut self.buckets {
      bucket.clear();
    }
    self.active = active;
    Ok(())
  }

  /// Active buckets.
  #[inline]
  pub fn bucket_count(&self) -> usize {
    self.active
  }

  /// Append a patch to `bucket`. Safe to call from parallel tasks.
  pub fn push(&self, bucket: usize, patch: &Patch) -> Result<usize, OutputError> {
    let buffer = self
      .active_buckets()
      .get(bucket)
      .ok_or(OutputError::BucketOutOfRange {
        bucket,
        bucket_count: self.active,
      })?;
    buffer.push(patch.encode()).ok_or(OutputError::BucketFull {
      bucket,
      capacity: buffer.capacity(),
    })
  }

  #[inline]
  fn active_buckets(&self) -> &[AppendBuffer<2>] {
    &self.buckets[..self.active]
  }

  /// Patches stored in `bucket`, 0 when out of range.
  pub fn bucket_len(&self, bucket: usize) -> usize {
    self.active_buckets().get(bucket).map_or(0, |b| b.len())
  }

  /// Patches in `bucket`, in unspecified order.
  pub fn bucket(&self, bucket: usize) -> impl Iterator<Item = Patch> + '_ {
    self
      .active_buckets()
      .get(bucket)
      .into_iter()
      .flat_map(|buffer| buffer.iter())
      .filter_map(Patch::decode)
  }

  /// All patches, bucket by bucket.
  pub fn patches(&self) -> impl Iterator<Item = Patch> + '_ {
    (0..self.active).flat_map(move |bucket| self.bucket(bucket))
  }

  pub fn len(&self) -> usize {
    self.active_buckets().iter().map(|b| b.len()).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Appends refused for lack of room since the last reset.
  pub fn overflowed(&self) -> usize {
    self.active_buckets().iter().map(|b| b.overflowed()).sum()
  }

  /// One batch per non-empty bucket.
  pub fn draw_batches(&self, vertices_per_patch: impl Fn(usize) -> u32) -> Vec<DrawBatch> {
    self
      .active_buckets()
      .iter()
      .enumerate()
      .filter(|(_, buffer)| !buffer.is_empty())
      .map(|(bucket, buffer)| DrawBatch {
        bucket,
        instance_count: u32::try_from(buffer.len()).unwrap_or(u32::MAX),
        vertices_per_patch: vertices_per_patch(bucket),
      })
      .collect()
  }
}

#[cfg(test)]
#[path = "output_test.rs"]
mod output_test;

//! Error types for setup validation and output appends.

/// Rejected configuration or capacity plan.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
  #[error("insufficient {buffer} capacity: {provided} provided, {required} required")]
  InsufficientCapacity {
    buffer: &'static str,
    provided: usize,
    required: usize,
  },

  #[error("grid too large: {patch_count} roots at refinement {refinement_count} exceed addressable range")]
  GridTooLarge {
    patch_count: u32,
    refinement_count: u32,
  },

  #[error("invalid parameter {name}: {reason}")]
  InvalidParameter {
    name: &'static str,
    reason: String,
  },
}

impl ConfigError {
  pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
    Self::InvalidParameter {
      name,
      reason: reason.into(),
    }
  }
}

/// Refused append into the output partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OutputError {
  #[error("bucket {bucket} out of range (bucket count {bucket_count})")]
  BucketOutOfRange { bucket: usize, bucket_count: usize },

  #[error("bucket {bucket} full (capacity {capacity})")]
  BucketFull { bucket: usize, capacity: usize },
}

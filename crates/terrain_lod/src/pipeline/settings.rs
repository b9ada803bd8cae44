//! Tessellator settings and the capacity plan.

use crate::constants::{DEFAULT_BINARY_COUNT, MAX_COUNT, VERTICES_PER_CELL};
use crate::error::ConfigError;
use crate::quadtree::ViewConfig;
use crate::stitching::{density_count, DensityEstimator, StitchMode};

/// Per-tessellator settings, fixed for its lifetime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TessellationSettings {
  /// Stitching strategy. Never mixed within a pass.
  pub stitch_mode: StitchMode,
  /// Density map (density mode).
  pub density: DensityEstimator,
  /// Full edge count (binary mode). Power of two in [2, 63].
  pub binary_count: u32,
  /// Drop children outside the view frustum. Off by default.
  pub frustum_culling: bool,
  /// Height range a patch is assumed to span, for frustum tests.
  pub min_height: f32,
  pub max_height: f32,
}

impl TessellationSettings {
  /// Density stitching, no frustum culling.
  pub const DEFAULT: Self = Self {
    stitch_mode: StitchMode::Density,
    density: DensityEstimator::DEFAULT,
    binary_count: DEFAULT_BINARY_COUNT,
    frustum_culling: false,
    min_height: 0.0,
    max_height: 512.0,
  };

  /// Binary (depth) stitching, no frustum culling.
  pub const BINARY: Self = Self {
    stitch_mode: StitchMode::Binary,
    ..Self::DEFAULT
  };

  pub fn with_stitch_mode(mut self, stitch_mode: StitchMode) -> Self {
    self.stitch_mode = stitch_mode;
    self
  }

  pub fn with_density(mut self, density: DensityEstimator) -> Self {
    self.density = density;
    self
  }

  pub fn with_binary_count(mut self, binary_count: u32) -> Self {
    self.binary_count = binary_count;
    self
  }

  pub fn with_frustum_culling(mut self, enabled: bool) -> Self {
    self.frustum_culling = enabled;
    self
  }

  pub fn with_height_range(mut self, min_height: f32, max_height: f32) -> Self {
    self.min_height = min_height;
    self.max_height = max_height;
    self
  }

  /// Validate the parameters used by the selected mode.
  pub fn validate(&self) -> Result<(), ConfigError> {
    match self.stitch_mode {
      StitchMode::Density => self.density.validate()?,
      StitchMode::Binary => {
        if !self.binary_count.is_power_of_two() || !(2..=MAX_COUNT).contains(&self.binary_count) {
          return Err(ConfigError::invalid(
            "binary_count",
            format!("must be a power of two in [2, 63], got {}", self.binary_count),
          ));
        }
      }
    }
    if self.frustum_culling
      && !(self.min_height.is_finite()
        && self.max_height.is_finite()
        && self.min_height <= self.max_height)
    {
      return Err(ConfigError::invalid(
        "height_range",
        format!("invalid range [{}, {}]", self.min_height, self.max_height),
      ));
    }
    Ok(())
  }

  /// Buckets needed for `view`: density levels, or one per depth level.
  pub fn bucket_count(&self, view: &ViewConfig) -> usize {
    match self.stitch_mode {
      StitchMode::Density => self.density.levels as usize,
      StitchMode::Binary => view.refinement_count as usize + 1,
    }
  }

  /// Interior tessellation count of patches in `bucket`.
  pub fn bucket_tessellation(&self, bucket: usize) -> u32 {
    match self.stitch_mode {
      StitchMode::Density => density_count(u32::try_from(bucket).unwrap_or(u32::MAX)),
      StitchMode::Binary => self.binary_count,
    }
  }

  /// Vertices per patch in `bucket`: count² cells, six vertices each.
  pub fn vertices_per_patch(&self, bucket: usize) -> u32 {
    let count = self.bucket_tessellation(bucket);
    count * count * VERTICES_PER_CELL
  }
}

impl Default for TessellationSettings {
  fn default() -> Self {
    Self::DEFAULT
  }
}

/// Buffer sizes provisioned at setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capacity {
  /// Keys per work queue buffer.
  pub queue: usize,
  /// Patches in the largest output bucket. Binary buckets shrink by four
  /// per level (see [`Capacity::bucket_capacity`]).
  pub bucket: usize,
  /// Output buckets.
  pub buckets: usize,
}

impl Capacity {
  /// Capacity that no generation for `view` can exceed.
  pub fn worst_case(view: &ViewConfig, settings: &TessellationSettings) -> Result<Self, ConfigError> {
    view.validate()?;
    settings.validate()?;
    let patches = worst_case_patches(view)?;
    Ok(Self {
      queue: patches,
      bucket: patches,
      buckets: settings.bucket_count(view),
    })
  }

  /// Patches `bucket` can hold.
  ///
  /// Density buckets may receive patches of any level. Binary bucket `l`
  /// only holds level-`l` patches, a quarter of the level below.
  pub fn bucket_capacity(&self, bucket: usize, stitch_mode: StitchMode) -> usize {
    match stitch_mode {
      StitchMode::Density => self.bucket,
      StitchMode::Binary => u32::try_from(bucket.saturating_mul(2))
        .ok()
        .and_then(|shift| self.bucket.checked_shr(shift))
        .unwrap_or(0),
    }
  }

  /// Check this capacity against the worst case for `view`.
  pub fn check(&self, view: &ViewConfig, settings: &TessellationSettings) -> Result<(), ConfigError> {
    let required = Self::worst_case(view, settings)?;
    let checks = [
      ("queue", self.queue, required.queue),
      ("bucket", self.bucket, required.bucket),
      ("bucket table", self.buckets, required.buckets),
    ];
    for (buffer, provided, required) in checks {
      if provided < required {
        return Err(ConfigError::InsufficientCapacity {
          buffer,
          provided,
          required,
        });
      }
    }
    Ok(())
  }
}

/// patch_count² · 4^refinement_count
fn worst_case_patches(view: &ViewConfig) -> Result<usize, ConfigError> {
  let extent = view.grid_extent();
  extent
    .checked_mul(extent)
    .and_then(|patches| usize::try_from(patches).ok())
    .ok_or(ConfigError::GridTooLarge {
      patch_count: view.patch_count,
      refinement_count: view.refinement_count,
    })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_settings() {
    let settings = TessellationSettings::default();
    assert_eq!(settings.stitch_mode, StitchMode::Density);
    assert_eq!(settings.binary_count, 8);
    assert!(!settings.frustum_culling);
    assert!(settings.validate().is_ok());
  }

  #[test]
  fn test_binary_preset() {
    let settings = TessellationSettings::BINARY;
    assert_eq!(settings.stitch_mode, StitchMode::Binary);
    assert!(settings.validate().is_ok());
  }

  #[test]
  fn test_binary_count_validation() {
    for bad in [0, 1, 3, 12, 64, 128] {
      let settings = TessellationSettings::BINARY.with_binary_count(bad);
      assert!(
        matches!(settings.validate(), Err(ConfigError::InvalidParameter { .. })),
        "binary_count {} should be rejected",
        bad
      );
    }
    for good in [2, 4, 8, 16, 32] {
      assert!(TessellationSettings::BINARY.with_binary_count(good).validate().is_ok());
    }
  }

  #[test]
  fn test_density_levels_validation() {
    let settings =
      TessellationSettings::DEFAULT.with_density(DensityEstimator::DEFAULT.with_levels(0));
    assert!(matches!(
      settings.validate(),
      Err(ConfigError::InvalidParameter { .. })
    ));
  }

  #[test]
  fn test_height_range_validation() {
    let settings = TessellationSettings::DEFAULT
      .with_frustum_culling(true)
      .with_height_range(10.0, -10.0);
    assert!(settings.validate().is_err());
    assert!(settings.with_frustum_culling(false).validate().is_ok());
  }

  #[test]
  fn test_bucket_count_per_mode() {
    let view = ViewConfig::default().with_refinement_count(6);
    assert_eq!(TessellationSettings::DEFAULT.bucket_count(&view), 4);
    assert_eq!(TessellationSettings::BINARY.bucket_count(&view), 7);
  }

  #[test]
  fn test_vertices_per_patch() {
    let density = TessellationSettings::DEFAULT;
    assert_eq!(density.vertices_per_patch(0), 4 * 4 * 6);
    assert_eq!(density.vertices_per_patch(3), 32 * 32 * 6);

    let binary = TessellationSettings::BINARY.with_binary_count(16);
    assert_eq!(binary.vertices_per_patch(0), 16 * 16 * 6);
    assert_eq!(binary.vertices_per_patch(5), 16 * 16 * 6);
  }

  /// 8 roots at depth 4: 128² finest cells.
  #[test]
  fn test_worst_case_capacity() {
    let view = ViewConfig::default();
    let capacity = Capacity::worst_case(&view, &TessellationSettings::DEFAULT).expect("valid view");
    assert_eq!(capacity.queue, 128 * 128);
    assert_eq!(capacity.bucket, 128 * 128);
    assert_eq!(capacity.buckets, 4);
    assert!(capacity.check(&view, &TessellationSettings::DEFAULT).is_ok());
  }

  #[test]
  fn test_check_rejects_small_capacity() {
    let view = ViewConfig::default();
    let settings = TessellationSettings::DEFAULT;
    let capacity = Capacity {
      queue: 100,
      bucket: 1 << 20,
      buckets: 4,
    };
    assert_eq!(
      capacity.check(&view, &settings),
      Err(ConfigError::InsufficientCapacity {
        buffer: "queue",
        provided: 100,
        required: 128 * 128,
      })
    );

    let capacity = Capacity {
      queue: 1 << 20,
      bucket: 1 << 20,
      buckets: 3,
    };
    assert!(matches!(
      capacity.check(&view, &settings),
      Err(ConfigError::InsufficientCapacity {
        buffer: "bucket table",
        ..
      })
    ));
  }

  /// A capacity planned for a deep view covers shallower ones.
  #[test]
  fn test_capacity_covers_shallower_views() {
    let deep = ViewConfig::default().with_refinement_count(6);
    let capacity = Capacity::worst_case(&deep, &TessellationSettings::BINARY).expect("valid");
    let shallow = deep.with_refinement_count(3);
    assert!(capacity.check(&shallow, &TessellationSettings::BINARY).is_ok());
    assert!(capacity.check(&deep.with_refinement_count(7), &TessellationSettings::BINARY).is_err());
  }

  /// Binary bucket `l` is sized for the level-`l` cells only.
  #[test]
  fn test_binary_bucket_capacity_per_level() {
    let view = ViewConfig::default().with_patch_count(3).with_refinement_count(4);
    let capacity = Capacity::worst_case(&view, &TessellationSettings::BINARY).expect("valid");
    for level in 0..=4 {
      let cells = view.cells_at_level(level) as usize;
      assert_eq!(
        capacity.bucket_capacity(level as usize, StitchMode::Binary),
        cells * cells
      );
    }
    let total: usize = (0..capacity.buckets)
      .map(|bucket| capacity.bucket_capacity(bucket, StitchMode::Binary))
      .sum();
    assert!(total < 2 * capacity.bucket, "Binary buckets sum to {}", total);
    assert_eq!(capacity.bucket_capacity(70, StitchMode::Binary), 0);
  }

  #[test]
  fn test_density_bucket_capacity_is_uniform() {
    let view = ViewConfig::default();
    let capacity = Capacity::worst_case(&view, &TessellationSettings::DEFAULT).expect("valid");
    for bucket in 0..capacity.buckets {
      assert_eq!(capacity.bucket_capacity(bucket, StitchMode::Density), 128 * 128);
    }
  }
}

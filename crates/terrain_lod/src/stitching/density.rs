//! Procedural density estimator.
//!
//! Maps a patch to a density level in `[0, levels)` by sampling 2D value
//! noise at the patch's world centre. The noise is a hashed integer lattice
//! with smoothstep interpolation, so the map is pure: the same key, view and
//! seed always give the same level.
//!
//! # Resolved Density
//!
//! A child is never more than one level coarser than its parent:
//!
//! ```text
//! resolved(root)  = estimate(root)
//! resolved(cell)  = max(estimate(cell), resolved(parent) - 1)
//! ```
//!
//! Each level doubles the count, so a child spanning half of its parent's
//! edge always has at least half the parent's count.

use crate::constants::{
  DEFAULT_DENSITY_LEVELS, DEFAULT_DENSITY_WAVELENGTH, DENSITY_BASE_COUNT, MAX_DENSITY_COUNT,
};
use crate::error::ConfigError;
use crate::quadtree::{PatchKey, ViewConfig};

/// Tessellation count for a density level.
///
/// count = min(DENSITY_BASE_COUNT << level, MAX_DENSITY_COUNT)
///
/// Levels past the cap keep their own bucket but share the capped count.
#[inline]
pub fn density_count(level: u32) -> u32 {
  1u32
    .checked_shl(level)
    .and_then(|scale| scale.checked_mul(DENSITY_BASE_COUNT))
    .map_or(MAX_DENSITY_COUNT, |count| count.min(MAX_DENSITY_COUNT))
}

/// Deterministic density map over the terrain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DensityEstimator {
  /// Number of density levels (and density-mode buckets).
  pub levels: u32,
  /// World distance between noise lattice points.
  pub wavelength: f32,
  pub seed: u32,
}

impl DensityEstimator {
  pub const DEFAULT: Self = Self {
    levels: DEFAULT_DENSITY_LEVELS,
    wavelength: DEFAULT_DENSITY_WAVELENGTH,
    seed: 0,
  };

  pub fn with_levels(mut self, levels: u32) -> Self {
    self.levels = levels;
    self
  }

  pub fn with_wavelength(mut self, wavelength: f32) -> Self {
    self.wavelength = wavelength;
    self
  }

  pub fn with_seed(mut self, seed: u32) -> Self {
    self.seed = seed;
    self
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.levels == 0 {
      return Err(ConfigError::invalid("density_levels", "must be at least 1"));
    }
    if !(self.wavelength.is_finite() && self.wavelength > 0.0) {
      return Err(ConfigError::invalid(
        "density_wavelength",
        format!("must be finite and positive, got {}", self.wavelength),
      ));
    }
    Ok(())
  }

  /// Raw density level of a single cell.
  pub fn estimate(&self, key: &PatchKey, view: &ViewConfig) -> u32 {
    let levels = self.levels.max(1);
    let center = view.patch_center(key);
    let noise = value_noise_2d(
      center.x as f64 / self.wavelength as f64,
      center.y as f64 / self.wavelength as f64,
      self.seed,
    );
    let t = ((noise + 1.0) * 0.5).clamp(0.0, 1.0);
    ((t * levels as f64) as u32).min(levels - 1)
  }

  /// Density level after enforcing the one-level step from every ancestor.
  ///
  /// Walks from the root covering `key` down to `key`. Keys above the root
  /// level resolve to their own estimate.
  pub fn resolve(&self, key: &PatchKey, view: &ViewConfig) -> u32 {
    let root_level = view.root_level().max(key.level);
    let mut resolved = 0;
    for level in (key.level..=root_level).rev() {
      let Some(cell) = key.ancestor(level) else {
        continue;
      };
      let estimate = self.estimate(&cell, view);
      resolved = if level == root_level {
        estimate
      } else {
        estimate.max(resolved.saturating_sub(1))
      };
    }
    resolved
  }
}

impl Default for DensityEstimator {
  fn default() -> Self {
    Self::DEFAULT
  }
}

// =============================================================================
// Hash-based value noise
// =============================================================================

/// 2D value noise returning [-1, 1].
fn value_noise_2d(x: f64, y: f64, seed: u32) -> f64 {
  let ix = x.floor() as i32;
  let iy = y.floor() as i32;

  let ux = smoothstep(x - x.floor());
  let uy = smoothstep(y - y.floor());

  let c00 = hash_to_float(hash_2d(ix, iy, seed));
  let c10 = hash_to_float(hash_2d(ix.wrapping_add(1), iy, seed));
  let c01 = hash_to_float(hash_2d(ix, iy.wrapping_add(1), seed));
  let c11 = hash_to_float(hash_2d(ix.wrapping_add(1), iy.wrapping_add(1), seed));

  let x0 = lerp(c00, c10, ux);
  let x1 = lerp(c01, c11, ux);
  lerp(x0, x1, uy)
}

#[inline]
fn smoothstep(t: f64) -> f64 {
  t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
  a + (b - a) * t
}

/// Hash 2D integer coordinates to u32.
#[inline]
fn hash_2d(x: i32, y: i32, seed: u32) -> u32 {
  let mut h = seed;
  h ^= x as u32;
  h = h.wrapping_mul(0x85ebca6b);
  h ^= y as u32;
  h = h.wrapping_mul(0xc2b2ae35);
  h ^= h >> 16;
  h = h.wrapping_mul(0x27d4eb2d);
  h ^= h >> 15;
  h
}

/// Convert hash to float in [-1, 1].
#[inline]
fn hash_to_float(h: u32) -> f64 {
  (h as f64 / u32::MAX as f64) * 2.0 - 1.0
}

#[cfg(test)]
#[path = "density_test.rs"]
mod density_test;

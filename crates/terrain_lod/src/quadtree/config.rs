//! ViewConfig - per-camera subdivision parameters and world coordinate
//! mapping.
//!
//! World space is Y-up; the terrain lies in the XZ plane. Base grid cell
//! `(gx, gy)` maps to world `(gx · patch_scale, _, gy · patch_scale)`.

use glam::{Vec2, Vec3};

use super::{Aabb2, PatchKey};
use crate::constants::{DIVIDE_SAFETY_FACTOR, MAX_GRID_EXTENT};
use crate::error::ConfigError;

/// Per-camera subdivision parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewConfig {
  /// World units per base grid cell.
  pub patch_scale: f32,

  /// Divide radius multiplier.
  /// threshold = patch_world_size / 2 * view_distance * DIVIDE_SAFETY_FACTOR
  pub view_distance: f32,

  /// Maximum subdivision depth. Roots have size 2^refinement_count.
  pub refinement_count: u32,

  /// Roots per axis.
  pub patch_count: u32,

  /// World extent of the terrain square `[0, terrain_size]²`.
  pub terrain_size: f32,

  /// Height at which patch corners are measured.
  pub height_under_viewer: f32,
}

impl ViewConfig {
  pub fn with_patch_scale(mut self, patch_scale: f32) -> Self {
    self.patch_scale = patch_scale;
    self
  }

  pub fn with_view_distance(mut self, view_distance: f32) -> Self {
    self.view_distance = view_distance;
    self
  }

  pub fn with_refinement_count(mut self, refinement_count: u32) -> Self {
    self.refinement_count = refinement_count;
    self
  }

  pub fn with_patch_count(mut self, patch_count: u32) -> Self {
    self.patch_count = patch_count;
    self
  }

  pub fn with_terrain_size(mut self, terrain_size: f32) -> Self {
    self.terrain_size = terrain_size;
    self
  }

  pub fn with_height_under_viewer(mut self, height: f32) -> Self {
    self.height_under_viewer = height;
    self
  }

  /// Terrain size matching the root grid exactly.
  pub fn with_fitted_terrain(mut self) -> Self {
    self.terrain_size = self.grid_extent() as f32 * self.patch_scale;
    self
  }

  /// Validate parameters and address range.
  pub fn validate(&self) -> Result<(), ConfigError> {
    check_positive("patch_scale", self.patch_scale)?;
    check_positive("view_distance", self.view_distance)?;
    check_positive("terrain_size", self.terrain_size)?;
    if !self.height_under_viewer.is_finite() {
      return Err(ConfigError::invalid("height_under_viewer", "must be finite"));
    }

    let too_large = ConfigError::GridTooLarge {
      patch_count: self.patch_count,
      refinement_count: self.refinement_count,
    };
    let root_size = 1u64
      .checked_shl(self.refinement_count)
      .filter(|&size| size <= MAX_GRID_EXTENT)
      .ok_or_else(|| too_large.clone())?;
    match (self.patch_count as u64).checked_mul(root_size) {
      Some(extent) if extent <= MAX_GRID_EXTENT => Ok(()),
      _ => Err(too_large),
    }
  }

  /// Level of the root patches.
  #[inline]
  pub fn root_level(&self) -> u32 {
    self.refinement_count
  }

  /// Finest-level cells per axis covered by the root grid.
  #[inline]
  pub fn grid_extent(&self) -> u64 {
    (self.patch_count as u64) << self.refinement_count
  }

  /// Cells per axis at `level`.
  #[inline]
  pub fn cells_at_level(&self, level: u32) -> u64 {
    match self.refinement_count.checked_sub(level) {
      Some(shift) => (self.patch_count as u64) << shift,
      None => 0,
    }
  }

  /// Check if the key addresses a cell inside the root grid.
  #[inline]
  pub fn contains_key(&self, key: &PatchKey) -> bool {
    let cells = self.cells_at_level(key.level);
    (key.x as u64) < cells && (key.y as u64) < cells
  }

  /// World edge length of a patch at `level`.
  /// patch_world_size = 2^level * patch_scale
  #[inline]
  pub fn patch_world_size(&self, level: u32) -> f32 {
    (1u64 << level) as f32 * self.patch_scale
  }

  /// Divide radius for a patch at `level`.
  #[inline]
  pub fn divide_threshold(&self, level: u32) -> f32 {
    self.patch_world_size(level) * 0.5 * self.view_distance * DIVIDE_SAFETY_FACTOR
  }

  /// World XZ minimum corner of a patch.
  #[inline]
  pub fn patch_min(&self, key: &PatchKey) -> Vec2 {
    let (gx, gy) = key.base_min();
    Vec2::new(gx as f32, gy as f32) * self.patch_scale
  }

  /// World XZ center of a patch.
  #[inline]
  pub fn patch_center(&self, key: &PatchKey) -> Vec2 {
    self.patch_min(key) + Vec2::splat(self.patch_world_size(key.level) * 0.5)
  }

  /// World XZ footprint of a patch.
  #[inline]
  pub fn patch_footprint(&self, key: &PatchKey) -> Aabb2 {
    Aabb2::from_min_size(
      self.patch_min(key),
      Vec2::splat(self.patch_world_size(key.level)),
    )
  }

  /// Corner world positions at `height_under_viewer`, in the order
  /// (min, min), (max, min), (max, max), (min, max).
  pub fn patch_corners(&self, key: &PatchKey) -> [Vec3; 4] {
    let footprint = self.patch_footprint(key);
    let h = self.height_under_viewer;
    let (lo, hi) = (footprint.min, footprint.max);
    [
      Vec3::new(lo.x, h, lo.y),
      Vec3::new(hi.x, h, lo.y),
      Vec3::new(hi.x, h, hi.y),
      Vec3::new(lo.x, h, hi.y),
    ]
  }

  /// Patch footprint extruded over `[min_height, max_height]`.
  pub fn patch_aabb(&self, key: &PatchKey, min_height: f32, max_height: f32) -> (Vec3, Vec3) {
    let footprint = self.patch_footprint(key);
    (
      Vec3::new(footprint.min.x, min_height, footprint.min.y),
      Vec3::new(footprint.max.x, max_height, footprint.max.y),
    )
  }

  /// Terrain footprint `[0, terrain_size]²`.
  #[inline]
  pub fn terrain_bounds(&self) -> Aabb2 {
    Aabb2::new(Vec2::ZERO, Vec2::splat(self.terrain_size))
  }
}

fn check_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
  if value.is_finite() && value > 0.0 {
    Ok(())
  } else {
    Err(ConfigError::invalid(
      name,
      format!("must be finite and positive, got {}", value),
    ))
  }
}

impl Default for ViewConfig {
  fn default() -> Self {
    Self {
      patch_scale: 1.0,
      view_distance: 4.0,
      refinement_count: 4,
      patch_count: 8,
      terrain_size: 128.0,
      height_under_viewer: 0.0,
    }
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

//! Divide predicate and child culling.
//!
//! A patch divides when the viewer is closer to any of its four corners than
//! half its world size times `view_distance`. The test is purely geometric:
//! identical inputs always give the same answer, with no frame history.
//!
//! ```text
//!        corner ●───────────● corner
//!               │           │
//!               │     ·     │   divide if any |corner - viewer|
//!               │           │     < size/2 · view_distance · 0.99
//!        corner ●───────────● corner
//! ```

use glam::Vec3;
use smallvec::SmallVec;

use super::{PatchKey, ViewConfig};

/// Check if a patch should divide for a viewer at `viewer`.
///
/// Level 0 patches never divide.
#[inline]
pub fn should_divide(key: &PatchKey, view: &ViewConfig, viewer: Vec3) -> bool {
  if key.level == 0 {
    return false;
  }
  let threshold = view.divide_threshold(key.level);
  view
    .patch_corners(key)
    .iter()
    .any(|corner| corner.distance(viewer) < threshold)
}

/// Check if a patch footprint lies entirely outside the terrain.
#[inline]
pub fn is_off_terrain(key: &PatchKey, view: &ViewConfig) -> bool {
  !view.terrain_bounds().overlaps(&view.patch_footprint(key))
}

/// Children of a dividing patch, split into survivors and a culled count.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Subdivision {
  pub children: SmallVec<[PatchKey; 4]>,
  pub culled: usize,
}

/// Subdivide a patch, dropping children whose footprint lies entirely
/// outside the terrain.
pub fn subdivide(parent: &PatchKey, view: &ViewConfig) -> Subdivision {
  let mut subdivision = Subdivision::default();
  for child in parent.children() {
    if is_off_terrain(&child, view) {
      subdivision.culled += 1;
    } else {
      subdivision.children.push(child);
    }
  }
  subdivision
}

#[cfg(test)]
#[path = "divide_test.rs"]
mod divide_test;

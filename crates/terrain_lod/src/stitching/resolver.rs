//! Edge-count resolvers.
//!
//! Both resolvers are pure functions of the key, the view and the viewer:
//! neighbours are recomputed, never looked up in the generated output.
//!
//! # Density Mode
//!
//! ```text
//!   edge(e)   = min(count(resolved(self)), count(resolved(neighbour(e))))
//!   interior  = count(resolved(self))
//!   parent    = same rule on the parent cell, halved
//! ```
//!
//! Same-size neighbours compute the same minimum. A fine patch next to a
//! coarse one morphs toward `parent_counts`, which is the coarse patch's own
//! edge count spread over half the length.
//!
//! # Binary Mode
//!
//! ```text
//!   edge(e)   = C      if root or neighbour off-grid
//!             = C      if divides(parent(neighbour(e)))
//!             = C / 2  otherwise
//! ```
//!
//! If the neighbour cell's parent did not divide, the real neighbour is that
//! coarser parent, whose edge spacing is twice ours: halving our count
//! matches its vertices.

use glam::Vec3;

use super::{density_count, DensityEstimator, PackedCounts};
use crate::quadtree::{should_divide, Edge, PatchKey, ViewConfig};

/// Counts computed for one terminal patch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedCounts {
  pub counts: PackedCounts,
  pub parent_counts: PackedCounts,
  /// Output bucket: resolved density (density mode) or level (binary mode).
  pub lod: u32,
}

/// Same-level neighbour across `edge`, if it lies inside the root grid.
#[inline]
fn grid_neighbor(key: &PatchKey, edge: Edge, view: &ViewConfig) -> Option<PatchKey> {
  key
    .neighbor(edge)
    .filter(|neighbor| view.contains_key(neighbor))
}

// =============================================================================
// Density mode
// =============================================================================

fn density_counts(
  key: &PatchKey,
  view: &ViewConfig,
  estimator: &DensityEstimator,
) -> (PackedCounts, u32) {
  let density = estimator.resolve(key, view);
  let own = density_count(density);
  let edges = Edge::ALL.map(|edge| match grid_neighbor(key, edge, view) {
    Some(neighbor) => own.min(density_count(estimator.resolve(&neighbor, view))),
    None => own,
  });
  (PackedCounts::new(edges, own), density)
}

/// Resolve counts from the procedural density map.
pub fn resolve_density(
  key: &PatchKey,
  view: &ViewConfig,
  estimator: &DensityEstimator,
) -> ResolvedCounts {
  let (counts, density) = density_counts(key, view, estimator);
  let parent_counts = match key.get_parent(view.root_level()) {
    Some(parent) => density_counts(&parent, view, estimator).0.halved(),
    None => counts,
  };
  ResolvedCounts {
    counts,
    parent_counts,
    lod: density,
  }
}

// =============================================================================
// Binary mode
// =============================================================================

fn binary_counts(key: &PatchKey, view: &ViewConfig, viewer: Vec3, count: u32) -> PackedCounts {
  let half = (count / 2).max(1);
  let root_level = view.root_level();
  let edges = Edge::ALL.map(|edge| {
    if key.level >= root_level {
      return count;
    }
    let Some(neighbor) = grid_neighbor(key, edge, view) else {
      return count;
    };
    match neighbor.get_parent(root_level) {
      Some(parent) if !should_divide(&parent, view, viewer) => half,
      _ => count,
    }
  });
  PackedCounts::new(edges, count)
}

/// Resolve counts from neighbour depth, with a fixed full count.
pub fn resolve_binary(
  key: &PatchKey,
  view: &ViewConfig,
  viewer: Vec3,
  count: u32,
) -> ResolvedCounts {
  let counts = binary_counts(key, view, viewer, count);
  let parent_counts = match key.get_parent(view.root_level()) {
    Some(parent) => binary_counts(&parent, view, viewer, count).halved(),
    None => counts,
  };
  ResolvedCounts {
    counts,
    parent_counts,
    lod: key.level,
  }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod resolver_test;

//! Five 6-bit tessellation counts packed into a `u32`.

use crate::constants::{COUNT_BITS, COUNT_MASK, INTERIOR_FIELD, MAX_COUNT, PACKED_FIELDS};
use crate::quadtree::Edge;

/// Clamp a count to the 6-bit field.
#[inline]
pub fn saturate(count: u32) -> u32 {
  count.min(MAX_COUNT)
}

/// Per-edge and interior tessellation counts of a patch.
///
/// Field order: bottom, right, top, left, interior.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedCounts(u32);

impl PackedCounts {
  /// Pack edge counts (in [`Edge::ALL`] order) and the interior count.
  /// Values above 63 saturate.
  pub fn new(edges: [u32; 4], interior: u32) -> Self {
    let mut bits = 0;
    for (field, count) in edges.into_iter().chain([interior]).enumerate() {
      bits |= saturate(count) << (field as u32 * COUNT_BITS);
    }
    Self(bits)
  }

  /// Same count on every field.
  pub fn uniform(count: u32) -> Self {
    Self::new([count; 4], count)
  }

  #[inline]
  pub fn from_bits(bits: u32) -> Self {
    Self(bits & ((1 << (COUNT_BITS * PACKED_FIELDS as u32)) - 1))
  }

  #[inline]
  pub fn bits(self) -> u32 {
    self.0
  }

  #[inline]
  fn field(self, field: usize) -> u32 {
    (self.0 >> (field as u32 * COUNT_BITS)) & COUNT_MASK
  }

  #[inline]
  pub fn edge(self, edge: Edge) -> u32 {
    self.field(edge.index())
  }

  #[inline]
  pub fn interior(self) -> u32 {
    self.field(INTERIOR_FIELD)
  }

  pub fn edges(self) -> [u32; 4] {
    Edge::ALL.map(|edge| self.edge(edge))
  }

  /// Replace one edge count.
  pub fn with_edge(self, edge: Edge, count: u32) -> Self {
    let shift = edge.index() as u32 * COUNT_BITS;
    Self((self.0 & !(COUNT_MASK << shift)) | (saturate(count) << shift))
  }

  /// Every field halved, never below 1.
  ///
  /// Counts of a parent patch seen from one of its children, which spans
  /// half of each parent edge.
  pub fn halved(self) -> Self {
    Self::new(
      self.edges().map(|count| (count / 2).max(1)),
      (self.interior() / 2).max(1),
    )
  }
}

impl std::fmt::Debug for PackedCounts {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let [bottom, right, top, left] = self.edges();
    f.debug_struct("PackedCounts")
      .field("bottom", &bottom)
      .field("right", &right)
      .field("top", &top)
      .field("left", &left)
      .field("interior", &self.interior())
      .finish()
  }
}

#[cfg(test)]
#[path = "counts_test.rs"]
mod counts_test;

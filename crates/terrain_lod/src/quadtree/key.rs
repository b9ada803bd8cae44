//! PatchKey - immutable value type representing a position in the quadtree.
//!
//! Keys are identified by their grid coordinates at their own level.
//! Level 0 = finest detail (size 1), higher level = coarser.
//!
//! ```text
//!   size = 2^level            base-grid footprint of (x, y, level):
//!
//!   level 2  ┌───────────┐    [x·size, (x+1)·size) × [y·size, (y+1)·size)
//!            │           │
//!   level 1  ├─────┬─────┤    children of (x, y, l):
//!            │ 2   │ 3   │      quadrant q → (2x + (q & 1), 2y + (q >> 1), l - 1)
//!   level 0  ├──┬──┼─────┤
//!            │0 │1 │     │
//!            └──┴──┴─────┘
//! ```

use glam::UVec2;
use smallvec::SmallVec;

use crate::constants::{KEY_COORD_BITS, KEY_LEVEL_BITS};

/// One of the four edges of a patch, in rotational order.
///
/// The discriminant is the field index used by
/// [`PackedCounts`](crate::stitching::PackedCounts).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Edge {
  /// -Y
  Bottom = 0,
  /// +X
  Right = 1,
  /// +Y
  Top = 2,
  /// -X
  Left = 3,
}

impl Edge {
  /// All edges in packing order.
  pub const ALL: [Edge; 4] = [Edge::Bottom, Edge::Right, Edge::Top, Edge::Left];

  /// Grid step towards the neighbour across this edge.
  #[inline]
  pub fn offset(self) -> (i64, i64) {
    match self {
      Edge::Bottom => (0, -1),
      Edge::Right => (1, 0),
      Edge::Top => (0, 1),
      Edge::Left => (-1, 0),
    }
  }

  /// The same edge seen from the neighbour.
  #[inline]
  pub fn opposite(self) -> Edge {
    match self {
      Edge::Bottom => Edge::Top,
      Edge::Right => Edge::Left,
      Edge::Top => Edge::Bottom,
      Edge::Left => Edge::Right,
    }
  }

  #[inline]
  pub fn index(self) -> usize {
    self as usize
  }
}

const COORD_MASK: u64 = (1 << KEY_COORD_BITS) - 1;
const LEVEL_MASK: u64 = (1 << KEY_LEVEL_BITS) - 1;

/// Quadtree key - immutable value type.
///
/// Grid coordinates are at the key's own level, not the finest level.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct PatchKey {
  /// Grid X position at this key's level
  pub x: u32,
  /// Grid Y position at this key's level
  pub y: u32,
  /// Level of detail (0 = finest, higher = coarser)
  pub level: u32,
}

impl PatchKey {
  pub fn new(x: u32, y: u32, level: u32) -> Self {
    Self { x, y, level }
  }

  /// Edge length in base grid units.
  #[inline]
  pub fn size(&self) -> u32 {
    1 << self.level
  }

  /// Grid coordinates as a vector.
  #[inline]
  pub fn coords(&self) -> UVec2 {
    UVec2::new(self.x, self.y)
  }

  /// Minimum corner in base grid units.
  #[inline]
  pub fn base_min(&self) -> (u64, u64) {
    ((self.x as u64) << self.level, (self.y as u64) << self.level)
  }

  /// Get child key (finer detail: level - 1).
  ///
  /// Quadrant: 0-3 where bit 0 is the +X offset and bit 1 the +Y offset.
  ///
  /// Returns None if already at level 0 (cannot subdivide further).
  pub fn get_child(&self, quadrant: u8) -> Option<Self> {
    if self.level == 0 {
      return None;
    }
    let cx = (quadrant & 1) as u32;
    let cy = ((quadrant >> 1) & 1) as u32;
    Some(Self {
      x: self.x * 2 + cx,
      y: self.y * 2 + cy,
      level: self.level - 1,
    })
  }

  /// All four children, empty at level 0.
  pub fn children(&self) -> SmallVec<[PatchKey; 4]> {
    (0..4u8).filter_map(|quadrant| self.get_child(quadrant)).collect()
  }

  /// Get parent key (coarser: level + 1).
  ///
  /// Returns None if already at max_level (roots have no parent).
  pub fn get_parent(&self, max_level: u32) -> Option<Self> {
    if self.level >= max_level {
      return None;
    }
    Some(Self {
      x: self.x / 2,
      y: self.y / 2,
      level: self.level + 1,
    })
  }

  /// Ancestor at `level`, or None if `level` is finer than this key.
  pub fn ancestor(&self, level: u32) -> Option<Self> {
    let shift = level.checked_sub(self.level)?;
    if shift >= u32::BITS {
      return Some(Self::new(0, 0, level));
    }
    Some(Self::new(self.x >> shift, self.y >> shift, level))
  }

  /// Same-level key across `edge`.
  ///
  /// Returns None when the step would leave the non-negative grid; the
  /// upper bound is the caller's grid extent.
  pub fn neighbor(&self, edge: Edge) -> Option<Self> {
    let (dx, dy) = edge.offset();
    let x = u32::try_from(self.x as i64 + dx).ok()?;
    let y = u32::try_from(self.y as i64 + dy).ok()?;
    Some(Self::new(x, y, self.level))
  }

  /// Pack into a single word: x (28 bits) | y (28 bits) | level (8 bits).
  #[inline]
  pub fn pack(&self) -> u64 {
    ((self.x as u64 & COORD_MASK) << (KEY_COORD_BITS + KEY_LEVEL_BITS))
      | ((self.y as u64 & COORD_MASK) << KEY_LEVEL_BITS)
      | (self.level as u64 & LEVEL_MASK)
  }

  #[inline]
  pub fn unpack(word: u64) -> Self {
    Self {
      x: ((word >> (KEY_COORD_BITS + KEY_LEVEL_BITS)) & COORD_MASK) as u32,
      y: ((word >> KEY_LEVEL_BITS) & COORD_MASK) as u32,
      level: (word & LEVEL_MASK) as u32,
    }
  }
}

#[cfg(test)]
#[path = "key_test.rs"]
mod key_test;

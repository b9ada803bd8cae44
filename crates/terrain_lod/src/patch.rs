//! Finalised patch record and its two-word encoding.
//!
//! ```text
//! word 0:  PatchKey::pack()
//! word 1:  bit 63..60 mode │ 59..30 parent_counts │ 29..0 counts
//! ```

use glam::UVec2;

use crate::quadtree::PatchKey;
use crate::stitching::{PackedCounts, StitchMode};

const COUNTS_BITS: u32 = 30;
const COUNTS_MASK: u64 = (1 << COUNTS_BITS) - 1;
const MODE_SHIFT: u32 = 60;

/// A terminal patch ready for rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Patch {
  pub key: PatchKey,
  pub counts: PackedCounts,
  /// Counts presented when merged into the parent (morph target).
  pub parent_counts: PackedCounts,
  pub mode: StitchMode,
}

impl Patch {
  /// Grid coordinate in units of the patch's own size.
  #[inline]
  pub fn coords(&self) -> UVec2 {
    self.key.coords()
  }

  /// Edge length in base grid units.
  #[inline]
  pub fn size(&self) -> u32 {
    self.key.size()
  }

  pub fn encode(&self) -> [u64; 2] {
    let meta = self.counts.bits() as u64
      | ((self.parent_counts.bits() as u64) << COUNTS_BITS)
      | ((self.mode.to_bits() as u64) << MODE_SHIFT);
    [self.key.pack(), meta]
  }

  /// Decode a record. Returns None for an unknown mode tag.
  pub fn decode([key, meta]: [u64; 2]) -> Option<Self> {
    Some(Self {
      key: PatchKey::unpack(key),
      counts: PackedCounts::from_bits((meta & COUNTS_MASK) as u32),
      parent_counts: PackedCounts::from_bits(((meta >> COUNTS_BITS) & COUNTS_MASK) as u32),
      mode: StitchMode::from_bits((meta >> MODE_SHIFT) as u8)?,
    })
  }
}

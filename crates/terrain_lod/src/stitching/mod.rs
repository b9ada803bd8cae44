//! Crack-free edge stitching between neighbouring patches.
//!
//! Every terminal patch gets five tessellation counts (four edges and the
//! interior) plus the counts it would present merged into its parent. Two
//! strategies exist; a tessellator uses exactly one of them.
//!
//! # Module Structure
//!
//! - [`counts`]: `PackedCounts` - five 6-bit fields in a `u32`
//! - [`density`]: `DensityEstimator` - procedural density levels
//! - [`resolver`]: density and binary count resolvers

pub mod counts;
pub mod density;
pub mod resolver;

pub use counts::{saturate, PackedCounts};
pub use density::{density_count, DensityEstimator};
pub use resolver::{resolve_binary, resolve_density, ResolvedCounts};

/// Stitching strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StitchMode {
  /// Counts follow a procedural density map; buckets are density levels.
  #[default]
  Density = 0,
  /// Fixed count halved toward coarser neighbours; buckets are depth levels.
  Binary = 1,
}

impl StitchMode {
  #[inline]
  pub fn to_bits(self) -> u8 {
    self as u8
  }

  #[inline]
  pub fn from_bits(bits: u8) -> Option<Self> {
    match bits {
      0 => Some(Self::Density),
      1 => Some(Self::Binary),
      _ => None,
    }
  }
}

//! Tessellation and packing constants.
//!
//! # Packed Counts
//!
//! Five 6-bit tessellation counts share one `u32`. Edges come first in
//! rotational order, the interior count last:
//!
//! ```text
//! bit:  31 30 │ 29 ── 24 │ 23 ── 18 │ 17 ── 12 │ 11 ── 6 │ 5 ── 0
//!       unused│ interior │   left   │   top    │  right  │ bottom
//!             │          │   (-x)   │   (+y)   │  (+x)   │  (-y)
//! ```
//!
//! # Patch Keys
//!
//! ```text
//! bit:  63 ────────── 36 │ 35 ────────── 8 │ 7 ──── 0
//!             x          │        y        │  level
//! ```
//!
//! Coordinates are at the key's own level, so 28 bits bound the finest
//! grid to `2^28` cells per axis.

// =============================================================================
// Edge-count packing
// =============================================================================

/// Bits per packed count field.
pub const COUNT_BITS: u32 = 6;

/// Mask for a single count field.
pub const COUNT_MASK: u32 = (1 << COUNT_BITS) - 1;

/// Largest representable count. Larger values saturate.
pub const MAX_COUNT: u32 = COUNT_MASK;

/// Four edges plus the interior.
pub const PACKED_FIELDS: usize = 5;

/// Index of the interior field.
pub const INTERIOR_FIELD: usize = 4;

// =============================================================================
// Subdivision
// =============================================================================

/// Scale applied to the divide radius. Corners exactly on the unscaled
/// radius do not divide.
pub const DIVIDE_SAFETY_FACTOR: f32 = 0.99;

/// Count at density level 0. Each density level doubles it.
pub const DENSITY_BASE_COUNT: u32 = 4;

/// Largest density count. The largest power of two that fits a count field,
/// so halving toward a coarser neighbour stays exact.
pub const MAX_DENSITY_COUNT: u32 = 1 << (COUNT_BITS - 1);

/// Default number of density levels (and density-mode buckets).
pub const DEFAULT_DENSITY_LEVELS: u32 = 4;

/// Default world-space wavelength of the density noise.
pub const DEFAULT_DENSITY_WAVELENGTH: f32 = 512.0;

/// Default fixed count for binary (depth) stitching.
pub const DEFAULT_BINARY_COUNT: u32 = 8;

/// Vertices emitted per grid cell (two triangles, non-indexed).
pub const VERTICES_PER_CELL: u32 = 6;

// =============================================================================
// Key packing
// =============================================================================

/// Bits per key coordinate.
pub const KEY_COORD_BITS: u32 = 28;

/// Bits for the key level.
pub const KEY_LEVEL_BITS: u32 = 8;

/// Finest-level cells per axis that a key can address.
pub const MAX_GRID_EXTENT: u64 = 1 << KEY_COORD_BITS;

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;

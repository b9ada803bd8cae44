//! Quadtree module for view-dependent patch subdivision.
//!
//! The tree is implicit: no nodes are stored. A patch is a `PatchKey`, and
//! parent, child and neighbour relationships are computed from coordinates.
//!
//! # Level Convention
//!
//! Level 0 = finest detail (size 1), level `refinement_count` = roots.
//!
//! ```text
//! Patch world size = patch_scale * 2^level
//! ```
//!
//! # Module Structure
//!
//! - [`key`]: `PatchKey`, `Edge` - value types for tree positions
//! - [`config`]: `ViewConfig` - coordinate math and divide thresholds
//! - [`bounds`]: `Aabb2` - terrain and patch footprints
//! - [`divide`]: divide predicate and off-terrain culling
//! - [`frustum`]: `CullData` - viewer position and frustum planes
//! - [`queue`]: `AppendBuffer`, `WorkQueue` - lock-free phase buffers

pub mod bounds;
pub mod config;
pub mod divide;
pub mod frustum;
pub mod key;
pub mod queue;

// Re-exports
pub use bounds::Aabb2;
pub use config::ViewConfig;
pub use divide::{is_off_terrain, should_divide, subdivide, Subdivision};
pub use frustum::CullData;
pub use key::{Edge, PatchKey};
pub use queue::{AppendBuffer, WorkQueue};

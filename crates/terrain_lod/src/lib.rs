//! terrain_lod - Engine independent quadtree terrain tessellation
//!
//! This crate turns a camera position into a set of terrain patches for
//! instanced rendering. Patches come from a breadth-first quadtree
//! refinement driven by a distance predicate, and carry per-edge
//! tessellation counts so adjacent patches of different sizes meet without
//! cracks.
//!
//! # Features
//!
//! - **Queue-driven refinement**: one rayon parallel pass per depth level
//!   over a double-buffered append queue
//! - **Stitching**: density-map driven counts or depth-driven binary
//!   counts, packed into one word per patch
//! - **LOD buckets**: output partitioned by tessellation level for one
//!   instanced draw per bucket
//! - **Multiple views**: independent tessellators generated in parallel
//!
//! ```text
//! ┌────────────┐   ┌──────────────────────┐   ┌──────────────────┐
//! │ ViewConfig │──►│ TerrainTessellator   │──►│ OutputPartition  │
//! │ CullData   │   │ seed ─ refine ─ flush│   │ bucket ─► Patch  │
//! └────────────┘   └──────────────────────┘   └────────┬─────────┘
//!                                                      ▼
//!                                                  DrawBatch
//! ```
//!
//! # Example
//!
//! ```ignore
//! use terrain_lod::{TerrainTessellator, TessellationSettings, ViewConfig};
//!
//! let view = ViewConfig::default().with_fitted_terrain();
//! let mut tessellator = TerrainTessellator::for_view(&view, TessellationSettings::DEFAULT)?;
//!
//! let stats = tessellator.generate_at(&view, glam::Vec3::new(64.0, 2.0, 64.0))?;
//! for batch in tessellator.draw_batches() {
//!     println!("bucket {}: {} instances", batch.bucket, batch.instance_count);
//! }
//! ```

pub mod constants;
pub mod error;
pub mod patch;

// Re-export commonly used items
pub use error::{ConfigError, OutputError};
pub use patch::Patch;

// Quadtree addressing, subdivision and queues
pub mod quadtree;
pub use quadtree::{CullData, Edge, PatchKey, ViewConfig};

// Edge-count resolution
pub mod stitching;
pub use stitching::{DensityEstimator, PackedCounts, StitchMode};

// LOD-bucketed output
pub mod output;
pub use output::{DrawBatch, OutputPartition};

// Generation pipeline
pub mod pipeline;
pub use pipeline::{Capacity, GenerationStats, TerrainTessellator, TessellationSettings};

// Per-camera tessellators
pub mod views;
pub use views::{TerrainView, TerrainViews, ViewId};

// Metrics collection (feature-gated)
pub mod metrics;
pub use metrics::GenerationMetrics;

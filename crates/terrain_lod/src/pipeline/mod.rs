//! Terrain generation pipeline.
//!
//! ```text
//! ┌────────────┐     ┌─────────┐     ┌─────────────┐     ┌──────────────┐
//! │ ViewConfig ├────►│ Seed    ├────►│ Refine × R  ├────►│ Flush        │
//! │ CullData   │     │ (roots) │     │ (divide?)   │     │ (size-1)     │
//! └────────────┘     └─────────┘     └──────┬──────┘     └──────┬───────┘
//!                                           │ terminal          │
//!                                           ▼                   ▼
//!                                    ┌───────────────────────────────┐
//!                                    │ Stitching resolver            │
//!                                    │ (counts, parent_counts, lod)  │
//!                                    └──────────────┬────────────────┘
//!                                                   ▼
//!                                    ┌───────────────────────────────┐
//!                                    │ OutputPartition (per bucket)  │
//!                                    └───────────────────────────────┘
//! ```
//!
//! # Module Structure
//!
//! - [`generate`]: `TerrainTessellator` - the phase loop
//! - [`settings`]: `TessellationSettings`, `Capacity`
//! - [`stats`]: `GenerationStats`

pub mod generate;
pub mod settings;
pub mod stats;


// Re-exports
pub use generate::TerrainTessellator;
pub use settings::{Capacity, TessellationSettings};
pub use stats::GenerationStats;

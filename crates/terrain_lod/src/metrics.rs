//! Engine-agnostic metrics collection for terrain generation.
//!
//! Feature-gated and runtime-toggled to ensure zero overhead when disabled.
//!
//! # Usage
//!
//! ```ignore
//! use terrain_lod::metrics::COLLECT_METRICS;
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! // Every TerrainTessellator records its own passes:
//! tessellator.generate(&view, &cull)?;
//! let avg = tessellator.metrics().avg_generate_timing_us();
//! ```

use std::collections::VecDeque;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;
use std::sync::atomic::AtomicBool;

use crate::output::OutputPartition;
use crate::pipeline::{GenerationStats, TessellationSettings};

/// Histogram slots for buckets and levels.
pub const HISTOGRAM_SLOTS: usize = 32;

/// Runtime toggle for metrics collection.
/// Set to false to disable metrics gathering at runtime.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
    #[cfg(feature = "metrics")]
    {
        COLLECT_METRICS.load(Ordering::Relaxed)
    }
    #[cfg(not(feature = "metrics"))]
    {
        false
    }
}

/// Rolling window for storing recent values (e.g., timing history).
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    buffer: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingWindow<T> {
    /// Create a new rolling window with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new value, evicting the oldest if at capacity.
    pub fn push(&mut self, value: T) {
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Iterate over values (oldest to newest).
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter()
    }

    /// Get the most recent value.
    pub fn last(&self) -> Option<&T> {
        self.buffer.back()
    }
}

impl<T: Copy + Default + std::ops::Add<Output = T>> RollingWindow<T> {
    /// Compute the sum of all values.
    pub fn sum(&self) -> T {
        self.buffer.iter().copied().fold(T::default(), |acc, x| acc + x)
    }
}

impl RollingWindow<u64> {
    /// Compute the average of all values.
    pub fn average(&self) -> f64 {
        if self.buffer.is_empty() {
            0.0
        } else {
            self.sum() as f64 / self.buffer.len() as f64
        }
    }

    /// Get min and max values.
    pub fn min_max(&self) -> Option<(u64, u64)> {
        let min = *self.buffer.iter().min()?;
        let max = *self.buffer.iter().max()?;
        Some((min, max))
    }
}

impl Default for RollingWindow<u64> {
    fn default() -> Self {
        Self::new(128) // ~2 seconds at 60fps
    }
}

/// Per-tessellator statistics updated after each generation pass.
#[derive(Debug, Clone)]
pub struct GenerationMetrics {
    // Output distribution (last pass)
    /// Patch count per output bucket.
    pub patches_per_bucket: [u32; HISTOGRAM_SLOTS],
    /// Patch count per quadtree level (index = level).
    pub patches_per_level: [u32; HISTOGRAM_SLOTS],
    /// Vertex count per output bucket.
    pub vertices_per_bucket: [u64; HISTOGRAM_SLOTS],

    // Culling (last pass)
    pub culled_patches: u32,
    pub frustum_culled_patches: u32,

    // Timing
    /// Rolling window of generation times in microseconds.
    pub generate_timings: RollingWindow<u64>,
    /// Last generation time in microseconds.
    pub last_generate_us: u64,

    // Cumulative
    pub total_generations: u64,
    pub total_patches_generated: u64,
    /// Patches or queue entries lost to capacity or bucket errors.
    pub total_lost: u64,
}

impl Default for GenerationMetrics {
    fn default() -> Self {
        Self {
            patches_per_bucket: [0; HISTOGRAM_SLOTS],
            patches_per_level: [0; HISTOGRAM_SLOTS],
            vertices_per_bucket: [0; HISTOGRAM_SLOTS],
            culled_patches: 0,
            frustum_culled_patches: 0,
            generate_timings: RollingWindow::new(128),
            last_generate_us: 0,
            total_generations: 0,
            total_patches_generated: 0,
            total_lost: 0,
        }
    }
}

impl GenerationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset per-pass values and timings. Cumulative totals are kept.
    pub fn reset(&mut self) {
        self.patches_per_bucket.fill(0);
        self.patches_per_level.fill(0);
        self.vertices_per_bucket.fill(0);
        self.culled_patches = 0;
        self.frustum_culled_patches = 0;
        self.generate_timings.clear();
        self.last_generate_us = 0;
    }

    /// Record a generation timing.
    pub fn record_generate_timing(&mut self, timing_us: u64) {
        if is_enabled() {
            self.generate_timings.push(timing_us);
            self.last_generate_us = timing_us;
        }
    }

    /// Record a completed pass: timing, culling and output histograms.
    pub fn record_generation(
        &mut self,
        stats: &GenerationStats,
        output: &OutputPartition,
        settings: &TessellationSettings,
    ) {
        if !is_enabled() {
            return;
        }
        self.record_generate_timing(stats.elapsed_us);

        self.patches_per_bucket.fill(0);
        self.patches_per_level.fill(0);
        self.vertices_per_bucket.fill(0);
        for bucket in 0..output.bucket_count() {
            let slot = bucket.min(HISTOGRAM_SLOTS - 1);
            let len = output.bucket_len(bucket) as u64;
            self.patches_per_bucket[slot] += len as u32;
            self.vertices_per_bucket[slot] += len * settings.vertices_per_patch(bucket) as u64;
        }
        for patch in output.patches() {
            let slot = (patch.key.level as usize).min(HISTOGRAM_SLOTS - 1);
            self.patches_per_level[slot] += 1;
        }

        self.culled_patches = stats.culled as u32;
        self.frustum_culled_patches = stats.frustum_culled as u32;
        self.total_generations += 1;
        self.total_patches_generated += stats.emitted() as u64;
        self.total_lost += (stats.rejected + stats.overflowed) as u64;
    }

    /// Get the patch count of the last pass.
    pub fn total_patches(&self) -> u32 {
        self.patches_per_bucket.iter().sum()
    }

    /// Get the vertex count of the last pass.
    pub fn total_vertices(&self) -> u64 {
        self.vertices_per_bucket.iter().sum()
    }

    /// Get average generation timing in microseconds.
    pub fn avg_generate_timing_us(&self) -> f64 {
        self.generate_timings.average()
    }
}

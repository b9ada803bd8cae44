//! Queue-driven patch generation.
//!
//! ```text
//! ┌──────┐   ┌──────────────────────┐   ┌───────┐
//! │ Seed ├──►│ Refine × refinement  ├──►│ Flush │
//! └──────┘   └──────────────────────┘   └───────┘
//!  roots at     divide?  ── yes ──► ≤4 children ──► next phase
//!  2^R size        │                (off-terrain children dropped)
//!                  no
//!                  ▼
//!              finalise ──► stitching resolver ──► output bucket
//! ```
//!
//! Every phase is one rayon parallel iterator over the keys queued by the
//! previous phase; its join is the barrier. Keys left after the last refine
//! phase are size-1 patches and are finalised unconditionally.

use glam::Vec3;
use rayon::prelude::*;
use web_time::Instant;

use super::settings::{Capacity, TessellationSettings};
use super::stats::{GenerationStats, PhaseTally};
use crate::error::{ConfigError, OutputError};
use crate::metrics::GenerationMetrics;
use crate::output::{DrawBatch, OutputPartition};
use crate::patch::Patch;
use crate::quadtree::{should_divide, subdivide, CullData, PatchKey, ViewConfig, WorkQueue};
use crate::stitching::{resolve_binary, resolve_density, StitchMode};

/// Per-view patch generator. Owns its work queue and output buckets.
///
/// `generate` takes `&mut self` and every read takes `&self`, so output is
/// only observable once a pass has completed.
pub struct TerrainTessellator {
  settings: TessellationSettings,
  capacity: Capacity,
  queue: WorkQueue,
  output: OutputPartition,
  /// Last view that passed the capacity check.
  checked_view: Option<ViewConfig>,
  frozen: bool,
  last_stats: GenerationStats,
  metrics: GenerationMetrics,
}

impl TerrainTessellator {
  /// Allocate buffers for `capacity`.
  pub fn new(settings: TessellationSettings, capacity: Capacity) -> Result<Self, ConfigError> {
    settings.validate()?;
    Ok(Self {
      settings,
      capacity,
      queue: WorkQueue::with_capacity(capacity.queue),
      output: OutputPartition::with_capacities(
        (0..capacity.buckets).map(|bucket| capacity.bucket_capacity(bucket, settings.stitch_mode)),
      ),
      checked_view: None,
      frozen: false,
      last_stats: GenerationStats::default(),
      metrics: GenerationMetrics::default(),
    })
  }

  /// Allocate buffers for the worst case of `view`.
  pub fn for_view(view: &ViewConfig, settings: TessellationSettings) -> Result<Self, ConfigError> {
    let capacity = Capacity::worst_case(view, &settings)?;
    Self::new(settings, capacity)
  }

  pub fn settings(&self) -> &TessellationSettings {
    &self.settings
  }

  pub fn capacity(&self) -> &Capacity {
    &self.capacity
  }

  /// Output of the last completed pass.
  pub fn output(&self) -> &OutputPartition {
    &self.output
  }

  /// Statistics of the last completed pass.
  pub fn last_stats(&self) -> &GenerationStats {
    &self.last_stats
  }

  pub fn metrics(&self) -> &GenerationMetrics {
    &self.metrics
  }

  pub fn metrics_mut(&mut self) -> &mut GenerationMetrics {
    &mut self.metrics
  }

  /// Frozen tessellators skip generation and keep their last output.
  pub fn set_frozen(&mut self, frozen: bool) {
    self.frozen = frozen;
  }

  pub fn is_frozen(&self) -> bool {
    self.frozen
  }

  /// Per-bucket draw summaries of the last pass.
  pub fn draw_batches(&self) -> Vec<DrawBatch> {
    self
      .output
      .draw_batches(|bucket| self.settings.vertices_per_patch(bucket))
  }

  /// Generate for a viewer at `viewer` with no frustum.
  pub fn generate_at(&mut self, view: &ViewConfig, viewer: Vec3) -> Result<GenerationStats, ConfigError> {
    self.generate(view, &CullData::at_position(viewer))
  }

  /// Run seed, refine and flush for one view.
  ///
  /// Fails without touching the previous output when `view` is invalid or
  /// exceeds the provisioned capacity. The check reruns only when `view`
  /// differs from the last view that passed it.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "terrain::generate"))]
  pub fn generate(&mut self, view: &ViewConfig, cull: &CullData) -> Result<GenerationStats, ConfigError> {
    if self.frozen {
      return Ok(self.last_stats);
    }
    if self.checked_view.as_ref() != Some(view) {
      self.capacity.check(view, &self.settings)?;
      self.checked_view = Some(*view);
    }

    let start = Instant::now();
    self.queue.reset();
    self.output.reset(self.settings.bucket_count(view))?;

    let mut stats = self.run_phases(view, cull);
    stats.elapsed_us = start.elapsed().as_micros() as u64;

    #[cfg(feature = "tracing")]
    {
      if !stats.is_lossless() {
        tracing::warn!(
          overflowed = stats.overflowed,
          rejected = stats.rejected,
          "generation lost patches"
        );
      }
    }

    self.last_stats = stats;
    self
      .metrics
      .record_generation(&stats, &self.output, &self.settings);
    Ok(stats)
  }

  fn run_phases(&mut self, view: &ViewConfig, cull: &CullData) -> GenerationStats {
    let queue = &mut self.queue;
    let ctx = PassContext {
      view,
      cull,
      settings: &self.settings,
      output: &self.output,
    };
    let mut stats = GenerationStats::default();

    // Seed
    {
      #[cfg(feature = "tracing")]
      let _span = tracing::info_span!("seed").entered();

      let patch_count = view.patch_count as usize;
      let root_level = view.root_level();
      let seeding = &*queue;
      (0..patch_count * patch_count)
        .into_par_iter()
        .for_each(|index| {
          let key = PatchKey::new((index % patch_count) as u32, (index / patch_count) as u32, root_level);
          seeding.push(key);
        });
      stats.seeded = patch_count * patch_count;
      stats.overflowed += queue.swap();
    }

    // Refine
    for _ in 0..view.refinement_count {
      #[cfg(feature = "tracing")]
      let _span = tracing::info_span!("refine", pending = queue.pending()).entered();

      stats.peak_queue = stats.peak_queue.max(queue.pending());
      let tally = run_phase(queue, |key, next| ctx.refine(key, next));
      stats.absorb(tally);
      stats.terminal += tally.finalized;
      stats.overflowed += queue.swap();
    }

    // Flush
    {
      #[cfg(feature = "tracing")]
      let _span = tracing::info_span!("flush", pending = queue.pending()).entered();

      stats.peak_queue = stats.peak_queue.max(queue.pending());
      let tally = run_phase(queue, |key, _| ctx.finalize(key));
      stats.absorb(tally);
      stats.flushed += tally.finalized;
    }

    stats
  }
}

/// Run `task` on every key of the current phase in parallel.
fn run_phase<F>(queue: &WorkQueue, task: F) -> PhaseTally
where
  F: Fn(PatchKey, &WorkQueue) -> PhaseTally + Sync,
{
  (0..queue.pending())
    .into_par_iter()
    .map(|index| {
      queue
        .read(index)
        .map_or_else(PhaseTally::default, |key| task(key, queue))
    })
    .reduce(PhaseTally::default, |a, b| a + b)
}

/// Read-only inputs shared by every task of a pass.
struct PassContext<'a> {
  view: &'a ViewConfig,
  cull: &'a CullData,
  settings: &'a TessellationSettings,
  output: &'a OutputPartition,
}

impl PassContext<'_> {
  fn refine(&self, key: PatchKey, next: &WorkQueue) -> PhaseTally {
    if !should_divide(&key, self.view, self.cull.world_position) {
      return self.finalize(key);
    }

    let subdivision = subdivide(&key, self.view);
    let mut tally = PhaseTally {
      divided: 1,
      culled: subdivision.culled,
      ..Default::default()
    };
    for child in subdivision.children {
      if self.settings.frustum_culling && !self.in_frustum(&child) {
        tally.frustum_culled += 1;
        continue;
      }
      // Refused appends are counted when the phase swaps
      next.push(child);
    }
    tally
  }

  fn in_frustum(&self, key: &PatchKey) -> bool {
    let (min, max) = self
      .view
      .patch_aabb(key, self.settings.min_height, self.settings.max_height);
    self.cull.intersects_aabb(min, max)
  }

  fn finalize(&self, key: PatchKey) -> PhaseTally {
    let mode = self.settings.stitch_mode;
    let resolved = match mode {
      StitchMode::Density => resolve_density(&key, self.view, &self.settings.density),
      StitchMode::Binary => resolve_binary(
        &key,
        self.view,
        self.cull.world_position,
        self.settings.binary_count,
      ),
    };
    let patch = Patch {
      key,
      counts: resolved.counts,
      parent_counts: resolved.parent_counts,
      mode,
    };

    let mut tally = PhaseTally {
      finalized: 1,
      ..Default::default()
    };
    if let Err(err) = self.output.push(resolved.lod as usize, &patch) {
      debug_assert!(
        !matches!(err, OutputError::BucketOutOfRange { .. }),
        "resolved lod outside bucket table: {}",
        err
      );
      #[cfg(feature = "tracing")]
      tracing::warn!(?key, %err, "patch rejected");
      tally.rejected = 1;
    }
    tally
  }
}

#[cfg(test)]
#[path = "generate_test.rs"]
mod generate_test;

//! Generation benchmarks.
//!
//! Compares the two stitching strategies across refinement depths:
//! - **density**: counts from the density map, one bucket per density level
//! - **binary**: counts from neighbour depth, one bucket per quadtree level
//!
//! Isolated groups measure the per-patch resolvers on their own.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Mat4, Vec3};
use terrain_lod::{
  pipeline::{TerrainTessellator, TessellationSettings},
  quadtree::{CullData, PatchKey, ViewConfig},
  stitching::{resolve_binary, resolve_density, DensityEstimator},
};

fn view(refinement_count: u32) -> ViewConfig {
  ViewConfig::default()
    .with_patch_count(8)
    .with_refinement_count(refinement_count)
    .with_fitted_terrain()
}

/// Viewer slightly above the terrain centre.
fn centre_viewer(view: &ViewConfig) -> Vec3 {
  let half = view.terrain_size * 0.5;
  Vec3::new(half, 2.0, half)
}

// =============================================================================
// Full generation
// =============================================================================

fn bench_generate(c: &mut Criterion) {
  let mut group = c.benchmark_group("generate");

  for refinement_count in [2u32, 4, 6] {
    let view = view(refinement_count);
    let viewer = centre_viewer(&view);

    for (name, settings) in [
      ("density", TessellationSettings::DEFAULT),
      ("binary", TessellationSettings::BINARY),
    ] {
      let Ok(mut tessellator) = TerrainTessellator::for_view(&view, settings) else {
        continue;
      };
      group.bench_with_input(
        BenchmarkId::new(name, refinement_count),
        &refinement_count,
        |b, _| {
          b.iter(|| black_box(tessellator.generate_at(&view, black_box(viewer))));
        },
      );
    }
  }

  group.finish();
}

fn bench_generate_frustum(c: &mut Criterion) {
  let mut group = c.benchmark_group("generate/frustum");
  let view = view(5);
  let eye = centre_viewer(&view);
  let view_proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 16.0 / 9.0, 0.1, 4096.0)
    * Mat4::look_at_rh(eye, eye + Vec3::new(1.0, -0.2, 0.3), Vec3::Y);
  let cull = CullData::from_view_proj(eye, view_proj);

  for (name, enabled) in [("off", false), ("on", true)] {
    let settings = TessellationSettings::DEFAULT.with_frustum_culling(enabled);
    let Ok(mut tessellator) = TerrainTessellator::for_view(&view, settings) else {
      continue;
    };
    group.bench_function(name, |b| {
      b.iter(|| black_box(tessellator.generate(&view, black_box(&cull))));
    });
  }

  group.finish();
}

// =============================================================================
// Isolated resolvers
// =============================================================================

fn bench_resolvers(c: &mut Criterion) {
  let mut group = c.benchmark_group("isolated/resolve");
  let view = view(6);
  let viewer = centre_viewer(&view);
  let estimator = DensityEstimator::DEFAULT;

  // A 16x16 block of finest patches around the centre
  let origin = (view.grid_extent() / 2) as u32;
  let keys: Vec<PatchKey> = (0..16)
    .flat_map(|y| (0..16).map(move |x| PatchKey::new(origin + x, origin + y, 0)))
    .collect();

  group.bench_function("density_256", |b| {
    b.iter(|| {
      for key in &keys {
        black_box(resolve_density(key, &view, &estimator));
      }
    });
  });

  group.bench_function("binary_256", |b| {
    b.iter(|| {
      for key in &keys {
        black_box(resolve_binary(key, &view, viewer, 8));
      }
    });
  });

  group.finish();
}

criterion_group!(generation, bench_generate, bench_generate_frustum);
criterion_group!(isolated, bench_resolvers);

criterion_main!(generation, isolated);

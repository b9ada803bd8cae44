//! TerrainViews - independent per-camera tessellators.
//!
//! Each view owns its configuration, cull data and tessellator, so views
//! never share queue or output memory. `generate_all` runs every view in
//! parallel and reports one result per view.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec3;
use rayon::prelude::*;

use crate::error::ConfigError;
use crate::pipeline::{GenerationStats, TerrainTessellator, TessellationSettings};
use crate::quadtree::{CullData, ViewConfig};

// =============================================================================
// ViewId - unique identifier
// =============================================================================

/// Atomic counter for generating unique ViewIds.
static VIEW_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque view identifier.
///
/// Generated atomically - guaranteed unique within process lifetime.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct ViewId(u64);

impl ViewId {
    /// Generate a new unique ViewId.
    pub fn new() -> Self {
        Self(VIEW_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for ViewId {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TerrainView - per-camera state container
// =============================================================================

/// One camera looking at the terrain.
pub struct TerrainView {
    /// Unique view identifier.
    pub id: ViewId,

    /// Subdivision parameters for this camera.
    pub config: ViewConfig,

    /// Viewer position and frustum for the next pass.
    pub cull: CullData,

    tessellator: TerrainTessellator,
}

impl TerrainView {
    /// Create a view with buffers sized for the worst case of `config`.
    pub fn new(config: ViewConfig, settings: TessellationSettings) -> Result<Self, ConfigError> {
        Ok(Self {
            id: ViewId::new(),
            config,
            cull: CullData::default(),
            tessellator: TerrainTessellator::for_view(&config, settings)?,
        })
    }

    /// Move the viewer without a frustum.
    pub fn set_viewer(&mut self, position: Vec3) {
        self.cull = CullData::at_position(position);
    }

    pub fn tessellator(&self) -> &TerrainTessellator {
        &self.tessellator
    }

    pub fn tessellator_mut(&mut self) -> &mut TerrainTessellator {
        &mut self.tessellator
    }

    /// Run one pass with the current config and cull data.
    pub fn generate(&mut self) -> Result<GenerationStats, ConfigError> {
        self.tessellator.generate(&self.config, &self.cull)
    }
}

// =============================================================================
// TerrainViews - collection
// =============================================================================

/// All views of a frame, in insertion order.
#[derive(Default)]
pub struct TerrainViews {
    views: Vec<TerrainView>,
}

impl TerrainViews {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a view and return its id.
    pub fn insert(&mut self, view: TerrainView) -> ViewId {
        let id = view.id;
        self.views.push(view);
        id
    }

    /// Create and add a view for `config`.
    pub fn create(
        &mut self,
        config: ViewConfig,
        settings: TessellationSettings,
    ) -> Result<ViewId, ConfigError> {
        Ok(self.insert(TerrainView::new(config, settings)?))
    }

    pub fn get(&self, id: ViewId) -> Option<&TerrainView> {
        self.views.iter().find(|view| view.id == id)
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut TerrainView> {
        self.views.iter_mut().find(|view| view.id == id)
    }

    /// Remove a view, returning it if present.
    pub fn remove(&mut self, id: ViewId) -> Option<TerrainView> {
        let index = self.views.iter().position(|view| view.id == id)?;
        Some(self.views.remove(index))
    }

    /// Replace the cull data of a view. Returns false for unknown ids.
    pub fn update(&mut self, id: ViewId, cull: CullData) -> bool {
        match self.get_mut(id) {
            Some(view) => {
                view.cull = cull;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TerrainView> {
        self.views.iter()
    }

    /// Generate every view in parallel.
    ///
    /// A failing view keeps its previous output and does not affect others.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "terrain::generate_all"))]
    pub fn generate_all(&mut self) -> Vec<(ViewId, Result<GenerationStats, ConfigError>)> {
        self.views
            .par_iter_mut()
            .map(|view| (view.id, view.generate()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(patch_count: u32, refinement_count: u32) -> ViewConfig {
        ViewConfig::default()
            .with_patch_count(patch_count)
            .with_refinement_count(refinement_count)
            .with_fitted_terrain()
    }

    #[test]
    fn test_view_ids_are_unique() {
        let a = ViewId::new();
        let b = ViewId::new();
        assert_ne!(a, b);
        assert!(b.raw() > a.raw());
    }

    #[test]
    fn test_insert_get_remove() {
        let mut views = TerrainViews::new();
        assert!(views.is_empty());

        let id = views
            .create(config(2, 2), TessellationSettings::DEFAULT)
            .expect("valid view");
        assert_eq!(views.len(), 1);
        assert_eq!(views.get(id).map(|v| v.id), Some(id));

        assert!(views.update(id, CullData::at_position(Vec3::ONE)));
        assert_eq!(views.get(id).map(|v| v.cull.world_position), Some(Vec3::ONE));

        let removed = views.remove(id).expect("view exists");
        assert_eq!(removed.id, id);
        assert!(views.get(id).is_none());
        assert!(!views.update(id, CullData::default()));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut views = TerrainViews::new();
        let result = views.create(config(2, 2).with_patch_scale(0.0), TessellationSettings::DEFAULT);
        assert!(result.is_err());
        assert!(views.is_empty());
    }

    /// Views generate independently and match a standalone tessellator.
    #[test]
    fn test_generate_all_matches_single_views() {
        let mut views = TerrainViews::new();
        let near = views
            .create(config(4, 3), TessellationSettings::DEFAULT)
            .expect("valid view");
        let far = views
            .create(config(2, 4), TessellationSettings::BINARY)
            .expect("valid view");
        views
            .get_mut(near)
            .expect("view exists")
            .set_viewer(Vec3::new(3.0, 0.0, 3.0));
        views
            .get_mut(far)
            .expect("view exists")
            .set_viewer(Vec3::new(30.0, 2.0, 1.0));

        let results = views.generate_all();
        assert_eq!(results.len(), 2);
        for (id, result) in results {
            let stats = result.expect("generation succeeds");
            let view = views.get(id).expect("view exists");

            let mut single = TerrainTessellator::for_view(&view.config, *view.tessellator().settings())
                .expect("valid view");
            let expected = single
                .generate(&view.config, &view.cull)
                .expect("generation succeeds");

            assert_eq!(stats.emitted(), expected.emitted());
            let mut a: Vec<_> = view.tessellator().output().patches().map(|p| p.key).collect();
            let mut b: Vec<_> = single.output().patches().map(|p| p.key).collect();
            a.sort();
            b.sort();
            assert_eq!(a, b);
        }
    }

    /// One failing view reports its error; the others still generate.
    #[test]
    fn test_failing_view_does_not_block_others() {
        let mut views = TerrainViews::new();
        let good = views
            .create(config(2, 2), TessellationSettings::DEFAULT)
            .expect("valid view");
        let bad = views
            .create(config(2, 2), TessellationSettings::DEFAULT)
            .expect("valid view");
        views.get_mut(bad).expect("view exists").config = config(8, 6);

        let results = views.generate_all();
        for (id, result) in results {
            if id == good {
                assert!(result.is_ok());
            } else {
                assert_eq!(id, bad);
                assert!(matches!(result, Err(ConfigError::InsufficientCapacity { .. })));
            }
        }
        assert!(!views.get(good).expect("view exists").tessellator().output().is_empty());
    }
}

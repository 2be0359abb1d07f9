//! Routing drawables into batches and drawing batches in depth order.

use tessera_core::profiling::profile_function;
use tessera_test_utils::{RenderContext, ShaderProgram};

use crate::batch::Batch;
use crate::camera::Camera;
use crate::drawable::{DrawableId, DrawableStore};

/// Quads per batch unless configured otherwise.
pub const DEFAULT_BATCH_CAPACITY: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererConfig {
    /// Maximum quads per batch.
    pub batch_capacity: usize,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            batch_capacity: DEFAULT_BATCH_CAPACITY,
        }
    }
}

/// Totals for one [`BatchSet::render_all`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub batches: usize,
    pub draw_calls: usize,
    pub vertex_uploads: usize,
    pub rewritten_quads: usize,
    pub quads: usize,
}

/// Ordered collection of batches, sorted ascending by depth.
///
/// Drawables only share a batch when their depths are equal, so drawing the
/// batches in sequence draws lower depths beneath higher ones.
pub struct BatchSet {
    config: RendererConfig,
    batches: Vec<Batch>,
}

impl BatchSet {
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            batches: Vec::new(),
        }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Pack the drawable `id` at `depth` into the first compatible batch,
    /// opening a new batch when none fits.
    ///
    /// Returns `false` (and does nothing) when `id` has no drawable in `store`.
    pub fn add(
        &mut self,
        ctx: &dyn RenderContext,
        store: &dyn DrawableStore,
        id: DrawableId,
        depth: i32,
    ) -> bool {
        let Some(drawable) = store.drawable(id) else {
            return false;
        };

        if let Some(batch) = self
            .batches
            .iter_mut()
            .find(|batch| batch.depth() == depth && batch.accepts(drawable))
        {
            batch.add(id, drawable);
            return true;
        }

        let mut batch = Batch::open(ctx, self.config.batch_capacity, depth);
        batch.add(id, drawable);
        self.batches.push(batch);
        // Stable, so batches of equal depth keep their creation order.
        self.batches.sort_by_key(Batch::depth);
        tracing::debug!(depth, batches = self.batches.len(), "added sprite batch");
        true
    }

    /// Refresh and draw every batch, lowest depth first.
    pub fn render_all(
        &mut self,
        ctx: &dyn RenderContext,
        store: &mut dyn DrawableStore,
        program: &mut dyn ShaderProgram,
        camera: &Camera,
    ) -> FrameStats {
        profile_function!();
        let mut frame = FrameStats {
            batches: self.batches.len(),
            ..Default::default()
        };

        for batch in &mut self.batches {
            let stats = batch.refresh_and_draw(ctx, store, program, camera);
            frame.draw_calls += stats.drawn as usize;
            frame.vertex_uploads += stats.uploaded as usize;
            frame.rewritten_quads += stats.rewritten_quads;
            frame.quads += batch.len();
        }

        frame
    }
}

impl Default for BatchSet {
    fn default() -> Self {
        Self::new(RendererConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::drawable::Drawable;
    use crate::texture::Texture;
    use crate::visual::QuadVisual;
    use tessera_core::alloc::SparseSet;
    use tessera_test_utils::MockRenderContext;

    #[test]
    fn test_missing_drawable_is_noop() {
        let ctx = MockRenderContext::new();
        let mut store = SparseSet::new();
        let id = store.push(Drawable::from_color(Color::WHITE));
        store.remove(id);

        let mut set = BatchSet::default();
        assert!(!set.add(&ctx, &store, id, 0));
        assert!(set.is_empty());
        assert_eq!(ctx.count_buffer_creates(), 0);
    }

    #[test]
    fn test_same_depth_shares_batch() {
        let ctx = MockRenderContext::new();
        let mut store = SparseSet::new();
        let mut set = BatchSet::default();
        for _ in 0..10 {
            let id = store.push(Drawable::from_color(Color::WHITE));
            set.add(&ctx, &store, id, 2);
        }
        assert_eq!(set.len(), 1);
        assert_eq!(set.batches()[0].len(), 10);
    }

    #[test]
    fn test_different_depths_never_share() {
        let ctx = MockRenderContext::new();
        let mut store = SparseSet::new();
        let mut set = BatchSet::default();
        let a = store.push(Drawable::from_color(Color::WHITE));
        let b = store.push(Drawable::from_color(Color::WHITE));
        set.add(&ctx, &store, a, 0);
        set.add(&ctx, &store, b, 1);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_capacity_overflow_opens_batch() {
        let ctx = MockRenderContext::new();
        let mut store = SparseSet::new();
        let mut set = BatchSet::new(RendererConfig { batch_capacity: 3 });
        for _ in 0..7 {
            let id = store.push(Drawable::from_color(Color::WHITE));
            set.add(&ctx, &store, id, 0);
        }
        let sizes: Vec<_> = set.batches().iter().map(Batch::len).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
    }

    #[test]
    fn test_existing_texture_reuses_full_slot_batch() {
        let ctx = MockRenderContext::new();
        let mut store = SparseSet::new();
        let mut set = BatchSet::default();
        let textures: Vec<_> = (0..8)
            .map(|_| Texture::from_rgba8(&ctx, None, 1, 1, &[0; 4]).unwrap())
            .collect();
        for texture in &textures {
            let id = store.push(Drawable::from_visual(QuadVisual::new(texture.clone())));
            set.add(&ctx, &store, id, 0);
        }

        let again = store.push(Drawable::from_visual(QuadVisual::new(textures[3].clone())));
        set.add(&ctx, &store, again, 0);
        let plain = store.push(Drawable::from_color(Color::RED));
        set.add(&ctx, &store, plain, 0);

        assert_eq!(set.len(), 1);
        assert_eq!(set.batches()[0].len(), 10);
    }
}

//! Fixed-capacity quad batch: packing, dirty refresh and a single draw call.

use tessera_core::profiling::profile_function;
use tessera_test_utils::{
    GpuBuffer, PROJECTION_UNIFORM, RenderContext, ShaderProgram, TEXTURES_UNIFORM, VIEW_UNIFORM,
};

use crate::camera::Camera;
use crate::drawable::{Drawable, DrawableId, DrawableStore};
use crate::texture::Texture;
use crate::vertex::{
    CORNER_FLAGS, INDICES_PER_QUAD, SpriteVertex, VERTICES_PER_QUAD, quad_indices,
};

/// Distinct textures one batch can reference.
pub const MAX_TEXTURE_SLOTS: usize = 8;

/// Sampler unit for every texture slot, slot 0 included. Slot `n` samples unit `n`.
pub const TEXTURE_UNITS: [i32; MAX_TEXTURE_SLOTS + 1] = [0, 1, 2, 3, 4, 5, 6, 7, 8];

/// What one [`Batch::refresh_and_draw`] call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchDrawStats {
    /// Members whose vertices were recomputed.
    pub rewritten_quads: usize,
    /// Whether the vertex buffer was re-uploaded.
    pub uploaded: bool,
    /// Whether a draw call was issued.
    pub drawn: bool,
}

/// Up to `capacity` quads sharing one depth key and at most
/// [`MAX_TEXTURE_SLOTS`] textures, drawn with one indexed draw call.
///
/// Members are borrowed: the batch only stores their ids and resolves them
/// through a [`DrawableStore`] when refreshing.
pub struct Batch {
    capacity: usize,
    depth: i32,
    slot_textures: Vec<Texture>,
    members: Vec<DrawableId>,
    vertices: Vec<SpriteVertex>,
    vertex_buffer: GpuBuffer,
    index_buffer: GpuBuffer,
}

impl Batch {
    /// Allocate the vertex buffer and upload the static index buffer.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn open(ctx: &dyn RenderContext, capacity: usize, depth: i32) -> Self {
        assert!(capacity > 0, "batch capacity must be at least one quad");

        let vertex_count = capacity * VERTICES_PER_QUAD;
        let vertex_buffer = ctx.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Sprite Batch Vertices"),
            size: vertex_count as u64 * SpriteVertex::SIZE,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let indices = quad_indices(capacity);
        let index_buffer = ctx.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Sprite Batch Indices"),
            size: (indices.len() * std::mem::size_of::<u32>()) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        ctx.write_buffer(&index_buffer, 0, bytemuck::cast_slice(&indices));

        tracing::debug!(capacity, depth, "opened sprite batch");

        Self {
            capacity,
            depth,
            slot_textures: Vec::with_capacity(MAX_TEXTURE_SLOTS),
            members: Vec::with_capacity(capacity),
            vertices: vec![SpriteVertex::default(); vertex_count],
            vertex_buffer,
            index_buffer,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity
    }

    pub fn has_room(&self) -> bool {
        !self.is_full()
    }

    pub fn has_texture_room(&self) -> bool {
        self.slot_textures.len() < MAX_TEXTURE_SLOTS
    }

    pub fn has_texture(&self, texture: &Texture) -> bool {
        self.slot_textures.contains(texture)
    }

    /// Whether `drawable` could be added without violating capacity or slot limits.
    pub fn accepts(&self, drawable: &Drawable) -> bool {
        self.has_room()
            && drawable
                .visual()
                .texture()
                .is_none_or(|texture| self.has_texture(texture) || self.has_texture_room())
    }

    pub fn members(&self) -> &[DrawableId] {
        &self.members
    }

    pub fn slot_textures(&self) -> &[Texture] {
        &self.slot_textures
    }

    /// CPU-side copy of the packed vertices, `capacity * 4` entries.
    pub fn vertices(&self) -> &[SpriteVertex] {
        &self.vertices
    }

    /// The four packed vertices of the member at `index`.
    pub fn quad(&self, index: usize) -> Option<&[SpriteVertex]> {
        (index < self.members.len()).then(|| {
            let start = index * VERTICES_PER_QUAD;
            &self.vertices[start..start + VERTICES_PER_QUAD]
        })
    }

    pub fn vertex_buffer(&self) -> &GpuBuffer {
        &self.vertex_buffer
    }

    pub fn index_buffer(&self) -> &GpuBuffer {
        &self.index_buffer
    }

    /// Texture slot of `texture`: 0 for none, `1 + position` for a registered texture.
    pub fn slot_of(&self, texture: Option<&Texture>) -> Option<u32> {
        match texture {
            None => Some(0),
            Some(texture) => self
                .slot_textures
                .iter()
                .position(|t| t == texture)
                .map(|i| i as u32 + 1),
        }
    }

    /// Append `drawable` and pack its vertices immediately.
    ///
    /// Does not clear the drawable's dirty flag; the first refresh uploads it.
    ///
    /// # Panics
    /// Panics if the batch is full or the drawable needs a ninth texture.
    /// Check [`Batch::accepts`] first.
    pub fn add(&mut self, id: DrawableId, drawable: &Drawable) {
        assert!(
            self.has_room(),
            "sprite batch is full ({} quads)",
            self.capacity
        );
        if let Some(texture) = drawable.visual().texture() {
            if !self.has_texture(texture) {
                assert!(
                    self.has_texture_room(),
                    "sprite batch already references {MAX_TEXTURE_SLOTS} textures"
                );
                self.slot_textures.push(texture.clone());
            }
        }

        let index = self.members.len();
        self.members.push(id);
        self.load_vertices(index, drawable);
    }

    fn texture_slot(&mut self, drawable: &Drawable) -> f32 {
        let texture = drawable.visual().texture();
        if let Some(slot) = self.slot_of(texture) {
            return slot as f32;
        }
        // Visual was swapped to a texture this batch has not seen yet.
        match texture {
            Some(texture) if self.has_texture_room() => {
                self.slot_textures.push(texture.clone());
                self.slot_textures.len() as f32
            }
            _ => {
                tracing::warn!(
                    depth = self.depth,
                    "no free texture slot for replaced visual, drawing untextured"
                );
                if cfg!(debug_assertions) {
                    panic!(
                        "sprite batch already references {MAX_TEXTURE_SLOTS} textures, \
                         replaced visual has no free slot"
                    );
                }
                0.0
            }
        }
    }

    fn load_vertices(&mut self, index: usize, drawable: &Drawable) {
        let tex_slot = self.texture_slot(drawable);
        let color = drawable.color().to_array();
        let transform = drawable.transform();
        let tex_coords = drawable.visual().tex_coords();

        let start = index * VERTICES_PER_QUAD;
        for (corner, vertex) in self.vertices[start..start + VERTICES_PER_QUAD]
            .iter_mut()
            .enumerate()
        {
            let position = transform.position + CORNER_FLAGS[corner] * transform.scale;
            *vertex = SpriteVertex {
                position: position.to_array(),
                color,
                tex_coords: tex_coords[corner].to_array(),
                tex_slot,
            };
        }
    }

    /// Re-pack dirty members, upload once if anything changed, then draw.
    ///
    /// A member that no longer resolves in `store` has its quad cleared.
    ///
    /// # Panics
    /// In debug builds, panics if a member's visual was swapped to a ninth
    /// texture. Release builds log a warning and draw that quad untextured.
    pub fn refresh_and_draw(
        &mut self,
        ctx: &dyn RenderContext,
        store: &mut dyn DrawableStore,
        program: &mut dyn ShaderProgram,
        camera: &Camera,
    ) -> BatchDrawStats {
        profile_function!();
        let mut stats = BatchDrawStats::default();

        let mut cleared_quads = 0;
        for index in 0..self.members.len() {
            let id = self.members[index];
            let Some(drawable) = store.drawable_mut(id) else {
                // Collapse the stale quad to zero area; its indices stay in the draw.
                let start = index * VERTICES_PER_QUAD;
                let quad = &mut self.vertices[start..start + VERTICES_PER_QUAD];
                if quad.iter().any(|vertex| *vertex != SpriteVertex::default()) {
                    tracing::warn!(?id, depth = self.depth, "batch member no longer resolves, clearing its quad");
                    quad.fill(SpriteVertex::default());
                    cleared_quads += 1;
                }
                continue;
            };
            if drawable.is_dirty() {
                drawable.mark_clean();
                self.load_vertices(index, drawable);
                stats.rewritten_quads += 1;
            }
        }

        if stats.rewritten_quads > 0 || cleared_quads > 0 {
            ctx.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&self.vertices));
            stats.uploaded = true;
        }

        if self.members.is_empty() {
            return stats;
        }

        program.use_program();
        program.upload_mat4(
            PROJECTION_UNIFORM,
            &camera.projection_matrix().to_cols_array_2d(),
        );
        program.upload_mat4(VIEW_UNIFORM, &camera.view_matrix().to_cols_array_2d());
        program.upload_int_array(TEXTURES_UNIFORM, &TEXTURE_UNITS);
        for (i, texture) in self.slot_textures.iter().enumerate() {
            texture.bind(program, i as u32 + 1);
        }

        let index_count = (self.members.len() * INDICES_PER_QUAD) as u32;
        program.draw_indexed(&self.vertex_buffer, &self.index_buffer, index_count);
        stats.drawn = true;

        for (i, texture) in self.slot_textures.iter().enumerate() {
            texture.unbind(program, i as u32 + 1);
        }
        program.detach();

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::drawable::Transform;
    use crate::visual::QuadVisual;
    use glam::Vec2;
    use tessera_core::alloc::SparseSet;
    use tessera_test_utils::{MockRenderContext, RenderCall};

    fn texture(ctx: &MockRenderContext) -> Texture {
        Texture::from_rgba8(ctx, None, 1, 1, &[255; 4]).unwrap()
    }

    fn textured(texture: &Texture) -> Drawable {
        Drawable::from_visual(QuadVisual::new(texture.clone()))
    }

    #[test]
    fn test_open_uploads_index_buffer() {
        let ctx = MockRenderContext::new();
        let batch = Batch::open(&ctx, 4, 0);

        assert_eq!(ctx.count_buffer_creates(), 2);
        assert_eq!(batch.vertex_buffer().size(), 4 * 4 * 36);
        assert_eq!(batch.index_buffer().size(), 4 * 6 * 4);

        let index_id = batch.index_buffer().mock_id().unwrap();
        let bytes = ctx.buffer_contents(index_id).unwrap();
        let indices: Vec<u32> = bytemuck::pod_collect_to_vec(&bytes);
        assert_eq!(&indices[..6], &[3, 2, 0, 0, 2, 1]);
        assert_eq!(&indices[18..], &[15, 14, 12, 12, 14, 13]);
    }

    #[test]
    fn test_add_packs_corners() {
        let ctx = MockRenderContext::new();
        let mut store = SparseSet::new();
        let drawable = Drawable::from_color(Color::RED)
            .with_transform(Transform::new(Vec2::new(10.0, 20.0), Vec2::new(5.0, 5.0)));
        let id = store.push(drawable);

        let mut batch = Batch::open(&ctx, 4, 0);
        batch.add(id, store.get(id).unwrap());

        let corners: Vec<_> = batch.quad(0).unwrap().iter().map(SpriteVertex::position).collect();
        assert_eq!(
            corners,
            vec![
                Vec2::new(15.0, 25.0),
                Vec2::new(15.0, 20.0),
                Vec2::new(10.0, 20.0),
                Vec2::new(10.0, 25.0),
            ]
        );
        let quad = batch.quad(0).unwrap();
        assert_eq!(quad[0].tex_coords, [1.0, 1.0]);
        assert_eq!(quad[2].tex_coords, [0.0, 0.0]);
        assert_eq!(quad[0].color, [1.0, 0.0, 0.0, 1.0]);
        assert!(store.get(id).unwrap().is_dirty());
    }

    #[test]
    fn test_texture_slots() {
        let ctx = MockRenderContext::new();
        let tex = texture(&ctx);
        let mut store = SparseSet::new();
        let plain = store.push(Drawable::from_color(Color::WHITE));
        let sprite = store.push(textured(&tex));

        let mut batch = Batch::open(&ctx, 4, 0);
        batch.add(plain, store.get(plain).unwrap());
        batch.add(sprite, store.get(sprite).unwrap());

        assert_eq!(batch.quad(0).unwrap()[0].tex_slot, 0.0);
        assert_eq!(batch.quad(1).unwrap()[0].tex_slot, 1.0);
        assert!(batch.has_texture(&tex));
        assert_eq!(batch.slot_textures().len(), 1);
    }

    #[test]
    fn test_shared_texture_takes_one_slot() {
        let ctx = MockRenderContext::new();
        let tex = texture(&ctx);
        let mut store = SparseSet::new();
        let mut batch = Batch::open(&ctx, 4, 0);
        for _ in 0..3 {
            let id = store.push(textured(&tex));
            batch.add(id, store.get(id).unwrap());
        }
        assert_eq!(batch.slot_textures().len(), 1);
        assert_eq!(batch.quad(2).unwrap()[3].tex_slot, 1.0);
    }

    #[test]
    fn test_full_batch() {
        let ctx = MockRenderContext::new();
        let mut store = SparseSet::new();
        let mut batch = Batch::open(&ctx, 2, 0);
        for _ in 0..2 {
            let id = store.push(Drawable::from_color(Color::WHITE));
            batch.add(id, store.get(id).unwrap());
        }
        assert!(batch.is_full());
        assert!(!batch.has_room());
        assert!(!batch.accepts(&Drawable::from_color(Color::WHITE)));
    }

    #[test]
    #[should_panic(expected = "sprite batch is full")]
    fn test_add_to_full_batch_panics() {
        let ctx = MockRenderContext::new();
        let mut store = SparseSet::new();
        let mut batch = Batch::open(&ctx, 1, 0);
        for _ in 0..2 {
            let id = store.push(Drawable::from_color(Color::WHITE));
            batch.add(id, store.get(id).unwrap());
        }
    }

    #[test]
    #[should_panic(expected = "already references 8 textures")]
    fn test_ninth_texture_panics() {
        let ctx = MockRenderContext::new();
        let mut store = SparseSet::new();
        let mut batch = Batch::open(&ctx, 16, 0);
        for _ in 0..9 {
            let id = store.push(textured(&texture(&ctx)));
            batch.add(id, store.get(id).unwrap());
        }
    }

    #[test]
    fn test_refresh_and_draw_sequence() {
        let ctx = MockRenderContext::new();
        let tex = texture(&ctx);
        let mut program = ctx.program();
        let mut store = SparseSet::new();
        let id = store.push(textured(&tex));

        let mut batch = Batch::open(&ctx, 4, 0);
        batch.add(id, store.get(id).unwrap());
        ctx.clear_calls();

        let stats = batch.refresh_and_draw(&ctx, &mut store, &mut program, &Camera::default());
        assert_eq!(
            stats,
            BatchDrawStats {
                rewritten_quads: 1,
                uploaded: true,
                drawn: true,
            }
        );

        let vertex_id = batch.vertex_buffer().mock_id();
        let index_id = batch.index_buffer().mock_id();
        assert_eq!(
            ctx.calls(),
            vec![
                RenderCall::WriteBuffer {
                    buffer_id: vertex_id.unwrap(),
                    offset: 0,
                    size: 4 * 4 * 36,
                },
                RenderCall::UseProgram,
                RenderCall::UploadMat4 { name: "uProjection".into() },
                RenderCall::UploadMat4 { name: "uView".into() },
                RenderCall::UploadIntArray {
                    name: "uTextures".into(),
                    values: TEXTURE_UNITS.to_vec(),
                },
                RenderCall::BindTexture { unit: 1, texture_uid: tex.id() },
                RenderCall::DrawIndexed {
                    vertex_buffer: vertex_id,
                    index_buffer: index_id,
                    index_count: 6,
                },
                RenderCall::UnbindTexture { unit: 1 },
                RenderCall::Detach,
            ]
        );
        assert!(!store.get(id).unwrap().is_dirty());
    }

    #[test]
    fn test_second_refresh_skips_upload() {
        let ctx = MockRenderContext::new();
        let mut program = ctx.program();
        let mut store = SparseSet::new();
        let id = store.push(Drawable::from_color(Color::WHITE));
        let mut batch = Batch::open(&ctx, 4, 0);
        batch.add(id, store.get(id).unwrap());

        batch.refresh_and_draw(&ctx, &mut store, &mut program, &Camera::default());
        ctx.clear_calls();
        let stats = batch.refresh_and_draw(&ctx, &mut store, &mut program, &Camera::default());

        assert_eq!(stats.rewritten_quads, 0);
        assert!(!stats.uploaded);
        assert_eq!(ctx.count_buffer_writes(), 0);
        assert_eq!(ctx.count_draws(), 1);
    }

    #[test]
    fn test_swapped_visual_gets_new_slot() {
        let ctx = MockRenderContext::new();
        let mut program = ctx.program();
        let first = texture(&ctx);
        let second = texture(&ctx);
        let mut store = SparseSet::new();
        let id = store.push(textured(&first));
        let mut batch = Batch::open(&ctx, 4, 0);
        batch.add(id, store.get(id).unwrap());

        store.get_mut(id).unwrap().set_visual(QuadVisual::new(second.clone()));
        batch.refresh_and_draw(&ctx, &mut store, &mut program, &Camera::default());

        assert_eq!(batch.slot_of(Some(&second)), Some(2));
        assert_eq!(batch.quad(0).unwrap()[0].tex_slot, 2.0);
    }

    /// Eight textured members fill every slot, then member 0 swaps to a ninth texture.
    fn batch_with_swapped_ninth_texture(
        ctx: &MockRenderContext,
    ) -> (Batch, SparseSet<Drawable>, DrawableId) {
        let mut store = SparseSet::new();
        let mut batch = Batch::open(ctx, 16, 0);
        let mut first = None;
        for _ in 0..MAX_TEXTURE_SLOTS {
            let id = store.push(textured(&texture(ctx)));
            batch.add(id, store.get(id).unwrap());
            first.get_or_insert(id);
        }
        let id = first.unwrap();
        assert!(!batch.has_texture_room());

        store.get_mut(id).unwrap().set_visual(QuadVisual::new(texture(ctx)));
        (batch, store, id)
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "replaced visual has no free slot")]
    fn test_swapped_ninth_texture_panics_in_debug() {
        let ctx = MockRenderContext::new();
        let mut program = ctx.program();
        let (mut batch, mut store, _) = batch_with_swapped_ninth_texture(&ctx);

        batch.refresh_and_draw(&ctx, &mut store, &mut program, &Camera::default());
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_swapped_ninth_texture_draws_untextured_in_release() {
        let ctx = MockRenderContext::new();
        let mut program = ctx.program();
        let (mut batch, mut store, _) = batch_with_swapped_ninth_texture(&ctx);

        let stats = batch.refresh_and_draw(&ctx, &mut store, &mut program, &Camera::default());
        assert!(stats.drawn);
        assert_eq!(batch.slot_textures().len(), MAX_TEXTURE_SLOTS);
        assert_eq!(batch.quad(0).unwrap()[0].tex_slot, 0.0);
    }

    #[test]
    fn test_missing_member_quad_is_cleared() {
        let ctx = MockRenderContext::new();
        let mut program = ctx.program();
        let mut store = SparseSet::new();
        let kept = store.push(Drawable::from_color(Color::WHITE));
        let gone = store.push(
            Drawable::from_color(Color::RED)
                .with_transform(Transform::new(Vec2::new(10.0, 10.0), Vec2::new(4.0, 4.0))),
        );
        let mut batch = Batch::open(&ctx, 4, 0);
        batch.add(kept, store.get(kept).unwrap());
        batch.add(gone, store.get(gone).unwrap());
        batch.refresh_and_draw(&ctx, &mut store, &mut program, &Camera::default());
        store.remove(gone);

        let stats = batch.refresh_and_draw(&ctx, &mut store, &mut program, &Camera::default());
        assert_eq!(stats.rewritten_quads, 0);
        assert!(stats.uploaded);
        assert!(stats.drawn);
        assert!(batch.quad(1).unwrap().iter().all(|v| *v == SpriteVertex::default()));
        assert_ne!(batch.quad(0).unwrap()[0], SpriteVertex::default());

        ctx.clear_calls();
        let stats = batch.refresh_and_draw(&ctx, &mut store, &mut program, &Camera::default());
        assert!(!stats.uploaded);
        assert_eq!(ctx.count_buffer_writes(), 0);
    }
}

//! Batch set behaviour against the mock backend.

use glam::Vec2;
use tessera_core::alloc::SparseSet;
use tessera_render::{
    BatchSet, Camera, Color, Drawable, MAX_TEXTURE_SLOTS, QuadVisual, RendererConfig, Texture,
    Transform,
};
use tessera_test_utils::MockRenderContext;

fn texture(ctx: &MockRenderContext) -> Texture {
    Texture::from_rgba8(ctx, Some("test"), 2, 2, &[255; 16]).unwrap()
}

#[test]
fn test_batches_respect_capacity_and_texture_limit() {
    let ctx = MockRenderContext::new();
    let mut store = SparseSet::new();
    let mut set = BatchSet::new(RendererConfig { batch_capacity: 5 });
    let textures: Vec<_> = (0..20).map(|_| texture(&ctx)).collect();

    for (i, tex) in textures.iter().enumerate() {
        let drawable = if i % 3 == 0 {
            Drawable::from_color(Color::BLUE)
        } else {
            Drawable::from_visual(QuadVisual::new(tex.clone()))
        };
        let id = store.push(drawable);
        assert!(set.add(&ctx, &store, id, (i % 2) as i32));
    }

    let total: usize = set.batches().iter().map(|batch| batch.len()).sum();
    assert_eq!(total, 20);
    for batch in set.batches() {
        assert!(batch.len() <= 5);
        assert!(batch.slot_textures().len() <= MAX_TEXTURE_SLOTS);
    }
}

#[test]
fn test_texture_slots_split_batches_before_capacity() {
    let ctx = MockRenderContext::new();
    let mut store = SparseSet::new();
    let mut set = BatchSet::new(RendererConfig { batch_capacity: 16 });

    for _ in 0..20 {
        let id = store.push(Drawable::from_visual(QuadVisual::new(texture(&ctx))));
        assert!(set.add(&ctx, &store, id, 0));
    }
    // Untextured quads still fit into a batch whose slots are exhausted.
    for _ in 0..4 {
        let id = store.push(Drawable::from_color(Color::GREEN));
        assert!(set.add(&ctx, &store, id, 0));
    }

    let lens: Vec<_> = set.batches().iter().map(|batch| batch.len()).collect();
    let slots: Vec<_> = set
        .batches()
        .iter()
        .map(|batch| batch.slot_textures().len())
        .collect();
    assert_eq!(lens, vec![12, 8, 4]);
    assert_eq!(slots, vec![8, 8, 4]);
    for batch in set.batches() {
        assert!(batch.len() <= 16);
        assert!(batch.slot_textures().len() <= MAX_TEXTURE_SLOTS);
    }
}

#[test]
fn test_depth_order_drives_draw_order() {
    let ctx = MockRenderContext::new();
    let mut program = ctx.program();
    let mut store = SparseSet::new();
    let mut set = BatchSet::default();

    for depth in [3, 1, 2] {
        let id = store.push(Drawable::from_color(Color::WHITE));
        set.add(&ctx, &store, id, depth);
    }

    let depths: Vec<_> = set.batches().iter().map(|batch| batch.depth()).collect();
    assert_eq!(depths, vec![1, 2, 3]);

    let stats = set.render_all(&ctx, &mut store, &mut program, &Camera::default());
    assert_eq!(stats.draw_calls, 3);

    let drawn: Vec<_> = ctx.draws().into_iter().map(|(vertex, _)| vertex).collect();
    let expected: Vec<_> = set
        .batches()
        .iter()
        .map(|batch| batch.vertex_buffer().mock_id())
        .collect();
    assert_eq!(drawn, expected);
}

#[test]
fn test_equal_depth_batches_keep_creation_order() {
    let ctx = MockRenderContext::new();
    let mut store = SparseSet::new();
    let mut set = BatchSet::new(RendererConfig { batch_capacity: 1 });

    let first = store.push(Drawable::from_color(Color::WHITE));
    let second = store.push(Drawable::from_color(Color::WHITE));
    let lower = store.push(Drawable::from_color(Color::WHITE));
    set.add(&ctx, &store, first, 4);
    set.add(&ctx, &store, second, 4);
    set.add(&ctx, &store, lower, 0);

    let members: Vec<_> = set.batches().iter().map(|batch| batch.members()[0]).collect();
    assert_eq!(members, vec![lower, first, second]);
}

#[test]
fn test_texture_slot_assignment() {
    let ctx = MockRenderContext::new();
    let mut store = SparseSet::new();
    let mut set = BatchSet::default();
    let textures: Vec<_> = (0..9).map(|_| texture(&ctx)).collect();

    let plain = store.push(Drawable::from_color(Color::GREEN));
    set.add(&ctx, &store, plain, 0);
    for tex in &textures {
        let id = store.push(Drawable::from_visual(QuadVisual::new(tex.clone())));
        set.add(&ctx, &store, id, 0);
    }

    assert_eq!(set.len(), 2);
    let first = &set.batches()[0];
    assert_eq!(first.vertices()[0].tex_slot, 0.0);
    assert_eq!(first.quad(1).unwrap()[0].tex_slot, 1.0);
    assert_eq!(first.slot_of(Some(&textures[0])), Some(1));
    assert_eq!(first.slot_textures().len(), 8);

    let overflow = &set.batches()[1];
    assert_eq!(overflow.len(), 1);
    assert_eq!(overflow.slot_of(Some(&textures[8])), Some(1));
}

#[test]
fn test_color_change_rewrites_one_quad() {
    let ctx = MockRenderContext::new();
    let mut program = ctx.program();
    let mut store = SparseSet::new();
    let mut set = BatchSet::default();

    let ids: Vec<_> = (0..4)
        .map(|i| {
            let transform = Transform::new(Vec2::new(i as f32 * 32.0, 0.0), Vec2::splat(32.0));
            let id = store.push(Drawable::from_color(Color::WHITE).with_transform(transform));
            set.add(&ctx, &store, id, 1);
            id
        })
        .collect();

    let first = set.render_all(&ctx, &mut store, &mut program, &Camera::default());
    assert_eq!(first.rewritten_quads, 4);
    assert_eq!(first.vertex_uploads, 1);

    store.get_mut(ids[2]).unwrap().set_color(Color::RED);
    assert!(store.get(ids[2]).unwrap().is_dirty());

    ctx.clear_calls();
    let second = set.render_all(&ctx, &mut store, &mut program, &Camera::default());
    assert_eq!(second.rewritten_quads, 1);
    assert_eq!(second.vertex_uploads, 1);
    assert_eq!(ctx.count_buffer_writes(), 1);
    assert_eq!(set.batches()[0].quad(2).unwrap()[0].color, [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(set.batches()[0].quad(1).unwrap()[0].color, [1.0; 4]);

    ctx.clear_calls();
    let third = set.render_all(&ctx, &mut store, &mut program, &Camera::default());
    assert_eq!(third.rewritten_quads, 0);
    assert_eq!(third.vertex_uploads, 0);
    assert_eq!(ctx.count_buffer_writes(), 0);
    assert_eq!(ctx.count_draws(), 1);
}

#[test]
fn test_uploaded_bytes_match_packed_vertices() {
    let ctx = MockRenderContext::new();
    let mut program = ctx.program();
    let mut store = SparseSet::new();
    let mut set = BatchSet::default();

    let drawable = Drawable::from_color(Color::RED)
        .with_transform(Transform::new(Vec2::new(10.0, 20.0), Vec2::new(5.0, 5.0)));
    let id = store.push(drawable);
    set.add(&ctx, &store, id, 0);
    set.render_all(&ctx, &mut store, &mut program, &Camera::default());

    let batch = &set.batches()[0];
    let bytes = ctx
        .buffer_contents(batch.vertex_buffer().mock_id().unwrap())
        .unwrap();
    let floats: Vec<f32> = bytemuck::pod_collect_to_vec(&bytes);
    assert_eq!(&floats[..9], &[15.0, 25.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0]);
    assert_eq!(&floats[27..29], &[10.0, 25.0]);
}

#[test]
fn test_empty_set_draws_nothing() {
    let ctx = MockRenderContext::new();
    let mut program = ctx.program();
    let mut store: SparseSet<Drawable> = SparseSet::new();
    let mut set = BatchSet::default();

    let stats = set.render_all(&ctx, &mut store, &mut program, &Camera::default());
    assert_eq!(stats.batches, 0);
    assert_eq!(ctx.call_count(), 0);
}

//! Sprite vertex format and the shared quad index pattern.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Floats per packed vertex.
pub const VERTEX_FLOATS: usize = 9;
/// Vertices per quad.
pub const VERTICES_PER_QUAD: usize = 4;
/// Indices per quad (two triangles).
pub const INDICES_PER_QUAD: usize = 6;

/// Per-corner offset flags, in top-right, bottom-right, bottom-left, top-left order.
pub const CORNER_FLAGS: [Vec2; 4] = [
    Vec2::new(1.0, 1.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(0.0, 0.0),
    Vec2::new(0.0, 1.0),
];

/// One packed sprite vertex: `[pos_x, pos_y, r, g, b, a, u, v, tex_slot]`.
///
/// `tex_slot` is 0 for untextured quads and `1..=8` for bound textures. It is
/// stored as a float to keep the layout a flat run of 9 floats.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
    pub tex_coords: [f32; 2],
    pub tex_slot: f32,
}

static_assertions::const_assert_eq!(
    std::mem::size_of::<SpriteVertex>(),
    VERTEX_FLOATS * std::mem::size_of::<f32>()
);

impl SpriteVertex {
    pub const SIZE: wgpu::BufferAddress = std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress;

    pub fn position(&self) -> Vec2 {
        Vec2::from_array(self.position)
    }

    /// Vertex buffer layout matching the sprite shader inputs.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRS: &[wgpu::VertexAttribute] = &wgpu::vertex_attr_array![
            // position (vec2)
            0 => Float32x2,
            // color (vec4)
            1 => Float32x4,
            // tex_coords (vec2)
            2 => Float32x2,
            // tex_slot (f32)
            3 => Float32,
        ];

        wgpu::VertexBufferLayout {
            array_stride: Self::SIZE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: ATTRS,
        }
    }
}

/// Index buffer contents for `quads` quads: `{4q+3, 4q+2, 4q, 4q, 4q+2, 4q+1}` per quad.
pub fn quad_indices(quads: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(quads * INDICES_PER_QUAD);
    for q in 0..quads as u32 {
        let base = q * VERTICES_PER_QUAD as u32;
        indices.extend_from_slice(&[base + 3, base + 2, base, base, base + 2, base + 1]);
    }
    indices
}

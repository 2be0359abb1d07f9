//! Quad visuals: the texture and per-corner texture coordinates a drawable samples.

use glam::Vec2;

use crate::texture::Texture;

/// Unit-square texture coordinates in corner order
/// top-right, bottom-right, bottom-left, top-left.
pub const UNIT_TEX_COORDS: [Vec2; 4] = [
    Vec2::new(1.0, 1.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(0.0, 0.0),
    Vec2::new(0.0, 1.0),
];

/// Static shape description of a quad: an optional texture and one texture
/// coordinate per corner.
///
/// Immutable once built. Cloning is cheap, so many drawables can share the
/// same visual (for example tiles cut from one sprite sheet).
#[derive(Debug, Clone, PartialEq)]
pub struct QuadVisual {
    texture: Option<Texture>,
    tex_coords: [Vec2; 4],
}

impl QuadVisual {
    /// Flat-colored quad with no texture.
    pub fn untextured() -> Self {
        Self {
            texture: None,
            tex_coords: UNIT_TEX_COORDS,
        }
    }

    /// Whole texture mapped onto the quad.
    pub fn new(texture: Texture) -> Self {
        Self {
            texture: Some(texture),
            tex_coords: UNIT_TEX_COORDS,
        }
    }

    /// Sub-region of a texture, coordinates in top-right, bottom-right,
    /// bottom-left, top-left order.
    pub fn with_tex_coords(texture: Option<Texture>, tex_coords: [Vec2; 4]) -> Self {
        Self {
            texture,
            tex_coords,
        }
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    pub fn tex_coords(&self) -> &[Vec2; 4] {
        &self.tex_coords
    }
}

impl Default for QuadVisual {
    fn default() -> Self {
        Self::untextured()
    }
}

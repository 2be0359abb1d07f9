//! Sprite sheets: one texture cut into a grid of equally sized quad visuals.

use glam::Vec2;

use crate::texture::Texture;
use crate::visual::QuadVisual;

/// Grid layout of a sprite sheet, in texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteSheetDescriptor {
    pub sprite_width: u32,
    pub sprite_height: u32,
    /// Number of sprites to cut, counted left to right, top to bottom.
    pub count: u32,
    /// Gap between neighbouring sprites on both axes.
    pub spacing: u32,
}

impl Default for SpriteSheetDescriptor {
    fn default() -> Self {
        Self {
            sprite_width: 16,
            sprite_height: 16,
            count: 1,
            spacing: 0,
        }
    }
}

/// A texture sliced into [`QuadVisual`]s.
///
/// Sprites are cut row by row starting at the top-left of the image. Texture
/// coordinates have `v = 1` at the top edge of the image, matching the
/// top-right, bottom-right, bottom-left, top-left corner order of a quad.
///
/// ```
/// # use tessera_render::{SpriteSheet, SpriteSheetDescriptor, Texture};
/// # fn sheet(texture: Texture) {
/// let sheet = SpriteSheet::new(
///     texture,
///     SpriteSheetDescriptor {
///         sprite_width: 16,
///         sprite_height: 16,
///         count: 26,
///         spacing: 0,
///     },
/// );
/// let goomba = sheet.sprite(14).cloned();
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    texture: Texture,
    descriptor: SpriteSheetDescriptor,
    sprites: Vec<QuadVisual>,
}

impl SpriteSheet {
    /// Slice `texture`. Cells that would fall outside the texture are not
    /// produced, so [`SpriteSheet::len`] can be less than `descriptor.count`.
    ///
    /// # Panics
    /// Panics if the sprite width or height is zero.
    pub fn new(texture: Texture, descriptor: SpriteSheetDescriptor) -> Self {
        assert!(
            descriptor.sprite_width > 0 && descriptor.sprite_height > 0,
            "sprite size must be non-zero"
        );

        let (width, height) = texture.size();
        let (tex_w, tex_h) = (width as f32, height as f32);
        let sprite_w = descriptor.sprite_width as i64;
        let sprite_h = descriptor.sprite_height as i64;
        let spacing = descriptor.spacing as i64;

        let mut sprites = Vec::with_capacity(descriptor.count as usize);
        let mut x: i64 = 0;
        let mut y: i64 = height as i64 - sprite_h;

        while sprites.len() < descriptor.count as usize && y >= 0 {
            if x + sprite_w > width as i64 {
                if x == 0 {
                    // Not even one column fits.
                    break;
                }
                x = 0;
                y -= sprite_h + spacing;
                continue;
            }

            let left = x as f32 / tex_w;
            let right = (x + sprite_w) as f32 / tex_w;
            let bottom = y as f32 / tex_h;
            let top = (y + sprite_h) as f32 / tex_h;

            sprites.push(QuadVisual::with_tex_coords(
                Some(texture.clone()),
                [
                    Vec2::new(right, top),
                    Vec2::new(right, bottom),
                    Vec2::new(left, bottom),
                    Vec2::new(left, top),
                ],
            ));

            x += sprite_w + spacing;
        }

        if sprites.len() < descriptor.count as usize {
            tracing::warn!(
                requested = descriptor.count,
                produced = sprites.len(),
                "sprite sheet texture too small for requested sprite count"
            );
        }

        Self {
            texture,
            descriptor,
            sprites,
        }
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn descriptor(&self) -> &SpriteSheetDescriptor {
        &self.descriptor
    }

    pub fn sprite(&self, index: usize) -> Option<&QuadVisual> {
        self.sprites.get(index)
    }

    pub fn sprites(&self) -> &[QuadVisual] {
        &self.sprites
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

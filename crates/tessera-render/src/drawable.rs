//! Per-entity draw state.

use glam::{Vec2, Vec4};
use tessera_core::alloc::{IndexSlot, SparseSet};

use crate::color::Color;
use crate::visual::QuadVisual;

/// Key a batch uses to find a drawable again at refresh time.
pub type DrawableId = IndexSlot;

/// Position and scale of a quad. Corners are `position + flag * scale` with
/// `flag` in `{0, 1}` per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub scale: Vec2,
}

impl Transform {
    pub const fn new(position: Vec2, scale: Vec2) -> Self {
        Self { position, scale }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            scale: Vec2::ONE,
        }
    }
}

/// Tint, visual and transform of one quad, plus the dirty flag the owning
/// batch checks before re-packing vertices.
#[derive(Debug, Clone)]
pub struct Drawable {
    color: Vec4,
    visual: QuadVisual,
    transform: Transform,
    dirty: bool,
}

impl Drawable {
    /// Untextured quad with the given tint.
    pub fn from_color(color: impl Into<Vec4>) -> Self {
        Self::new(color.into(), QuadVisual::untextured())
    }

    /// Given visual with a white tint.
    pub fn from_visual(visual: QuadVisual) -> Self {
        Self::new(Color::WHITE.to_vec4(), visual)
    }

    pub fn new(color: Vec4, visual: QuadVisual) -> Self {
        Self {
            color,
            visual,
            transform: Transform::default(),
            dirty: true,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self.dirty = true;
        self
    }

    pub fn color(&self) -> Vec4 {
        self.color
    }

    pub fn visual(&self) -> &QuadVisual {
        &self.visual
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Always marks the drawable dirty, even when `color` equals the current
    /// tint. Compare first if redundant re-uploads matter.
    pub fn set_color(&mut self, color: impl Into<Vec4>) {
        self.color = color.into();
        self.dirty = true;
    }

    /// Always marks the drawable dirty, like [`Drawable::set_color`].
    pub fn set_visual(&mut self, visual: QuadVisual) {
        self.visual = visual;
        self.dirty = true;
    }

    /// Copies the owner's transform. Only an actual change marks the drawable dirty.
    pub fn set_transform(&mut self, transform: Transform) {
        if self.transform != transform {
            self.transform = transform;
            self.dirty = true;
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

/// Lookup from [`DrawableId`] to the drawable it names.
///
/// Batches never own drawables; they resolve their members through a store
/// on every refresh.
pub trait DrawableStore {
    fn drawable(&self, id: DrawableId) -> Option<&Drawable>;
    fn drawable_mut(&mut self, id: DrawableId) -> Option<&mut Drawable>;
}

impl DrawableStore for SparseSet<Drawable> {
    fn drawable(&self, id: DrawableId) -> Option<&Drawable> {
        self.get(id)
    }

    fn drawable_mut(&mut self, id: DrawableId) -> Option<&mut Drawable> {
        self.get_mut(id)
    }
}

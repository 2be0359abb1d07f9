use tessera_core::alloc::IndexSlot;
use tessera_render::{Drawable, Transform};

use crate::component::{Component, EntityCtx};

/// Stable handle to an entity in a [`Scene`](crate::Scene). It also keys the
/// entity's drawable inside the scene's batches.
pub type EntityId = IndexSlot;

/// A named object with a transform, a fixed depth and an optional drawable.
pub struct Entity {
    name: String,
    transform: Transform,
    depth: i32,
    drawable: Option<Drawable>,
    components: Vec<Box<dyn Component>>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_transform(name, Transform::default(), 0)
    }

    pub fn with_transform(name: impl Into<String>, transform: Transform, depth: i32) -> Self {
        Self {
            name: name.into(),
            transform,
            depth,
            drawable: None,
            components: Vec::new(),
        }
    }

    /// Attach a drawable. Its transform is replaced by the entity's.
    pub fn with_drawable(mut self, drawable: Drawable) -> Self {
        self.drawable = Some(drawable.with_transform(self.transform));
        self
    }

    pub fn with_component(mut self, component: impl Component + 'static) -> Self {
        self.components.push(Box::new(component));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn drawable(&self) -> Option<&Drawable> {
        self.drawable.as_ref()
    }

    pub fn drawable_mut(&mut self) -> Option<&mut Drawable> {
        self.drawable.as_mut()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub(crate) fn start(&mut self) {
        let mut ctx = EntityCtx {
            name: &self.name,
            depth: self.depth,
            transform: &mut self.transform,
            drawable: self.drawable.as_mut(),
        };
        for component in &mut self.components {
            component.on_start(&mut ctx);
        }
        self.sync_drawable();
    }

    pub(crate) fn update(&mut self, dt: f32) {
        let mut ctx = EntityCtx {
            name: &self.name,
            depth: self.depth,
            transform: &mut self.transform,
            drawable: self.drawable.as_mut(),
        };
        for component in &mut self.components {
            component.on_update(&mut ctx, dt);
        }
        self.sync_drawable();
    }

    /// Copy the transform into the drawable; only a changed transform marks it dirty.
    fn sync_drawable(&mut self) {
        if let Some(drawable) = self.drawable.as_mut() {
            drawable.set_transform(self.transform);
        }
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("name", &self.name)
            .field("transform", &self.transform)
            .field("depth", &self.depth)
            .field("drawable", &self.drawable)
            .field("components", &self.components.len())
            .finish()
    }
}

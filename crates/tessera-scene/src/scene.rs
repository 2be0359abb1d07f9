use std::sync::Arc;

use glam::Vec2;
use tessera_core::alloc::SparseSet;
use tessera_core::profiling::profile_function;
use tessera_render::{
    BatchSet, Camera, Drawable, DrawableId, DrawableStore, FrameStats, RendererConfig,
    camera::DEFAULT_VIEWPORT,
};
use tessera_test_utils::{RenderContext, ShaderProgram};

use crate::entity::{Entity, EntityId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    pub renderer: RendererConfig,
    pub camera_position: Vec2,
    pub camera_viewport: Vec2,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            renderer: RendererConfig::default(),
            camera_position: Vec2::ZERO,
            camera_viewport: DEFAULT_VIEWPORT,
        }
    }
}

/// Entity table. Entity ids double as drawable ids in the batch set.
struct Entities(SparseSet<Entity>);

impl DrawableStore for Entities {
    fn drawable(&self, id: DrawableId) -> Option<&Drawable> {
        self.0.get(id).and_then(Entity::drawable)
    }

    fn drawable_mut(&mut self, id: DrawableId) -> Option<&mut Drawable> {
        self.0.get_mut(id).and_then(Entity::drawable_mut)
    }
}

/// Owns entities, the camera and the batches that draw them.
pub struct Scene {
    ctx: Arc<dyn RenderContext>,
    entities: Entities,
    batches: BatchSet,
    camera: Camera,
    running: bool,
}

impl Scene {
    pub fn new(ctx: Arc<dyn RenderContext>, config: SceneConfig) -> Self {
        Self {
            ctx,
            entities: Entities(SparseSet::new()),
            batches: BatchSet::new(config.renderer),
            camera: Camera::with_viewport(config.camera_position, config.camera_viewport),
            running: false,
        }
    }

    /// Add an entity. In a running scene it is started and packed right away.
    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        let depth = entity.depth();
        let id = self.entities.0.push(entity);
        if self.running {
            self.activate(id, depth);
        }
        id
    }

    /// Start every entity and hand its drawable to the batches.
    pub fn start(&mut self) {
        if self.running {
            tracing::warn!("scene already started");
            return;
        }
        for id in self.entities.0.keys() {
            let Some(depth) = self.entities.0.get(id).map(Entity::depth) else {
                continue;
            };
            self.activate(id, depth);
        }
        self.running = true;
        tracing::debug!(
            entities = self.entities.0.len(),
            batches = self.batches.len(),
            "scene started"
        );
    }

    fn activate(&mut self, id: EntityId, depth: i32) {
        if let Some(entity) = self.entities.0.get_mut(id) {
            entity.start();
        }
        self.batches.add(self.ctx.as_ref(), &self.entities, id, depth);
    }

    /// Run every component, then copy transforms into drawables.
    pub fn update(&mut self, dt: f32) {
        profile_function!();
        for (_, entity) in self.entities.0.iter_mut() {
            entity.update(dt);
        }
    }

    /// Draw every batch, lowest depth first.
    pub fn render(&mut self, program: &mut dyn ShaderProgram) -> FrameStats {
        self.batches
            .render_all(self.ctx.as_ref(), &mut self.entities, program, &self.camera)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.0.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.0.get_mut(id)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.0.len()
    }

    pub fn batches(&self) -> &BatchSet {
        &self.batches
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }
}

use tessera_render::{Drawable, Transform};

/// The parts of an entity a component may touch.
pub struct EntityCtx<'a> {
    pub name: &'a str,
    pub depth: i32,
    pub transform: &'a mut Transform,
    pub drawable: Option<&'a mut Drawable>,
}

/// Behaviour attached to an entity.
pub trait Component {
    /// Called once when the entity joins a running scene, or when the scene starts.
    #[allow(unused_variables)]
    fn on_start(&mut self, ctx: &mut EntityCtx) {}

    /// Called once per [`Scene::update`](crate::Scene::update). `dt` is in seconds.
    fn on_update(&mut self, ctx: &mut EntityCtx, dt: f32);
}

impl<F> Component for F
where
    F: FnMut(&mut EntityCtx, f32),
{
    fn on_update(&mut self, ctx: &mut EntityCtx, dt: f32) {
        self(ctx, dt)
    }
}

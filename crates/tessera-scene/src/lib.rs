//! Scene lifecycle on top of the sprite batcher.
//!
//! A [`Scene`] owns its [`Entity`]s, starts them, runs their
//! [`Component`]s every frame and hands their drawables to a
//! [`BatchSet`](tessera_render::BatchSet).

pub mod component;
pub mod entity;
pub mod scene;

pub use component::{Component, EntityCtx};
pub use entity::{Entity, EntityId};
pub use scene::{Scene, SceneConfig};

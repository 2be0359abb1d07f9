//! Tessera - batched 2D sprite rendering
//!
//! Tessera draws large numbers of textured or flat-colored quads with as few
//! GPU draw calls as possible:
//!
//! - **Batching**: quads sharing a depth and up to eight textures are packed
//!   into one vertex buffer and drawn with a single indexed draw
//! - **Change tracking**: only drawables whose color, visual or transform
//!   changed are re-packed, and each batch uploads at most once per frame
//! - **Scenes**: entities with components, started and fed to the batcher
//! - **Windowing**: an explicit application context around winit
//!
//! # Quick Start
//!
//! ```ignore
//! use tessera::prelude::*;
//!
//! struct Game {
//!     window: RenderableWindow,
//!     program: SpriteProgram,
//!     scene: Scene,
//! }
//!
//! impl App for Game {
//!     fn render(&mut self, _ctx: &mut AppCtx, _id: WindowId, _events: &mut EventBatch) {
//!         self.scene.render(&mut self.program);
//!         let Ok(mut frame) = self.window.begin_frame() else { return };
//!         let mut pass = frame.render_pass(Color::BLACK);
//!         self.program.flush(&mut pass);
//!     }
//! }
//! ```
//!
//! See `examples/level_editor.rs` for a complete program.

pub use tessera_core as core;
pub use tessera_core::math;

#[cfg(feature = "winit")]
pub use tessera_winit as winit;
#[cfg(feature = "winit")]
pub use tessera_winit::{
    FrameTime, WindowId,
    app::{App, AppCtx, AppFactory, run_app},
    event::{Event, EventBatch, HandleStatus},
    input::KeyboardState,
    window::{Window, WindowDescriptor},
};

#[cfg(feature = "render")]
pub use tessera_render as render;

#[cfg(feature = "scene")]
pub use tessera_scene as scene;

/// Prelude module for convenient imports
pub mod prelude {
    pub use tessera_core::math::{Mat4, Vec2, Vec3, Vec4};

    #[cfg(feature = "winit")]
    pub use tessera_winit::{
        FrameTime, WindowId,
        app::{App, AppCtx, run_app},
        event::{Event, EventBatch, HandleStatus, KeyCode},
        input::KeyboardState,
        window::{Window, WindowDescriptor},
    };

    #[cfg(feature = "render")]
    pub use tessera_render::{
        BatchSet, Camera, Color, Drawable, Frame, GraphicsContext, QuadVisual, RenderContext,
        RenderableWindow, RendererConfig, SpriteProgram, SpriteSheet, SpriteSheetDescriptor,
        Texture, Transform,
    };

    #[cfg(feature = "scene")]
    pub use tessera_scene::{Component, Entity, EntityCtx, EntityId, Scene, SceneConfig};
}

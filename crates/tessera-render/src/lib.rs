//! Depth- and texture-aware sprite batching.
//!
//! Quads are collected into [`Batch`]es that share a depth and at most
//! [`MAX_TEXTURE_SLOTS`] textures. A [`BatchSet`] routes every drawable to a
//! batch and draws the batches back to front. GPU access goes through the
//! [`RenderContext`] and [`ShaderProgram`] seams, so batching runs unchanged
//! against the mock backend in tests.

pub mod batch;
pub mod batch_set;
pub mod camera;
pub mod color;
pub mod context;
mod context_impl;
pub mod drawable;
pub mod frame;
pub mod program;
pub mod sprite;
pub mod texture;
pub mod vertex;
pub mod visual;
pub mod window;

pub use batch::{Batch, BatchDrawStats, MAX_TEXTURE_SLOTS, TEXTURE_UNITS};
pub use batch_set::{BatchSet, DEFAULT_BATCH_CAPACITY, FrameStats, RendererConfig};
pub use camera::Camera;
pub use color::Color;
pub use context::{GraphicsContext, GraphicsContextDescriptor, GraphicsError, GraphicsResult};
pub use drawable::{Drawable, DrawableId, DrawableStore, Transform};
pub use frame::{ClearOp, Frame};
pub use program::SpriteProgram;
pub use sprite::{SpriteSheet, SpriteSheetDescriptor};
pub use texture::{Texture, TextureError, TextureResult};
pub use vertex::SpriteVertex;
pub use visual::QuadVisual;
pub use window::{RenderableWindow, WindowContextDescriptor};

pub use tessera_test_utils::{GpuBuffer, GpuTexture, RenderContext, ShaderProgram};

pub use wgpu;

//! Test utilities for Tessera.
//!
//! The sprite batcher never talks to `wgpu` directly. It goes through two
//! seams defined here:
//!
//! - [`RenderContext`]: resource creation and uploads (buffers, textures)
//! - [`ShaderProgram`]: the compiled sprite program (uniforms, texture units, draws)
//!
//! The real implementations live in `tessera-render`. With the `mock` feature
//! this crate also provides `MockRenderContext` and `MockShaderProgram`, which
//! record every call into a shared, ordered log so tests can assert on uploads
//! and draw order without a GPU.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "mock")]
//! # {
//! use tessera_test_utils::{MockRenderContext, RenderContext};
//! use wgpu::*;
//!
//! let mock = MockRenderContext::new();
//! let buffer = mock.create_buffer(&BufferDescriptor {
//!     label: Some("vertices"),
//!     size: 1024,
//!     usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
//!     mapped_at_creation: false,
//! });
//! mock.write_buffer(&buffer, 0, &[0u8; 64]);
//!
//! assert!(buffer.is_mock());
//! assert_eq!(mock.count_buffer_writes(), 1);
//! # }
//! ```

pub mod gpu_types;
#[cfg(feature = "mock")]
pub mod mock_render;
pub mod render_context;
pub mod shader_program;

pub use gpu_types::*;
#[cfg(feature = "mock")]
pub use mock_render::*;
pub use render_context::*;
pub use shader_program::*;

//! Trait abstracting GPU resource creation and uploads.

use crate::gpu_types::*;
use wgpu::{BufferDescriptor, Extent3d, TexelCopyBufferLayout, TextureDescriptor};

/// GPU resource creation and upload operations used by the sprite batcher.
///
/// Methods take `&self` and return owned wrapper types, so one context can be
/// shared (via `Arc`) by every batch and the mock can record calls through
/// interior mutability. The trait is object-safe.
///
/// ```rust,no_run
/// use tessera_test_utils::RenderContext;
/// use wgpu::{BufferDescriptor, BufferUsages};
///
/// fn upload_quad(ctx: &dyn RenderContext, vertices: &[u8]) {
///     let buffer = ctx.create_buffer(&BufferDescriptor {
///         label: Some("quad"),
///         size: vertices.len() as u64,
///         usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
///         mapped_at_creation: false,
///     });
///     ctx.write_buffer(&buffer, 0, vertices);
/// }
/// ```
pub trait RenderContext: Send + Sync {
    /// Create a GPU buffer.
    fn create_buffer(&self, desc: &BufferDescriptor) -> GpuBuffer;

    /// Write data to a buffer. Maps to `queue.write_buffer()` on a real device.
    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]);

    /// Create a GPU texture.
    fn create_texture(&self, desc: &TextureDescriptor) -> GpuTexture;

    /// Upload texel data into mip level 0 of `texture`.
    fn write_texture(
        &self,
        texture: &GpuTexture,
        data: &[u8],
        layout: TexelCopyBufferLayout,
        size: Extent3d,
    );
}

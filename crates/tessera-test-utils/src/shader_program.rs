//! Trait abstracting a compiled sprite shader program.

use crate::gpu_types::{GpuBuffer, GpuTexture};

/// Uniform name of the camera projection matrix.
pub const PROJECTION_UNIFORM: &str = "uProjection";
/// Uniform name of the camera view matrix.
pub const VIEW_UNIFORM: &str = "uView";
/// Uniform name of the texture-slot to sampler-unit mapping.
pub const TEXTURES_UNIFORM: &str = "uTextures";

/// A compiled shader program the batcher draws with.
///
/// Calls arrive in the order a batch issues them: `use_program`, uniform
/// uploads, texture binds, one `draw_indexed`, texture unbinds, `detach`.
/// Matrices are column-major (`glam::Mat4::to_cols_array_2d` layout).
pub trait ShaderProgram {
    /// Make this program current.
    fn use_program(&mut self);

    /// Upload a 4x4 matrix uniform.
    fn upload_mat4(&mut self, name: &str, value: &[[f32; 4]; 4]);

    /// Upload an integer array uniform.
    fn upload_int_array(&mut self, name: &str, values: &[i32]);

    /// Bind `texture` to texture unit `unit`.
    fn bind_texture(&mut self, unit: u32, texture: &GpuTexture);

    /// Release texture unit `unit`.
    fn unbind_texture(&mut self, unit: u32);

    /// Draw `index_count` indices from `index_buffer` over `vertex_buffer`.
    fn draw_indexed(&mut self, vertex_buffer: &GpuBuffer, index_buffer: &GpuBuffer, index_count: u32);

    /// Stop using this program.
    fn detach(&mut self);
}

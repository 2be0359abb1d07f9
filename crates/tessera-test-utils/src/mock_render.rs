//! Recording mocks for [`RenderContext`] and [`ShaderProgram`].
//!
//! A context and the programs created from it share one ordered call log, so
//! tests can check both what was uploaded and in which order draws happened.

use crate::{
    gpu_types::*, render_context::RenderContext, shader_program::ShaderProgram,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use wgpu::*;

/// Records a GPU operation for verification in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    CreateBuffer {
        buffer_id: usize,
        size: u64,
        usage: BufferUsages,
    },
    WriteBuffer {
        buffer_id: usize,
        offset: u64,
        size: usize,
    },
    CreateTexture {
        texture_id: usize,
        width: u32,
        height: u32,
        format: TextureFormat,
    },
    WriteTexture {
        texture_id: usize,
        size: usize,
    },
    UseProgram,
    UploadMat4 {
        name: String,
    },
    UploadIntArray {
        name: String,
        values: Vec<i32>,
    },
    BindTexture {
        unit: u32,
        texture_uid: u64,
    },
    UnbindTexture {
        unit: u32,
    },
    DrawIndexed {
        vertex_buffer: Option<usize>,
        index_buffer: Option<usize>,
        index_count: u32,
    },
    Detach,
}

type CallLog = Arc<Mutex<Vec<RenderCall>>>;

/// Mock implementation of [`RenderContext`].
///
/// Methods take `&self`; calls are recorded through a `parking_lot::Mutex`
/// (the trait requires `Send + Sync`, which rules out `RefCell`).
///
/// ```rust
/// use tessera_test_utils::{MockRenderContext, RenderContext, ShaderProgram};
/// use wgpu::*;
///
/// let mock = MockRenderContext::new();
/// let mut program = mock.program();
///
/// let buffer = mock.create_buffer(&BufferDescriptor {
///     label: None,
///     size: 36 * 4,
///     usage: BufferUsages::VERTEX,
///     mapped_at_creation: false,
/// });
/// program.use_program();
/// program.draw_indexed(&buffer, &buffer, 6);
/// program.detach();
///
/// assert_eq!(mock.count_buffer_creates(), 1);
/// assert_eq!(mock.count_draws(), 1);
/// ```
pub struct MockRenderContext {
    calls: CallLog,
    next_buffer_id: Mutex<usize>,
    next_texture_id: Mutex<usize>,
    /// Last bytes written to each buffer, laid out from offset 0.
    buffer_contents: Mutex<HashMap<usize, Vec<u8>>>,
}

impl MockRenderContext {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            next_buffer_id: Mutex::new(0),
            next_texture_id: Mutex::new(0),
            buffer_contents: Mutex::new(HashMap::new()),
        }
    }

    /// Create a mock shader program that records into this context's log.
    pub fn program(&self) -> MockShaderProgram {
        MockShaderProgram {
            calls: Arc::clone(&self.calls),
            in_use: false,
        }
    }

    /// Copy of all recorded calls.
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().clone()
    }

    fn count(&self, pred: impl Fn(&RenderCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| pred(call)).count()
    }

    pub fn count_buffer_creates(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::CreateBuffer { .. }))
    }

    pub fn count_buffer_writes(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::WriteBuffer { .. }))
    }

    /// Writes that targeted `buffer_id`.
    pub fn count_writes_to(&self, buffer_id: usize) -> usize {
        self.count(|call| {
            matches!(call, RenderCall::WriteBuffer { buffer_id: id, .. } if *id == buffer_id)
        })
    }

    pub fn count_texture_creates(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::CreateTexture { .. }))
    }

    pub fn count_texture_binds(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::BindTexture { .. }))
    }

    pub fn count_draws(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::DrawIndexed { .. }))
    }

    /// `(vertex buffer id, index count)` for every draw, in issue order.
    pub fn draws(&self) -> Vec<(Option<usize>, u32)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                RenderCall::DrawIndexed {
                    vertex_buffer,
                    index_count,
                    ..
                } => Some((*vertex_buffer, *index_count)),
                _ => None,
            })
            .collect()
    }

    /// Latest contents of a mock buffer, if anything was written to it.
    pub fn buffer_contents(&self, buffer_id: usize) -> Option<Vec<u8>> {
        self.buffer_contents.lock().get(&buffer_id).cloned()
    }

    /// Clear recorded calls (useful between test steps).
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Default for MockRenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderContext for MockRenderContext {
    fn create_buffer(&self, desc: &BufferDescriptor) -> GpuBuffer {
        let mut next = self.next_buffer_id.lock();
        let buffer_id = *next;
        *next += 1;

        self.calls.lock().push(RenderCall::CreateBuffer {
            buffer_id,
            size: desc.size,
            usage: desc.usage,
        });

        GpuBuffer::mock(buffer_id, desc.size)
    }

    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]) {
        let Some(buffer_id) = buffer.mock_id() else {
            return;
        };

        let end = offset as usize + data.len();
        assert!(
            end as u64 <= buffer.size(),
            "write of {} bytes at offset {offset} overflows buffer {buffer_id} of {} bytes",
            data.len(),
            buffer.size()
        );

        let mut contents = self.buffer_contents.lock();
        let bytes = contents.entry(buffer_id).or_default();
        if bytes.len() < end {
            bytes.resize(end, 0);
        }
        bytes[offset as usize..end].copy_from_slice(data);

        self.calls.lock().push(RenderCall::WriteBuffer {
            buffer_id,
            offset,
            size: data.len(),
        });
    }

    fn create_texture(&self, desc: &TextureDescriptor) -> GpuTexture {
        let mut next = self.next_texture_id.lock();
        let texture_id = *next;
        *next += 1;

        self.calls.lock().push(RenderCall::CreateTexture {
            texture_id,
            width: desc.size.width,
            height: desc.size.height,
            format: desc.format,
        });

        GpuTexture::mock(texture_id, desc.size.width, desc.size.height, desc.format)
    }

    fn write_texture(
        &self,
        texture: &GpuTexture,
        data: &[u8],
        _layout: TexelCopyBufferLayout,
        _size: Extent3d,
    ) {
        if let Some(texture_id) = texture.mock_id() {
            self.calls.lock().push(RenderCall::WriteTexture {
                texture_id,
                size: data.len(),
            });
        }
    }
}

/// Mock implementation of [`ShaderProgram`], created by [`MockRenderContext::program`].
pub struct MockShaderProgram {
    calls: CallLog,
    in_use: bool,
}

impl MockShaderProgram {
    pub fn is_in_use(&self) -> bool {
        self.in_use
    }

    fn record(&self, call: RenderCall) {
        self.calls.lock().push(call);
    }
}

impl ShaderProgram for MockShaderProgram {
    fn use_program(&mut self) {
        self.in_use = true;
        self.record(RenderCall::UseProgram);
    }

    fn upload_mat4(&mut self, name: &str, _value: &[[f32; 4]; 4]) {
        self.record(RenderCall::UploadMat4 {
            name: name.to_string(),
        });
    }

    fn upload_int_array(&mut self, name: &str, values: &[i32]) {
        self.record(RenderCall::UploadIntArray {
            name: name.to_string(),
            values: values.to_vec(),
        });
    }

    fn bind_texture(&mut self, unit: u32, texture: &GpuTexture) {
        self.record(RenderCall::BindTexture {
            unit,
            texture_uid: texture.uid(),
        });
    }

    fn unbind_texture(&mut self, unit: u32) {
        self.record(RenderCall::UnbindTexture { unit });
    }

    fn draw_indexed(&mut self, vertex_buffer: &GpuBuffer, index_buffer: &GpuBuffer, index_count: u32) {
        assert!(self.in_use, "draw issued without a program in use");
        self.record(RenderCall::DrawIndexed {
            vertex_buffer: vertex_buffer.mock_id(),
            index_buffer: index_buffer.mock_id(),
            index_count,
        });
    }

    fn detach(&mut self) {
        self.in_use = false;
        self.record(RenderCall::Detach);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex_buffer(mock: &MockRenderContext, size: u64) -> GpuBuffer {
        mock.create_buffer(&BufferDescriptor {
            label: Some("test_buffer"),
            size,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    #[test]
    fn test_mock_buffer_creation() {
        let mock = MockRenderContext::new();
        let buffer = vertex_buffer(&mock, 1024);

        assert!(buffer.is_mock());
        assert_eq!(buffer.mock_id(), Some(0));
        assert_eq!(mock.count_buffer_creates(), 1);
    }

    #[test]
    fn test_mock_buffer_write_keeps_contents() {
        let mock = MockRenderContext::new();
        let buffer = vertex_buffer(&mock, 8);

        mock.write_buffer(&buffer, 0, &[1, 2, 3, 4]);
        mock.write_buffer(&buffer, 4, &[5, 6, 7, 8]);

        assert_eq!(mock.count_buffer_writes(), 2);
        assert_eq!(mock.count_writes_to(0), 2);
        assert_eq!(mock.buffer_contents(0), Some(vec![1, 2, 3, 4, 5, 6, 7, 8]));
    }

    #[test]
    #[should_panic(expected = "overflows buffer")]
    fn test_mock_buffer_write_overflow() {
        let mock = MockRenderContext::new();
        let buffer = vertex_buffer(&mock, 4);
        mock.write_buffer(&buffer, 2, &[0u8; 4]);
    }

    #[test]
    fn test_mock_texture_creation() {
        let mock = MockRenderContext::new();

        let texture = mock.create_texture(&TextureDescriptor {
            label: Some("test_texture"),
            size: Extent3d {
                width: 32,
                height: 32,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::Rgba8UnormSrgb,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        });

        assert!(texture.is_mock());
        assert_eq!(texture.size(), (32, 32));
        assert_eq!(mock.count_texture_creates(), 1);
    }

    #[test]
    fn test_program_shares_call_log() {
        let mock = MockRenderContext::new();
        let buffer = vertex_buffer(&mock, 144);
        let mut program = mock.program();

        program.use_program();
        assert!(program.is_in_use());
        program.upload_int_array("uTextures", &[0, 1, 2]);
        program.draw_indexed(&buffer, &buffer, 6);
        program.detach();
        assert!(!program.is_in_use());

        assert_eq!(mock.draws(), vec![(Some(0), 6)]);
        assert_eq!(mock.calls().last(), Some(&RenderCall::Detach));
    }

    #[test]
    #[should_panic(expected = "without a program in use")]
    fn test_draw_without_program_panics() {
        let mock = MockRenderContext::new();
        let buffer = vertex_buffer(&mock, 144);
        let mut program = mock.program();
        program.draw_indexed(&buffer, &buffer, 6);
    }

    #[test]
    fn test_clear_calls() {
        let mock = MockRenderContext::new();
        vertex_buffer(&mock, 1024);
        assert_eq!(mock.call_count(), 1);

        mock.clear_calls();
        assert_eq!(mock.call_count(), 0);
    }
}

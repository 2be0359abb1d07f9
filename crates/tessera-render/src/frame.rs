use std::sync::Arc;

use tessera_core::profiling::{profile_function, profile_scope};
use tessera_winit::window::WinitWindow;

use crate::{color::Color, context::GraphicsContext};

/// How a render pass treats the existing contents of the surface.
#[derive(Debug, Clone, Copy, Default)]
pub enum ClearOp {
    #[default]
    Load,
    Clear(wgpu::Color),
}

impl From<wgpu::Color> for ClearOp {
    fn from(color: wgpu::Color) -> Self {
        ClearOp::Clear(color)
    }
}

impl From<Color> for ClearOp {
    fn from(color: Color) -> Self {
        ClearOp::Clear(color.to_wgpu())
    }
}

impl ClearOp {
    fn operations(self) -> wgpu::Operations<wgpu::Color> {
        let load = match self {
            ClearOp::Load => wgpu::LoadOp::Load,
            ClearOp::Clear(color) => wgpu::LoadOp::Clear(color),
        };
        wgpu::Operations {
            load,
            store: wgpu::StoreOp::Store,
        }
    }
}

/// One frame's worth of GPU work for a window.
///
/// Commands are submitted and the surface is presented when the frame is
/// dropped.
pub struct Frame {
    context: Arc<GraphicsContext>,
    encoder: Option<wgpu::CommandEncoder>,
    surface: Option<wgpu::SurfaceTexture>,
    view: wgpu::TextureView,
    window: Arc<WinitWindow>,
    passes: usize,
}

impl Frame {
    pub(crate) fn new(
        context: Arc<GraphicsContext>,
        surface: wgpu::SurfaceTexture,
        window: Arc<WinitWindow>,
    ) -> Self {
        let view = surface
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });
        Self {
            context,
            encoder: Some(encoder),
            surface: Some(surface),
            view,
            window,
            passes: 0,
        }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Begin a render pass targeting the window surface.
    pub fn render_pass(&mut self, clear: impl Into<ClearOp>) -> wgpu::RenderPass<'_> {
        self.passes += 1;
        let context = &self.context;
        let encoder = self.encoder.get_or_insert_with(|| {
            context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Frame Encoder"),
                })
        });
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Frame Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.view,
                resolve_target: None,
                ops: clear.into().operations(),
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        })
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        profile_function!();

        if self.passes == 0 {
            tracing::warn!("frame dropped without any render pass");
        }

        if let Some(encoder) = self.encoder.take() {
            profile_scope!("submit_commands");
            self.context.queue.submit(std::iter::once(encoder.finish()));
        }

        if let Some(surface) = self.surface.take() {
            profile_scope!("present_surface");
            self.window.pre_present_notify();
            surface.present();
        }

        self.window.request_redraw();
    }
}

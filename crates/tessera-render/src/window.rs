use std::sync::Arc;

use tessera_core::profiling::profile_function;
use tessera_winit::{
    WindowId,
    event::PhysicalSize,
    window::Window,
};

use crate::{
    context::{GraphicsContext, GraphicsError, GraphicsResult},
    frame::Frame,
};

/// Surface options for a [`RenderableWindow`]. `None` keeps the surface default.
#[derive(Debug, Clone, Default)]
pub struct WindowContextDescriptor {
    pub format: Option<wgpu::TextureFormat>,
    pub present_mode: Option<wgpu::PresentMode>,
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
}

/// A window paired with the surface it presents to.
pub struct RenderableWindow {
    window: Window,
    context: Arc<GraphicsContext>,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    pending_resize: Option<PhysicalSize<u32>>,
}

impl RenderableWindow {
    pub fn new(window: Window, context: Arc<GraphicsContext>) -> GraphicsResult<Self> {
        Self::new_with_descriptor(window, context, WindowContextDescriptor::default())
    }

    pub fn new_with_descriptor(
        window: Window,
        context: Arc<GraphicsContext>,
        descriptor: WindowContextDescriptor,
    ) -> GraphicsResult<Self> {
        let PhysicalSize { width, height } = window.physical_size();
        let surface = context
            .instance
            .create_surface(window.window.clone())
            .map_err(|e| GraphicsError::SurfaceCreationFailed(e.to_string()))?;

        let mut config = surface
            .get_default_config(&context.adapter, width.max(1), height.max(1))
            .ok_or_else(|| {
                GraphicsError::SurfaceConfigurationFailed(
                    "surface is not supported by the adapter".to_string(),
                )
            })?;

        if let Some(format) = descriptor.format {
            config.format = format;
        }
        if let Some(present_mode) = descriptor.present_mode {
            config.present_mode = present_mode;
        }
        if let Some(alpha_mode) = descriptor.alpha_mode {
            config.alpha_mode = alpha_mode;
        }

        surface.configure(&context.device, &config);
        tracing::debug!(
            format = ?config.format,
            width = config.width,
            height = config.height,
            "configured window surface"
        );

        Ok(Self {
            window,
            context,
            surface,
            config,
            pending_resize: None,
        })
    }

    pub fn id(&self) -> WindowId {
        self.window.id()
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn graphics_context(&self) -> &Arc<GraphicsContext> {
        &self.context
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn surface_config(&self) -> &wgpu::SurfaceConfiguration {
        &self.config
    }

    /// Schedule a surface reconfigure for the next frame.
    pub fn resized(&mut self, new_size: PhysicalSize<u32>) {
        self.pending_resize = Some(new_size);
    }

    /// Acquire the next surface texture.
    ///
    /// A lost or outdated surface is reconfigured once before giving up.
    pub fn begin_frame(&mut self) -> GraphicsResult<Frame> {
        profile_function!();

        if let Some(size) = self.pending_resize.take()
            && size.width > 0
            && size.height > 0
        {
            self.config.width = size.width;
            self.config.height = size.height;
            self.surface.configure(&self.context.device, &self.config);
        }

        let texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost, reconfiguring");
                self.surface.configure(&self.context.device, &self.config);
                self.surface
                    .get_current_texture()
                    .map_err(|e| GraphicsError::SurfaceTextureUnavailable(e.to_string()))?
            }
            Err(e) => return Err(GraphicsError::SurfaceTextureUnavailable(e.to_string())),
        };

        Ok(Frame::new(
            self.context.clone(),
            texture,
            self.window.window.clone(),
        ))
    }
}

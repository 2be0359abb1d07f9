use std::sync::Arc;

pub use winit::dpi::PhysicalSize;
pub use winit::window::Window as WinitWindow;
use winit::{error::OsError, event_loop::ActiveEventLoop};

/// Options for creating a window.
#[derive(Debug, Clone)]
pub struct WindowDescriptor {
    pub title: String,
    pub resizable: bool,
    /// Inner size in physical pixels. `None` lets the platform decide.
    pub size: Option<PhysicalSize<u32>>,
    pub visible: bool,
    pub maximized: bool,
}

impl Default for WindowDescriptor {
    fn default() -> Self {
        Self {
            title: "Tessera".to_string(),
            resizable: true,
            size: Some(PhysicalSize::new(960, 540)),
            visible: true,
            maximized: false,
        }
    }
}

/// Shared handle to a platform window.
#[derive(Debug, Clone)]
pub struct Window {
    pub window: Arc<WinitWindow>,
}

impl Window {
    pub fn id(&self) -> winit::window::WindowId {
        self.window.id()
    }

    pub fn physical_size(&self) -> PhysicalSize<u32> {
        self.window.inner_size()
    }

    pub fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    pub(crate) fn new(
        event_loop: &ActiveEventLoop,
        descriptor: WindowDescriptor,
    ) -> Result<Self, OsError> {
        let mut attributes = WinitWindow::default_attributes()
            .with_title(descriptor.title)
            .with_resizable(descriptor.resizable)
            .with_visible(descriptor.visible)
            .with_maximized(descriptor.maximized);

        if let Some(size) = descriptor.size {
            attributes = attributes.with_inner_size(size);
        }

        let window = Arc::new(event_loop.create_window(attributes)?);
        tracing::debug!(id = ?window.id(), "created window");

        Ok(Window { window })
    }
}

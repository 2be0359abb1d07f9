use std::sync::Arc;

/// Errors raised while creating GPU resources that a frame cannot do without.
#[derive(Debug)]
pub enum GraphicsError {
    /// No adapter matched the requested options
    NoAdapter(String),
    /// The adapter refused to create a device
    DeviceCreationFailed(String),
    /// A surface could not be created for the window
    SurfaceCreationFailed(String),
    /// The surface does not support the adapter or requested format
    SurfaceConfigurationFailed(String),
    /// The next swapchain texture could not be acquired
    SurfaceTextureUnavailable(String),
}

impl std::fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoAdapter(msg) => write!(f, "No suitable GPU adapter: {}", msg),
            Self::DeviceCreationFailed(msg) => write!(f, "Failed to create device: {}", msg),
            Self::SurfaceCreationFailed(msg) => write!(f, "Failed to create surface: {}", msg),
            Self::SurfaceConfigurationFailed(msg) => {
                write!(f, "Failed to configure surface: {}", msg)
            }
            Self::SurfaceTextureUnavailable(msg) => {
                write!(f, "Failed to acquire surface texture: {}", msg)
            }
        }
    }
}

impl std::error::Error for GraphicsError {}

pub type GraphicsResult<T> = Result<T, GraphicsError>;

/// Device and queue shared by every batch, texture and window.
///
/// Created once and handed around as `Arc<GraphicsContext>`.
pub struct GraphicsContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GraphicsContext {
    /// Create a context with default options.
    pub async fn new_owned() -> GraphicsResult<Arc<Self>> {
        Self::new_owned_with_descriptor(GraphicsContextDescriptor::default()).await
    }

    /// Blocking variant of [`GraphicsContext::new_owned`].
    pub fn new_owned_sync() -> GraphicsResult<Arc<Self>> {
        pollster::block_on(Self::new_owned())
    }

    /// Blocking variant of [`GraphicsContext::new_owned_with_descriptor`].
    pub fn new_owned_sync_with_descriptor(
        descriptor: GraphicsContextDescriptor,
    ) -> GraphicsResult<Arc<Self>> {
        pollster::block_on(Self::new_owned_with_descriptor(descriptor))
    }

    pub async fn new_owned_with_descriptor(
        descriptor: GraphicsContextDescriptor,
    ) -> GraphicsResult<Arc<Self>> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: descriptor.backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: descriptor.power_preference,
                compatible_surface: None,
                force_fallback_adapter: descriptor.force_fallback_adapter,
            })
            .await
            .map_err(|e| GraphicsError::NoAdapter(e.to_string()))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: descriptor.label,
                required_limits: descriptor.limits.clone(),
                ..Default::default()
            })
            .await
            .map_err(|e| GraphicsError::DeviceCreationFailed(e.to_string()))?;

        let info = adapter.get_info();
        tracing::info!(
            adapter = %info.name,
            backend = ?info.backend,
            "created graphics context"
        );

        Ok(Arc::new(Self {
            instance,
            adapter,
            device,
            queue,
        }))
    }

    pub fn info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    pub fn limits(&self) -> wgpu::Limits {
        self.device.limits()
    }

    #[inline]
    pub fn max_texture_dimension_2d(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }
}

/// Options for [`GraphicsContext`] creation.
pub struct GraphicsContextDescriptor {
    pub backends: wgpu::Backends,
    pub power_preference: wgpu::PowerPreference,
    pub force_fallback_adapter: bool,
    pub limits: wgpu::Limits,
    pub label: Option<&'static str>,
}

impl Default for GraphicsContextDescriptor {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            limits: wgpu::Limits::default(),
            label: Some("Tessera Device"),
        }
    }
}

impl GraphicsContextDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn power_preference(mut self, preference: wgpu::PowerPreference) -> Self {
        self.power_preference = preference;
        self
    }

    pub fn backends(mut self, backends: wgpu::Backends) -> Self {
        self.backends = backends;
        self
    }

    pub fn force_fallback_adapter(mut self, force: bool) -> Self {
        self.force_fallback_adapter = force;
        self
    }

    pub fn limits(mut self, limits: wgpu::Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }
}

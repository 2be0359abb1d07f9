//! Shared, read-only texture handles.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tessera_test_utils::{GpuTexture, RenderContext, ShaderProgram};

/// Errors from creating a [`Texture`].
#[derive(Debug)]
pub enum TextureError {
    /// Width or height is zero
    InvalidDimensions { width: u32, height: u32 },
    /// Pixel buffer length does not match `width * height * 4`
    DataSizeMismatch { expected: usize, actual: usize },
    /// Image file could not be read or decoded
    Decode(String),
}

impl std::fmt::Display for TextureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => {
                write!(f, "Invalid texture dimensions {}x{}", width, height)
            }
            Self::DataSizeMismatch { expected, actual } => write!(
                f,
                "Texture data size mismatch: expected {} bytes, got {}",
                expected, actual
            ),
            Self::Decode(msg) => write!(f, "Failed to decode image: {}", msg),
        }
    }
}

impl std::error::Error for TextureError {}

pub type TextureResult<T> = Result<T, TextureError>;

#[derive(Debug)]
struct TextureInner {
    gpu: GpuTexture,
    label: Option<String>,
}

/// Reference-counted handle to an uploaded texture.
///
/// Clones share the GPU resource. Two handles are equal only when they refer
/// to the same upload, so the batcher can use them as slot keys.
#[derive(Debug, Clone)]
pub struct Texture {
    inner: Arc<TextureInner>,
}

impl Texture {
    /// Format used for every sprite texture.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    /// Wrap an already uploaded GPU texture.
    pub fn from_gpu(gpu: GpuTexture, label: Option<&str>) -> Self {
        Self {
            inner: Arc::new(TextureInner {
                gpu,
                label: label.map(str::to_owned),
            }),
        }
    }

    /// Upload tightly packed RGBA8 pixels.
    pub fn from_rgba8(
        ctx: &dyn RenderContext,
        label: Option<&str>,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> TextureResult<Self> {
        if width == 0 || height == 0 {
            return Err(TextureError::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(TextureError::DataSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let gpu = ctx.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        ctx.write_texture(
            &gpu,
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            size,
        );

        tracing::debug!(?label, width, height, "uploaded texture");
        Ok(Self::from_gpu(gpu, label))
    }

    /// Decode an image file and upload it.
    #[cfg(feature = "image")]
    pub fn from_path(
        ctx: &dyn RenderContext,
        path: impl AsRef<std::path::Path>,
    ) -> TextureResult<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|e| TextureError::Decode(format!("{}: {}", path.display(), e)))?
            .into_rgba8();
        let label = path.to_string_lossy();
        Self::from_rgba8(ctx, Some(label.as_ref()), image.width(), image.height(), image.as_raw())
    }

    /// Process-unique identity, shared by clones.
    pub fn id(&self) -> u64 {
        self.inner.gpu.uid()
    }

    pub fn label(&self) -> Option<&str> {
        self.inner.label.as_deref()
    }

    /// Width and height in texels.
    pub fn size(&self) -> (u32, u32) {
        self.inner.gpu.size()
    }

    pub fn gpu(&self) -> &GpuTexture {
        &self.inner.gpu
    }

    pub fn bind(&self, program: &mut dyn ShaderProgram, unit: u32) {
        program.bind_texture(unit, &self.inner.gpu);
    }

    pub fn unbind(&self, program: &mut dyn ShaderProgram, unit: u32) {
        program.unbind_texture(unit);
    }
}

impl PartialEq for Texture {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Texture {}

impl Hash for Texture {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

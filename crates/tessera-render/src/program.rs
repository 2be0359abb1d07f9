//! The wgpu-backed sprite program.
//!
//! wgpu has no immediate-mode "bind and draw", so [`SpriteProgram`] records
//! what a batch asks for (uniforms, bound texture units, indexed draws) and
//! replays it into a render pass on [`SpriteProgram::flush`]. Draws replay in
//! the order they were issued, which keeps the batch set's depth ordering.
//!
//! Uniforms are frame-scoped: every draw in one flush sees the values from
//! the last upload before the flush.

use std::sync::Arc;

use ahash::AHashMap;
use bytemuck::{Pod, Zeroable};
use tessera_core::profiling::profile_function;
use tessera_test_utils::{
    GpuBuffer, GpuTexture, PROJECTION_UNIFORM, ShaderProgram, TEXTURES_UNIFORM, VIEW_UNIFORM,
};

use crate::batch::MAX_TEXTURE_SLOTS;
use crate::context::GraphicsContext;
use crate::vertex::SpriteVertex;

const SHADER_SOURCE: &str = include_str!("../shaders/sprite.wgsl");

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct SpriteUniforms {
    projection: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    units: [[u32; 4]; 3],
}

impl Default for SpriteUniforms {
    fn default() -> Self {
        let identity = glam::Mat4::IDENTITY.to_cols_array_2d();
        let mut units = [[0; 4]; 3];
        for slot in 0..=MAX_TEXTURE_SLOTS {
            units[slot / 4][slot % 4] = slot as u32;
        }
        Self {
            projection: identity,
            view: identity,
            units,
        }
    }
}

/// Texture uids bound to units 1..=8, 0 for an empty unit.
type UnitKey = [u64; MAX_TEXTURE_SLOTS];

struct PendingDraw {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    units: UnitKey,
}

/// Sprite shader, pipeline and per-frame draw list.
pub struct SpriteProgram {
    context: Arc<GraphicsContext>,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    fallback_view: wgpu::TextureView,

    uniforms: SpriteUniforms,
    bound: [Option<GpuTexture>; MAX_TEXTURE_SLOTS],
    in_use: bool,
    pending: Vec<PendingDraw>,

    views: AHashMap<u64, wgpu::TextureView>,
    bind_groups: AHashMap<UnitKey, wgpu::BindGroup>,
}

impl SpriteProgram {
    /// Compile the sprite shader for render targets of `target_format`.
    pub fn new(context: Arc<GraphicsContext>, target_format: wgpu::TextureFormat) -> Self {
        let device = &context.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sprite Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Sprite Uniform Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let mut texture_entries = vec![wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        }];
        texture_entries.extend((1..=MAX_TEXTURE_SLOTS as u32).map(|binding| {
            wgpu::BindGroupLayoutEntry {
                binding,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            }
        }));
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Sprite Texture Layout"),
            entries: &texture_entries,
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sprite Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sprite Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[SpriteVertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Sprite Uniforms"),
            size: std::mem::size_of::<SpriteUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Sprite Uniform Bind Group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Sprite Sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let fallback_view = create_fallback_view(&context);

        tracing::debug!(?target_format, "created sprite program");

        Self {
            context,
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            texture_layout,
            sampler,
            fallback_view,
            uniforms: SpriteUniforms::default(),
            bound: Default::default(),
            in_use: false,
            pending: Vec::new(),
            views: AHashMap::new(),
            bind_groups: AHashMap::new(),
        }
    }

    /// Draws recorded since the last flush.
    pub fn pending_draws(&self) -> usize {
        self.pending.len()
    }

    /// Drop cached texture views and bind groups, e.g. after textures were freed.
    pub fn clear_cache(&mut self) {
        self.views.clear();
        self.bind_groups.clear();
    }

    /// Upload the frame's uniforms and replay recorded draws into `pass`.
    pub fn flush(&mut self, pass: &mut wgpu::RenderPass<'_>) {
        profile_function!();
        if self.pending.is_empty() {
            return;
        }

        self.context.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&self.uniforms),
        );

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);

        for draw in self.pending.drain(..) {
            let Some(bind_group) = self.bind_groups.get(&draw.units) else {
                tracing::warn!("missing texture bind group for recorded draw");
                continue;
            };
            pass.set_bind_group(1, bind_group, &[]);
            pass.set_vertex_buffer(0, draw.vertex_buffer.slice(..));
            pass.set_index_buffer(draw.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..draw.index_count, 0, 0..1);
        }
    }

    fn unit_key(&self) -> UnitKey {
        let mut key = [0; MAX_TEXTURE_SLOTS];
        for (slot, texture) in self.bound.iter().enumerate() {
            if let Some(texture) = texture {
                key[slot] = texture.uid();
            }
        }
        key
    }

    fn ensure_bind_group(&mut self, key: UnitKey) {
        if self.bind_groups.contains_key(&key) {
            return;
        }

        for texture in self.bound.iter().flatten() {
            self.views
                .entry(texture.uid())
                .or_insert_with(|| texture.as_wgpu().create_view(&Default::default()));
        }

        let views: Vec<&wgpu::TextureView> = key
            .iter()
            .map(|uid| self.views.get(uid).unwrap_or(&self.fallback_view))
            .collect();

        let mut entries = vec![wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Sampler(&self.sampler),
        }];
        entries.extend(views.into_iter().enumerate().map(|(slot, view)| wgpu::BindGroupEntry {
            binding: slot as u32 + 1,
            resource: wgpu::BindingResource::TextureView(view),
        }));

        let bind_group = self
            .context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Sprite Texture Bind Group"),
                layout: &self.texture_layout,
                entries: &entries,
            });
        self.bind_groups.insert(key, bind_group);
    }
}

impl ShaderProgram for SpriteProgram {
    fn use_program(&mut self) {
        self.in_use = true;
    }

    fn upload_mat4(&mut self, name: &str, value: &[[f32; 4]; 4]) {
        match name {
            PROJECTION_UNIFORM => self.uniforms.projection = *value,
            VIEW_UNIFORM => self.uniforms.view = *value,
            _ => tracing::warn!(name, "unknown mat4 uniform"),
        }
    }

    fn upload_int_array(&mut self, name: &str, values: &[i32]) {
        if name != TEXTURES_UNIFORM {
            tracing::warn!(name, "unknown int array uniform");
            return;
        }
        for (slot, unit) in values.iter().take(MAX_TEXTURE_SLOTS + 1).enumerate() {
            self.uniforms.units[slot / 4][slot % 4] = (*unit).max(0) as u32;
        }
    }

    fn bind_texture(&mut self, unit: u32, texture: &GpuTexture) {
        match (unit as usize).checked_sub(1).and_then(|i| self.bound.get_mut(i)) {
            Some(slot) => *slot = Some(texture.clone()),
            None => tracing::warn!(unit, "texture unit out of range"),
        }
    }

    fn unbind_texture(&mut self, unit: u32) {
        if let Some(slot) = (unit as usize).checked_sub(1).and_then(|i| self.bound.get_mut(i)) {
            *slot = None;
        }
    }

    fn draw_indexed(&mut self, vertex_buffer: &GpuBuffer, index_buffer: &GpuBuffer, index_count: u32) {
        if !self.in_use {
            tracing::warn!("draw issued without use_program, ignoring");
            return;
        }
        let units = self.unit_key();
        self.ensure_bind_group(units);
        self.pending.push(PendingDraw {
            vertex_buffer: vertex_buffer.as_wgpu().clone(),
            index_buffer: index_buffer.as_wgpu().clone(),
            index_count,
            units,
        });
    }

    fn detach(&mut self) {
        self.in_use = false;
    }
}

fn create_fallback_view(context: &GraphicsContext) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: 1,
        height: 1,
        depth_or_array_layers: 1,
    };
    let texture = context.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Sprite Fallback Texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    context.queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &[255, 255, 255, 255],
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4),
            rows_per_image: Some(1),
        },
        size,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

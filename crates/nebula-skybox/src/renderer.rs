//! GPU space skybox pass.
//!
//! Draws the procedural star field behind scene geometry with a single
//! full-screen triangle. Pipelines are specialized per target (HDR or surface
//! format, MSAA samples, depth format) and cached.

use std::num::NonZeroU64;

use bytemuck::Zeroable;
use nebula_render::{CameraView, ViewUniform};
use rustc_hash::FxHashMap;
use wgpu::util::DeviceExt;

use crate::cubemap::SkyCubemap;
use crate::evaluator::{SkyboxUniformsGpu, SpaceSkyboxUniforms};
use crate::fullscreen::FULLSCREEN_TRIANGLE_VERTEX_COUNT;
use crate::shader::{FRAGMENT_ENTRY_POINT, SPACE_SKYBOX_SHADER_SOURCE, VERTEX_ENTRY_POINT};

/// Color format used for HDR targets.
pub const HDR_TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Everything a skybox pipeline depends on besides the shader.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpaceSkyboxPipelineKey {
    pub hdr: bool,
    pub samples: u32,
    /// Depth attachment of the pass, if any. The skybox tests against it but
    /// never writes it.
    pub depth_format: Option<wgpu::TextureFormat>,
}

impl Default for SpaceSkyboxPipelineKey {
    fn default() -> Self {
        Self {
            hdr: false,
            samples: 1,
            depth_format: Some(wgpu::TextureFormat::Depth32Float),
        }
    }
}

/// Owns the skybox bind group, uniform buffers and specialized pipelines.
pub struct SpaceSkyboxRenderer {
    shader: wgpu::ShaderModule,
    pipeline_layout: wgpu::PipelineLayout,
    surface_format: wgpu::TextureFormat,
    pipelines: FxHashMap<SpaceSkyboxPipelineKey, wgpu::RenderPipeline>,
    view_buffer: wgpu::Buffer,
    skybox_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl SpaceSkyboxRenderer {
    /// Create the renderer. `surface_format` is the color format used for
    /// non-HDR keys.
    ///
    /// `cubemap` fills the cubemap binding; without one a 1x1 black cube is bound.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        cubemap: Option<&SkyCubemap>,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("space-skybox-shader"),
            source: wgpu::ShaderSource::Wgsl(SPACE_SKYBOX_SHADER_SOURCE.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("space-skybox-bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::Cube,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(
                            std::mem::size_of::<ViewUniform>() as u64
                        ),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(
                            std::mem::size_of::<SkyboxUniformsGpu>() as u64,
                        ),
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("space-skybox-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let cubemap_view = upload_cubemap(device, queue, cubemap);
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("space-skybox-sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let view_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("space-skybox-view"),
            contents: bytemuck::cast_slice(&[ViewUniform::zeroed()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let skybox_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("space-skybox-uniforms"),
            contents: bytemuck::cast_slice(&[SpaceSkyboxUniforms::default().to_gpu()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("space-skybox-bg"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&cubemap_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: view_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: skybox_buffer.as_entire_binding(),
                },
            ],
        });

        log::info!(
            "Space skybox renderer initialized: surface format {:?}, cubemap {}",
            surface_format,
            cubemap.map_or(1, |c| c.face_size)
        );

        Self {
            shader,
            pipeline_layout,
            surface_format,
            pipelines: FxHashMap::default(),
            view_buffer,
            skybox_buffer,
            bind_group,
        }
    }

    /// Build (or reuse) the pipeline for `key`.
    pub fn specialize(&mut self, device: &wgpu::Device, key: SpaceSkyboxPipelineKey) {
        if self.pipelines.contains_key(&key) {
            return;
        }
        let pipeline = self.create_pipeline(device, key);
        log::debug!("Specialized space skybox pipeline for {:?}", key);
        self.pipelines.insert(key, pipeline);
    }

    /// Number of specialized pipelines currently cached.
    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    /// Upload this frame's view and skybox parameters and make sure a pipeline
    /// exists for `key`.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        key: SpaceSkyboxPipelineKey,
        view: &CameraView,
        uniforms: &SpaceSkyboxUniforms,
    ) {
        self.specialize(device, key);
        queue.write_buffer(&self.view_buffer, 0, bytemuck::cast_slice(&[view.to_uniform()]));
        queue.write_buffer(
            &self.skybox_buffer,
            0,
            bytemuck::cast_slice(&[uniforms.to_gpu()]),
        );
    }

    /// Record the skybox draw. Returns `false` and draws nothing if `key` was
    /// never prepared.
    pub fn render<'a>(
        &'a self,
        pass: &mut wgpu::RenderPass<'a>,
        key: SpaceSkyboxPipelineKey,
    ) -> bool {
        let Some(pipeline) = self.pipelines.get(&key) else {
            log::warn!("Space skybox pipeline for {:?} not prepared, skipping", key);
            return false;
        };
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..FULLSCREEN_TRIANGLE_VERTEX_COUNT, 0..1);
        true
    }

    fn create_pipeline(
        &self,
        device: &wgpu::Device,
        key: SpaceSkyboxPipelineKey,
    ) -> wgpu::RenderPipeline {
        let format = if key.hdr {
            HDR_TEXTURE_FORMAT
        } else {
            self.surface_format
        };

        let depth_stencil = key.depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::GreaterEqual, // reverse-Z, sky at z=0
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("space-skybox-pipeline"),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &self.shader,
                entry_point: Some(VERTEX_ENTRY_POINT),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil,
            multisample: wgpu::MultisampleState {
                count: key.samples,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &self.shader,
                entry_point: Some(FRAGMENT_ENTRY_POINT),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None, // opaque
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        })
    }
}

fn upload_cubemap(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    cubemap: Option<&SkyCubemap>,
) -> wgpu::TextureView {
    let face_size = cubemap.map_or(1, |c| c.face_size);
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("space-skybox-cubemap"),
        size: wgpu::Extent3d {
            width: face_size,
            height: face_size,
            depth_or_array_layers: 6,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    let faces = match cubemap {
        Some(cubemap) => cubemap.to_rgba8(),
        None => vec![vec![0, 0, 0, 255]; 6],
    };
    for (i, face_data) in faces.iter().enumerate() {
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: 0,
                    y: 0,
                    z: i as u32,
                },
                aspect: wgpu::TextureAspect::All,
            },
            face_data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(face_size * 4),
                rows_per_image: Some(face_size),
            },
            wgpu::Extent3d {
                width: face_size,
                height: face_size,
                depth_or_array_layers: 1,
            },
        );
    }

    texture.create_view(&wgpu::TextureViewDescriptor {
        dimension: Some(wgpu::TextureViewDimension::Cube),
        ..Default::default()
    })
}

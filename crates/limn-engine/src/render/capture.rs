//! Off-screen capture texture and composite blit using wgpu.
//!
//! [`CaptureBuffer`] is the GPU half of the outline pass: an RGBA texture
//! that silhouettes are drawn into, and a textured-quad pipeline that
//! alpha-blends it over the main framebuffer. The state machine driving
//! it ([`OutlineCompositor`](crate::outline::OutlineCompositor)) is
//! GPU-free; this type only allocates, clears, blits, and reallocates.

use wgpu::util::DeviceExt;

use crate::outline::BlitParams;
use crate::InitError;

/// Texture format of the capture buffer. Silhouettes are flat color, so
/// plain (non-sRGB) RGBA keeps the blit's alpha math linear.
const CAPTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

// ---------------------------------------------------------------------------
// Blit geometry and uniforms
// ---------------------------------------------------------------------------

/// Full-screen quad vertex: clip-space position plus texture coordinate.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck_derive::Pod, bytemuck_derive::Zeroable)]
struct BlitVertex {
    position: [f32; 2],
    uv: [f32; 2],
}

impl BlitVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<BlitVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Two CCW triangles covering clip space, with V flipped for texture space.
const QUAD_VERTICES: [BlitVertex; 6] = [
    BlitVertex {
        position: [-1.0, -1.0],
        uv: [0.0, 1.0],
    },
    BlitVertex {
        position: [1.0, -1.0],
        uv: [1.0, 1.0],
    },
    BlitVertex {
        position: [1.0, 1.0],
        uv: [1.0, 0.0],
    },
    BlitVertex {
        position: [-1.0, -1.0],
        uv: [0.0, 1.0],
    },
    BlitVertex {
        position: [1.0, 1.0],
        uv: [1.0, 0.0],
    },
    BlitVertex {
        position: [-1.0, 1.0],
        uv: [0.0, 0.0],
    },
];

/// Uniforms for the composite shader. Padded to 16 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck_derive::Pod, bytemuck_derive::Zeroable)]
struct CompositeParams {
    elapsed: f32,
    _pad: [f32; 3],
}

// ---------------------------------------------------------------------------
// CaptureBuffer
// ---------------------------------------------------------------------------

/// GPU resources for the outline capture pass.
pub struct CaptureBuffer {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    params_buffer: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    blit_pipeline: wgpu::RenderPipeline,
    quad_buffer: wgpu::Buffer,
    size: (u32, u32),
}

impl CaptureBuffer {
    /// Allocate the capture texture and build the blit pipeline.
    ///
    /// `surface_format` is the main framebuffer's format (the blit's color
    /// target). Returns [`InitError::BufferAllocation`] when the requested
    /// size exceeds what the device supports.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> Result<Self, InitError> {
        let width = size.width.max(1);
        let height = size.height.max(1);
        let max_dim = device.limits().max_texture_dimension_2d;
        if width > max_dim || height > max_dim {
            return Err(InitError::BufferAllocation {
                width,
                height,
                details: format!("exceeds device limit of {max_dim}"),
            });
        }

        let (texture, view) = Self::create_texture(device, width, height);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("highlight_capture_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("highlight_composite_params"),
            contents: bytemuck::bytes_of(&CompositeParams {
                elapsed: 0.0,
                _pad: [0.0; 3],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("highlight_blit_bind_group_layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
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
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                ],
            });

        let bind_group =
            Self::create_bind_group(device, &bind_group_layout, &view, &sampler, &params_buffer);

        let shader_source = include_str!("shaders.wgsl");
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("highlight_blit_shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("highlight_blit_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let blit_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("highlight_blit_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[BlitVertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    // Transparent texels must leave the scene untouched.
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
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
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let quad_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("highlight_blit_quad"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Ok(Self {
            texture,
            view,
            sampler,
            params_buffer,
            bind_group_layout,
            bind_group,
            blit_pipeline,
            quad_buffer,
            size: (width, height),
        })
    }

    fn create_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("highlight_capture_texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: CAPTURE_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
        params_buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("highlight_blit_bind_group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: params_buffer.as_entire_binding(),
                },
            ],
        })
    }

    /// The capture texture itself.
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    /// View to bind as the render target for silhouette draws.
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Current texture dimensions.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Start a capture pass: clears the texture to fully transparent so
    /// last frame's silhouettes never linger.
    pub fn begin_capture<'a>(
        &'a self,
        encoder: &'a mut wgpu::CommandEncoder,
    ) -> wgpu::RenderPass<'a> {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("highlight_capture_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        })
    }

    /// Alpha-blend the capture texture over `main_view`.
    ///
    /// Loads the existing scene (no clear) and draws the full-screen quad
    /// with the composite shader.
    pub fn blit(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        queue: &wgpu::Queue,
        main_view: &wgpu::TextureView,
        params: &BlitParams,
    ) {
        queue.write_buffer(
            &self.params_buffer,
            0,
            bytemuck::bytes_of(&CompositeParams {
                elapsed: params.elapsed,
                _pad: [0.0; 3],
            }),
        );

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("highlight_blit_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: main_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(&self.blit_pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.quad_buffer.slice(..));
        pass.draw(0..QUAD_VERTICES.len() as u32, 0..1);
    }

    /// Reallocate the texture for a new viewport size. The old texture is
    /// dropped; the bind group is rebuilt against the new view.
    pub fn resize(&mut self, device: &wgpu::Device, size: winit::dpi::PhysicalSize<u32>) {
        let width = size.width.max(1);
        let height = size.height.max(1);
        if (width, height) == self.size {
            return;
        }
        let (texture, view) = Self::create_texture(device, width, height);
        self.texture = texture;
        self.view = view;
        self.bind_group = Self::create_bind_group(
            device,
            &self.bind_group_layout,
            &self.view,
            &self.sampler,
            &self.params_buffer,
        );
        self.size = (width, height);
        tracing::debug!(width, height, "capture texture reallocated");
    }
}

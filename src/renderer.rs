use anyhow::{anyhow, Context, Result};
use glam::Mat4;
use std::collections::HashMap;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::ViewState;
use crate::core::gpu_context::GpuContext;
use crate::core::window::WindowDimensions;
use crate::lighting::SceneLightingState;
use crate::loaders::TextureData;
use crate::mesh::{pyramid, uv_sphere, MeshData};
use crate::scene::{self, DrawItem, Geometry, ModelKind, SceneAssets, TextureSlot, CLEAR_COLOR};
use crate::traits::Renderer;
use crate::types::{DrawUniform, FrameUniform, Vertex};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const MAX_DRAW_ITEMS: u64 = 32;
const SPHERE_DETAIL: u32 = 32;

/// A mesh resident on the GPU
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    /// Embedded base-color texture
    texture: Option<wgpu::BindGroup>,
}

/// Forward rasterizer for the room scene
pub struct SceneRenderer {
    gpu: GpuContext,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    draw_stride: u64,
    white: wgpu::BindGroup,
    wood: wgpu::BindGroup,
    cloth: wgpu::BindGroup,
    /// Indexed by glTF mesh, one entry per uploaded primitive
    models: HashMap<ModelKind, Vec<Vec<GpuMesh>>>,
    pyramid: GpuMesh,
    sphere: GpuMesh,
    projection: Mat4,
}

impl SceneRenderer {
    pub async fn new(window: Arc<Window>, assets: &SceneAssets) -> Result<Self> {
        let size = WindowDimensions::from(window.inner_size());

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("Failed to create surface")?;
        let gpu = GpuContext::for_surface(&instance, &surface).await?;
        let device = gpu.device();

        let config = Self::create_surface_config(&surface, gpu.adapter(), size)?;
        surface.configure(device, &config);
        let depth_view = Self::create_depth_view(device, &config);

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<FrameUniform>() as u64
                    ),
                },
                count: None,
            }],
        });
        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Draw Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<DrawUniform>() as u64
                    ),
                },
                count: None,
            }],
        });
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Bind Group Layout"),
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
            ],
        });

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniform Buffer"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let draw_stride = gpu.uniform_stride(std::mem::size_of::<DrawUniform>() as u64);
        let draw_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Draw Uniform Buffer"),
            size: draw_stride * MAX_DRAW_ITEMS,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let draw_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Draw Bind Group"),
            layout: &draw_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &draw_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniform>() as u64),
                }),
            }],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Scene Texture Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let uploader = Uploader {
            gpu: &gpu,
            layout: &texture_layout,
            sampler: &sampler,
        };
        let white = uploader.texture("White Texture", &TextureData::white());
        let wood = uploader.texture("Wood Texture", &assets.wood);
        let cloth = uploader.texture("Cloth Texture", &assets.cloth);

        let mut models = HashMap::new();
        for (kind, model) in &assets.models {
            let meshes = model
                .meshes
                .iter()
                .map(|primitives| {
                    primitives
                        .iter()
                        .filter_map(|mesh| uploader.mesh(&model.name, mesh))
                        .collect()
                })
                .collect();
            models.insert(*kind, meshes);
        }
        let pyramid = uploader
            .mesh("pyramid", &pyramid())
            .context("Pyramid mesh is empty")?;
        let sphere = uploader
            .mesh("sphere", &uv_sphere(1.0, SPHERE_DETAIL, SPHERE_DETAIL))
            .context("Sphere mesh is empty")?;

        let pipeline = Self::create_render_pipeline(
            device,
            &[&frame_layout, &draw_layout, &texture_layout],
            config.format,
        );

        log::info!(
            "Renderer initialized: {}x{}, {:?}, {} models",
            config.width,
            config.height,
            config.format,
            models.len()
        );

        Ok(Self {
            gpu,
            surface,
            config,
            depth_view,
            pipeline,
            frame_buffer,
            frame_bind_group,
            draw_buffer,
            draw_bind_group,
            draw_stride,
            white,
            wood,
            cloth,
            models,
            pyramid,
            sphere,
            projection: Mat4::IDENTITY,
        })
    }

    pub fn resize(&mut self, dimensions: WindowDimensions) {
        if dimensions.is_empty() {
            return;
        }
        self.config.width = dimensions.width;
        self.config.height = dimensions.height;
        self.reconfigure();
    }

    /// Reconfigure the surface after it was lost or became outdated
    pub fn reconfigure(&mut self) {
        let device = self.gpu.device();
        self.surface.configure(device, &self.config);
        self.depth_view = Self::create_depth_view(device, &self.config);
    }

    pub fn dimensions(&self) -> WindowDimensions {
        WindowDimensions::new(self.config.width, self.config.height)
    }

    fn create_surface_config(
        surface: &wgpu::Surface,
        adapter: &wgpu::Adapter,
        size: WindowDimensions,
    ) -> Result<wgpu::SurfaceConfiguration> {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow!("Surface is incompatible with the adapter"))?;

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }

    fn create_depth_view(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
    ) -> wgpu::TextureView {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("Depth Texture"),
                size: wgpu::Extent3d {
                    width: config.width,
                    height: config.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: DEPTH_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_render_pipeline(
        device: &wgpu::Device,
        bind_group_layouts: &[&wgpu::BindGroupLayout],
        surface_format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("scene.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts,
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            // Imported models mix windings, so nothing is culled
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    fn meshes(&self, geometry: Geometry) -> Vec<&GpuMesh> {
        match geometry {
            Geometry::Pyramid => vec![&self.pyramid],
            Geometry::Sphere => vec![&self.sphere],
            Geometry::Model(kind, index) => {
                let Some(meshes) = self.models.get(&kind) else {
                    return Vec::new();
                };
                match index {
                    Some(i) => meshes.get(i).into_iter().flatten().collect(),
                    None => meshes.iter().flatten().collect(),
                }
            }
        }
    }

    fn texture_for<'a>(&'a self, slot: TextureSlot, mesh: &'a GpuMesh) -> &'a wgpu::BindGroup {
        match slot {
            TextureSlot::Wood => &self.wood,
            TextureSlot::Cloth => &self.cloth,
            TextureSlot::None => &self.white,
            TextureSlot::Embedded => mesh.texture.as_ref().unwrap_or(&self.white),
        }
    }

    fn write_uniforms(&self, view: &Mat4, lighting: &SceneLightingState, items: &[DrawItem]) {
        let queue = self.gpu.queue();
        let frame = FrameUniform::new(*view, self.projection, lighting.to_uniform());
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::cast_slice(&[frame]));

        let stride = self.draw_stride as usize;
        let mut staging = vec![0u8; stride * items.len()];
        for (chunk, item) in staging.chunks_exact_mut(stride).zip(items) {
            let uniform = item.to_uniform();
            let bytes = bytemuck::bytes_of(&uniform);
            chunk[..bytes.len()].copy_from_slice(bytes);
        }
        queue.write_buffer(&self.draw_buffer, 0, &staging);
    }
}

impl Renderer for SceneRenderer {
    fn send_projection_matrix(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    fn render_frame(
        &mut self,
        view: &ViewState,
        lighting: &SceneLightingState,
        time: f32,
        _delta: f32,
    ) -> Result<(), wgpu::SurfaceError> {
        let mut items = scene::compose(time, lighting);
        if items.len() as u64 > MAX_DRAW_ITEMS {
            log::warn!("Dropping {} draw items", items.len() as u64 - MAX_DRAW_ITEMS);
            items.truncate(MAX_DRAW_ITEMS as usize);
        }
        self.write_uniforms(&view.view_matrix, lighting, &items);

        let output = self.surface.get_current_texture()?;
        let target = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let [r, g, b] = CLEAR_COLOR;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a: 1.0 }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);

            for (i, item) in items.iter().enumerate() {
                let offset = (i as u64 * self.draw_stride) as u32;
                render_pass.set_bind_group(1, &self.draw_bind_group, &[offset]);

                for mesh in self.meshes(item.geometry) {
                    render_pass.set_bind_group(2, self.texture_for(item.texture, mesh), &[]);
                    render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    render_pass
                        .set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
                }
            }
        }

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

/// Borrowed upload state used while the renderer is being built
struct Uploader<'a> {
    gpu: &'a GpuContext,
    layout: &'a wgpu::BindGroupLayout,
    sampler: &'a wgpu::Sampler,
}

impl Uploader<'_> {
    fn texture(&self, label: &str, data: &TextureData) -> wgpu::BindGroup {
        let size = wgpu::Extent3d {
            width: data.width,
            height: data.height,
            depth_or_array_layers: 1,
        };
        let texture = self.gpu.device().create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.gpu.queue().write_texture(
            texture.as_image_copy(),
            &data.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * data.width),
                rows_per_image: Some(data.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.gpu.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(self.sampler),
                },
            ],
        })
    }

    fn mesh(&self, name: &str, mesh: &MeshData) -> Option<GpuMesh> {
        if mesh.is_empty() {
            return None;
        }

        let device = self.gpu.device();
        let vertex_label = format!("{} Vertices", name);
        let index_label = format!("{} Indices", name);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(vertex_label.as_str()),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(index_label.as_str()),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Some(GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            texture: mesh
                .texture
                .as_ref()
                .map(|texture| self.texture(&format!("{} Texture", name), texture)),
        })
    }
}

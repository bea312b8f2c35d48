//! Flat-lit triangle rasterizer for loaded scenes.
//!
//! All meshes of the scene are flattened into one vertex and one index
//! buffer and drawn with a single indexed draw call.

use wgpu::util::DeviceExt;

use super::dynamic_buffer::DynamicBuffer;
use super::pipeline_helpers::{create_mesh_pipeline, uniform_buffer};
use super::render_context::RenderContext;
use super::texture::DepthTarget;
use crate::camera::{Camera, CameraUniform};
use crate::options::DisplayOptions;
use crate::scene::SceneFragment;
use crate::stage::Rasterizer;

/// Fixed light direction used when the headlight is off.
const WORLD_LIGHT: [f32; 3] = [0.35, 0.6, 0.72];

/// Interleaved position and normal.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// World-space normal.
    pub normal: [f32; 3],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    /// Vertex buffer layout matching `mesh.wgsl`.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Surface color and lighting parameters.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShadingUniform {
    /// Base color (linear RGB).
    pub color: [f32; 3],
    /// Ambient floor.
    pub ambient: f32,
    /// Light direction when the headlight is off.
    pub light_dir: [f32; 3],
    /// Nonzero to light from the eye.
    pub headlight: u32,
}

impl From<&DisplayOptions> for ShadingUniform {
    fn from(display: &DisplayOptions) -> Self {
        Self {
            color: display.model_color,
            ambient: display.ambient.clamp(0.0, 1.0),
            light_dir: WORLD_LIGHT,
            headlight: u32::from(display.headlight),
        }
    }
}

/// Concatenate every mesh into shared vertex and index lists, rebasing
/// indices onto the combined vertex list.
#[must_use]
pub fn flatten(scene: &SceneFragment) -> (Vec<MeshVertex>, Vec<u32>) {
    let vertex_count = scene.meshes.iter().map(|m| m.positions.len()).sum();
    let index_count = scene.meshes.iter().map(|m| m.indices.len()).sum();
    let mut vertices = Vec::with_capacity(vertex_count);
    let mut indices = Vec::with_capacity(index_count);

    for mesh in &scene.meshes {
        let base = vertices.len() as u32;
        vertices.extend(mesh.positions.iter().zip(&mesh.normals).map(
            |(position, normal)| MeshVertex {
                position: position.to_array(),
                normal: normal.to_array(),
            },
        ));
        indices.extend(mesh.indices.iter().map(|i| base + i));
    }
    (vertices, indices)
}

/// wgpu implementation of [`Rasterizer`].
pub struct MeshRenderer {
    context: RenderContext,
    pipeline: wgpu::RenderPipeline,
    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    shading_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    vertices: DynamicBuffer,
    indices: DynamicBuffer,
    index_count: u32,
    depth: DepthTarget,
    clear_color: wgpu::Color,
}

impl MeshRenderer {
    /// Build the pipeline and uniforms on an initialized context.
    #[must_use]
    pub fn new(context: RenderContext, display: &DisplayOptions) -> Self {
        let device = &context.device;
        let shader =
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Mesh Shader"),
                source: wgpu::ShaderSource::Wgsl(
                    include_str!("../../assets/shaders/mesh.wgsl").into(),
                ),
            });

        let camera_uniform = CameraUniform::new();
        let camera_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let shading_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Shading Buffer"),
                contents: bytemuck::cast_slice(&[ShadingUniform::from(
                    display,
                )]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });

        let layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Mesh Bind Group Layout"),
                entries: &[uniform_buffer(0), uniform_buffer(1)],
            });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Mesh Bind Group"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: shading_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline = create_mesh_pipeline(
            device,
            "Mesh",
            &shader,
            context.format(),
            MeshVertex::layout(),
            &[&layout],
        );

        let vertices = DynamicBuffer::new(
            device,
            "Mesh Vertices",
            wgpu::BufferUsages::VERTEX,
        );
        let indices =
            DynamicBuffer::new(device, "Mesh Indices", wgpu::BufferUsages::INDEX);
        let (width, height) = context.size();
        let depth = DepthTarget::new(device, width, height);

        Self {
            pipeline,
            camera_uniform,
            camera_buffer,
            shading_buffer,
            bind_group,
            vertices,
            indices,
            index_count: 0,
            depth,
            clear_color: clear_color(display),
            context,
        }
    }

    /// Apply new colors and lighting.
    pub fn set_display(&mut self, display: &DisplayOptions) {
        self.clear_color = clear_color(display);
        self.context.queue.write_buffer(
            &self.shading_buffer,
            0,
            bytemuck::cast_slice(&[ShadingUniform::from(display)]),
        );
    }

    /// The underlying GPU context.
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    fn render(&self) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.acquire_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.context.create_encoder();
        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Mesh Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &view,
                            depth_slice: None,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(self.clear_color),
                                store: wgpu::StoreOp::Store,
                            },
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &self.depth.view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
            if self.index_count > 0 {
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &self.bind_group, &[]);
                pass.set_vertex_buffer(0, self.vertices.slice());
                pass.set_index_buffer(
                    self.indices.slice(),
                    wgpu::IndexFormat::Uint32,
                );
                pass.draw_indexed(0..self.index_count, 0, 0..1);
            }
        }
        self.context.submit(encoder);
        frame.present();
        Ok(())
    }
}

impl Rasterizer for MeshRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
        if !self.depth.matches(width, height) {
            self.depth = DepthTarget::new(&self.context.device, width, height);
        }
    }

    fn set_scene(&mut self, scene: &SceneFragment) {
        let (vertices, indices) = flatten(scene);
        let device = &self.context.device;
        let queue = &self.context.queue;
        let _ = self.vertices.write(device, queue, &vertices);
        let _ = self.indices.write(device, queue, &indices);
        self.index_count = indices.len() as u32;
    }

    fn draw(&mut self, camera: &Camera) {
        self.camera_uniform.update_view_proj(camera);
        self.context.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera_uniform]),
        );
        match self.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.context.reconfigure();
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::debug!("surface timed out, skipping frame");
            }
            Err(e) => log::error!("failed to render frame: {e}"),
        }
    }
}

fn clear_color(display: &DisplayOptions) -> wgpu::Color {
    let [r, g, b, a] = display.clear_color();
    wgpu::Color { r, g, b, a }
}

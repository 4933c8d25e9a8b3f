use crate::shaders;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use rigscene_common::TextureHandle;
use rigscene_render::DrawCommand;
use wgpu::util::DeviceExt;

/// Half the edge length of a rig cube.
const CUBE_HALF_EXTENT: f32 = 1.0;
/// Height of the grid floor, just under the rig's feet.
const FLOOR_Y: f32 = -4.0;
const GRID_LINES: i32 = 25;
const GRID_SPACING: f32 = 2.0;
const MAX_PARTS: u32 = 1024;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const BACKDROP: wgpu::Color = wgpu::Color {
    r: 0.1,
    g: 0.25,
    b: 0.5,
    a: 1.0,
};

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    fn new(view_projection: Mat4) -> Self {
        Self {
            view_proj: view_projection.to_cols_array_2d(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CubeVertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct PartInstance {
    world: [[f32; 4]; 4],
    tint: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct LinePoint {
    position: [f32; 3],
    color: [f32; 4],
}

/// Flat colour standing in for a texture until textures are uploaded.
pub fn texture_color(texture: TextureHandle) -> [f32; 4] {
    const PALETTE: [[f32; 4]; 4] = [
        [0.9, 0.3, 0.25, 1.0],
        [0.2, 0.6, 1.0, 1.0],
        [0.95, 0.8, 0.2, 1.0],
        [0.4, 0.8, 0.4, 1.0],
    ];
    PALETTE[texture.0 as usize % PALETTE.len()]
}

/// Cube with four vertices per face so each face keeps a flat normal.
fn cube_mesh(half: f32) -> (Vec<CubeVertex>, Vec<u16>) {
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for normal in [Vec3::Z, Vec3::NEG_Z, Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y] {
        // Two axes spanning the face, ordered so the quad winds outward.
        let u = normal.any_orthonormal_vector();
        let v = normal.cross(u);
        let base = vertices.len() as u16;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let p = (normal + u * su + v * sv) * half;
            vertices.push(CubeVertex {
                position: p.to_array(),
                normal: normal.to_array(),
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    (vertices, indices)
}

/// Line-list grid on the plane `y = height`, `2 * lines + 1` lines per axis.
fn grid_mesh(lines: i32, spacing: f32, height: f32) -> Vec<LinePoint> {
    let color = [0.35, 0.35, 0.4, 1.0];
    let reach = lines as f32 * spacing;
    (-lines..=lines)
        .map(|i| i as f32 * spacing)
        .flat_map(|at| {
            [
                [-reach, height, at],
                [reach, height, at],
                [at, height, -reach],
                [at, height, reach],
            ]
        })
        .map(|position| LinePoint { position, color })
        .collect()
}

/// One cube instance per model draw, in submission order.
fn part_instances(frame: &[DrawCommand]) -> Vec<PartInstance> {
    frame
        .iter()
        .filter_map(|command| match command {
            DrawCommand::Model { world, texture, .. } => Some(PartInstance {
                world: world.to_cols_array_2d(),
                tint: texture_color(*texture),
            }),
            _ => None,
        })
        .take(MAX_PARTS as usize)
        .collect()
}

/// View-projection of the frame: taken from its first model draw.
fn frame_view_projection(frame: &[DrawCommand]) -> Option<Mat4> {
    frame.iter().find_map(|command| match command {
        DrawCommand::Model {
            view_projection, ..
        } => Some(*view_projection),
        _ => None,
    })
}

fn static_buffer<T: Pod>(
    device: &wgpu::Device,
    label: &str,
    contents: &[T],
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(contents),
        usage,
    })
}

/// Shared shape of the two pipelines: one shader module, `vs_*`/`fs_*`
/// entry points, depth tested, no culling.
struct PipelineDesc<'a> {
    label: &'a str,
    source: &'a str,
    vertex_entry: &'a str,
    fragment_entry: &'a str,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    topology: wgpu::PrimitiveTopology,
}

impl PipelineDesc<'_> {
    fn build(
        &self,
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        surface_format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(self.label),
            source: wgpu::ShaderSource::Wgsl(self.source.into()),
        });
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(self.label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some(self.vertex_entry),
                compilation_options: Default::default(),
                buffers: self.buffers,
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some(self.fragment_entry),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            // Left-handed view space flips winding, so draw both faces.
            primitive: wgpu::PrimitiveState {
                topology: self.topology,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        })
    }
}

/// wgpu renderer for the model pass of a recorded frame.
pub struct WgpuRenderer {
    part_pipeline: wgpu::RenderPipeline,
    floor_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_group: wgpu::BindGroup,
    cube_vertices: wgpu::Buffer,
    cube_indices: wgpu::Buffer,
    cube_index_count: u32,
    floor_lines: wgpu::Buffer,
    floor_point_count: u32,
    parts: wgpu::Buffer,
    depth: wgpu::TextureView,
    last_view_projection: Mat4,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let camera_buffer = static_buffer(
            device,
            "camera",
            &[CameraUniform::new(Mat4::IDENTITY)],
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );
        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let camera_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("rig"),
            bind_group_layouts: &[&camera_layout],
            push_constant_ranges: &[],
        });

        let part_pipeline = PipelineDesc {
            label: "parts",
            source: shaders::MODEL_SHADER,
            vertex_entry: "vs_main",
            fragment_entry: "fs_main",
            buffers: &[
                wgpu::VertexBufferLayout {
                    array_stride: size_of::<CubeVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
                },
                wgpu::VertexBufferLayout {
                    array_stride: size_of::<PartInstance>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &wgpu::vertex_attr_array![
                        2 => Float32x4,
                        3 => Float32x4,
                        4 => Float32x4,
                        5 => Float32x4,
                        6 => Float32x4,
                    ],
                },
            ],
            topology: wgpu::PrimitiveTopology::TriangleList,
        }
        .build(device, &layout, surface_format);

        let floor_pipeline = PipelineDesc {
            label: "floor",
            source: shaders::GRID_SHADER,
            vertex_entry: "vs_grid",
            fragment_entry: "fs_grid",
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: size_of::<LinePoint>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4],
            }],
            topology: wgpu::PrimitiveTopology::LineList,
        }
        .build(device, &layout, surface_format);

        let (cube_verts, cube_idx) = cube_mesh(CUBE_HALF_EXTENT);
        let floor = grid_mesh(GRID_LINES, GRID_SPACING, FLOOR_Y);

        Self {
            part_pipeline,
            floor_pipeline,
            camera_buffer,
            camera_group,
            cube_vertices: static_buffer(device, "cube vertices", &cube_verts, wgpu::BufferUsages::VERTEX),
            cube_indices: static_buffer(device, "cube indices", &cube_idx, wgpu::BufferUsages::INDEX),
            cube_index_count: cube_idx.len() as u32,
            floor_lines: static_buffer(device, "floor", &floor, wgpu::BufferUsages::VERTEX),
            floor_point_count: floor.len() as u32,
            parts: device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("parts"),
                size: MAX_PARTS as u64 * size_of::<PartInstance>() as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }),
            depth: depth_view(device, width, height),
            last_view_projection: Mat4::IDENTITY,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        tracing::debug!(width, height, "recreating depth buffer");
        self.depth = depth_view(device, width, height);
    }

    /// Render the model pass of a recorded frame: grid floor, then cubes.
    ///
    /// A frame without model draws keeps the previous frame's camera so the
    /// floor does not jump.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        frame: &[DrawCommand],
    ) {
        if let Some(vp) = frame_view_projection(frame) {
            self.last_view_projection = vp;
        }
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform::new(self.last_view_projection)),
        );

        let parts = part_instances(frame);
        if !parts.is_empty() {
            queue.write_buffer(&self.parts, 0, bytemuck::cast_slice(&parts));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("model pass"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("model pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(BACKDROP),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
            pass.set_bind_group(0, &self.camera_group, &[]);

            pass.set_pipeline(&self.floor_pipeline);
            pass.set_vertex_buffer(0, self.floor_lines.slice(..));
            pass.draw(0..self.floor_point_count, 0..1);

            if !parts.is_empty() {
                pass.set_pipeline(&self.part_pipeline);
                pass.set_vertex_buffer(0, self.cube_vertices.slice(..));
                pass.set_vertex_buffer(1, self.parts.slice(..));
                pass.set_index_buffer(self.cube_indices.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..self.cube_index_count, 0, 0..parts.len() as u32);
            }
        }
        queue.submit([encoder.finish()]);
    }
}

fn depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some("depth"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
        .create_view(&Default::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use rigscene_render::{Pass, TextLine};

    #[test]
    fn cube_faces_point_outward() {
        let (verts, indices) = cube_mesh(1.0);
        assert_eq!(verts.len(), 24);
        assert_eq!(indices.len(), 36);
        for tri in indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from(verts[i as usize].position));
            let face_normal = (b - a).cross(c - a).normalize();
            let n = Vec3::from(verts[tri[0] as usize].normal);
            assert!(face_normal.abs_diff_eq(n, 1e-5));
            assert!((a.dot(n) - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn grid_has_two_lines_per_step() {
        let verts = grid_mesh(2, 1.0, -4.0);
        assert_eq!(verts.len(), 5 * 4);
        assert!(verts.iter().all(|v| v.position[1] == -4.0));
    }

    #[test]
    fn instances_come_from_model_draws_only() {
        let world = Mat4::from_translation(Vec3::new(0.0, 8.0, 0.0));
        let frame = vec![
            DrawCommand::BeginPass(Pass::Model),
            DrawCommand::Model {
                world,
                view_projection: Mat4::IDENTITY,
                texture: TextureHandle(1),
            },
            DrawCommand::EndPass(Pass::Model),
            DrawCommand::Sprite {
                texture: TextureHandle(0),
                position: Vec2::ZERO,
                size: Vec2::ONE,
                color: [1.0; 4],
            },
            DrawCommand::Text(vec![TextLine {
                text: "Value:1".into(),
                x: 0.0,
                y: 0.0,
                scale: 1.0,
            }]),
        ];
        let parts = part_instances(&frame);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].world[3], [0.0, 8.0, 0.0, 1.0]);
        assert_eq!(parts[0].tint, texture_color(TextureHandle(1)));
        assert_eq!(frame_view_projection(&frame), Some(Mat4::IDENTITY));
    }

    #[test]
    fn empty_frame_has_no_camera() {
        assert_eq!(frame_view_projection(&[DrawCommand::ClearDepth]), None);
    }
}
